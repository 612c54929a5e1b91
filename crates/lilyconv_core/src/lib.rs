//! lilyconv core: pure dialog state machines, diff rendering and settings.
mod base;
pub mod diff;
mod effect;
mod import;
mod msg;
mod report;
mod save;
mod settings;
mod state;
mod text;
mod update;
mod version;
mod view_model;

pub use base::{HostEnvironment, RunPhase};
pub use effect::{Effect, JobId, JobRequest};
pub use import::{
    FlagPolarity, ImportOption, ImportState, ImportTool, MUSICXML2LY, MUSICXML_LANGUAGES,
    MUSICXML_OPTIONS,
};
pub use msg::{ConvertMsg, ImportMsg};
pub use report::{ConversionResult, JobReport, ToolInfo};
pub use save::{FileInfo, ResultTab};
pub use settings::{
    MemorySettings, SettingValue, SettingsStore, CONVERT_GROUP, COPY_MESSAGES_KEY,
    DEFAULT_LANGUAGE, LANGUAGE_KEY, LILYPOND_GROUP, NO_TRANSLATION_KEY,
};
pub use state::{
    ConvertState, CONVERT_PROGRAM, DIFF_WRAP_COLUMN, UNCHANGED_NOTICE, VERSION_FROM_DOCUMENT,
};
pub use text::{append_messages_comment, fill, COMMENT_FILL_WIDTH};
pub use update::{update_convert, update_import};
pub use version::{document_version, validate_versions, VersionError};
pub use view_model::{ConvertViewModel, ImportOptionView, ImportViewModel};
