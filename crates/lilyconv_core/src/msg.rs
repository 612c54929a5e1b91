use std::path::PathBuf;

use crate::{JobId, JobReport, ToolInfo};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertMsg {
    /// The document to convert; resets any previous result.
    DocumentLoaded {
        text: String,
        path: Option<PathBuf>,
        encoding: Option<String>,
    },
    /// User picked another LilyPond installation.
    ToolChanged(ToolInfo),
    FromVersionEdited(String),
    ToVersionEdited(String),
    /// Initial run or "Run Again".
    RunRequested,
    CopyMessagesToggled(bool),
    /// Engine completion for a job.
    JobDone { job_id: JobId, report: JobReport },
    /// Fallback for placeholder wiring.
    NoOp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportMsg {
    /// The file handed to the importer.
    SourceSelected(PathBuf),
    /// Program (plus fixed leading arguments) of the importer.
    ToolChanged(Vec<String>),
    OptionToggled { key: String, enabled: bool },
    /// `None` selects the tool's default pitch language.
    LanguageSelected(Option<String>),
    RunRequested,
    JobDone { job_id: JobId, report: JobReport },
    NoOp,
}
