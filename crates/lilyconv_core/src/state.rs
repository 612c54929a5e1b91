use std::path::{Path, PathBuf};

use crate::base::{DialogBase, HostEnvironment, RunPhase};
use crate::diff::{side_by_side_html, SideBySideOptions, UnifiedDiff};
use crate::settings::{
    SettingValue, SettingsStore, CONVERT_GROUP, COPY_MESSAGES_KEY, LILYPOND_GROUP,
    NO_TRANSLATION_KEY,
};
use crate::text::append_messages_comment;
use crate::version::{document_version, validate_versions, VersionError};
use crate::view_model::ConvertViewModel;
use crate::{ConversionResult, FileInfo, JobRequest, ResultTab, ToolInfo};

pub const CONVERT_PROGRAM: &str = "convert-ly";
pub const DIFF_WRAP_COLUMN: usize = 100;
pub const UNCHANGED_NOTICE: &str = "The document has not been changed.";
pub const VERSION_FROM_DOCUMENT: &str = "(set in document)";

const ORIGINAL_TITLE: &str = "Current Document";
const CONVERTED_TITLE: &str = "Converted Document";
const UNIFIED_FROM_LABEL: &str = "current";
const UNIFIED_TO_LABEL: &str = "converted";

/// State of the convert-ly dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertState {
    base: DialogBase,
    host: HostEnvironment,
    document_text: String,
    document_path: Option<PathBuf>,
    document_encoding: String,
    from_version: String,
    version_reason: Option<String>,
    to_version: String,
    tool: Option<ToolInfo>,
    copy_messages: bool,
    no_translation: bool,
    converted: String,
    html_diff: String,
    unified: UnifiedDiff,
}

impl Default for ConvertState {
    fn default() -> Self {
        Self {
            base: DialogBase::default(),
            host: HostEnvironment::default(),
            document_text: String::new(),
            document_path: None,
            document_encoding: "UTF-8".to_string(),
            from_version: String::new(),
            version_reason: None,
            to_version: String::new(),
            tool: None,
            copy_messages: true,
            no_translation: false,
            converted: String::new(),
            html_diff: String::new(),
            unified: UnifiedDiff::default(),
        }
    }
}

impl ConvertState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: &dyn SettingsStore, host: HostEnvironment) -> Self {
        Self {
            host,
            copy_messages: settings.bool_value(CONVERT_GROUP, COPY_MESSAGES_KEY, true),
            no_translation: settings.bool_value(LILYPOND_GROUP, NO_TRANSLATION_KEY, false),
            ..Self::default()
        }
    }

    /// Persist the user's choices when the dialog finishes.
    pub fn store_settings(&self, settings: &mut dyn SettingsStore) {
        settings.set_value(
            CONVERT_GROUP,
            COPY_MESSAGES_KEY,
            SettingValue::Bool(self.copy_messages),
        );
    }

    pub fn view(&self) -> ConvertViewModel {
        ConvertViewModel {
            caption: self.caption(),
            phase: self.base.phase(),
            from_version: self.from_version.clone(),
            version_reason: self.version_reason.clone(),
            to_version: self.to_version.clone(),
            messages: self.base.messages().to_string(),
            html_diff: self.html_diff.clone(),
            unified_diff_html: self.unified.html.clone(),
            unified_diff_text: self.unified.text.clone(),
            accept_enabled: !self.converted.is_empty(),
            copy_messages: self.copy_messages,
        }
    }

    pub fn consume_dirty(&mut self) -> bool {
        self.base.consume_dirty()
    }

    pub fn phase(&self) -> RunPhase {
        self.base.phase()
    }

    pub fn is_running(&self) -> bool {
        self.base.is_running()
    }

    pub fn messages(&self) -> &str {
        self.base.messages()
    }

    pub fn converted_text(&self) -> &str {
        &self.converted
    }

    pub fn document_path(&self) -> Option<&Path> {
        self.document_path.as_deref()
    }

    pub fn document_encoding(&self) -> &str {
        &self.document_encoding
    }

    pub fn result(&self) -> ConversionResult {
        ConversionResult {
            original: self.document_text.clone(),
            converted: self.converted.clone(),
            messages: self.base.messages().to_string(),
        }
    }

    /// Text to put back into the document, or `None` while accept is disabled.
    pub fn accepted_text(&self) -> Option<String> {
        if self.converted.is_empty() {
            return None;
        }
        if self.copy_messages {
            Some(append_messages_comment(&self.converted, self.base.messages()))
        } else {
            Some(self.converted.clone())
        }
    }

    pub fn file_info(&self, tab: ResultTab) -> FileInfo {
        let text = match tab {
            ResultTab::Messages => self.base.messages(),
            ResultTab::HtmlDiff => &self.html_diff,
            ResultTab::UnifiedDiff => &self.unified.text,
        };
        FileInfo::new(tab, text)
    }

    pub fn save_path(&self, tab: ResultTab) -> PathBuf {
        self.file_info(tab).target_path(self.document_path())
    }

    fn caption(&self) -> String {
        let version = self
            .tool
            .as_ref()
            .and_then(|tool| tool.version.as_deref())
            .unwrap_or("<unknown>");
        format!("Convert-ly from LilyPond {version}")
    }

    pub(crate) fn load_document(
        &mut self,
        text: String,
        path: Option<PathBuf>,
        encoding: Option<String>,
    ) {
        match document_version(&text) {
            Some(version) => {
                self.from_version = version;
                self.version_reason = Some(VERSION_FROM_DOCUMENT.to_string());
            }
            None => self.version_reason = None,
        }
        self.document_text = text;
        self.document_path = path;
        self.document_encoding = encoding.unwrap_or_else(|| "UTF-8".to_string());
        self.set_converted(String::new());
    }

    /// The target version follows the tool's version when it is known.
    pub(crate) fn select_tool(&mut self, tool: ToolInfo) {
        if let Some(version) = &tool.version {
            self.to_version = version.clone();
        }
        self.tool = Some(tool);
        self.set_converted(String::new());
        self.base.set_messages(String::new());
    }

    pub(crate) fn set_from_version(&mut self, version: String) {
        self.from_version = version;
        self.version_reason = None;
        self.base.mark_dirty();
    }

    pub(crate) fn set_to_version(&mut self, version: String) {
        self.to_version = version;
        self.base.mark_dirty();
    }

    pub(crate) fn set_copy_messages(&mut self, enabled: bool) {
        self.copy_messages = enabled;
        self.base.mark_dirty();
    }

    /// Command, environment and stdin for one convert-ly run.
    pub(crate) fn build_request(&self) -> Result<JobRequest, String> {
        validate_versions(&self.from_version, &self.to_version)
            .map_err(|err: VersionError| err.to_string())?;
        let tool = self
            .tool
            .as_ref()
            .filter(|tool| !tool.command.is_empty())
            .ok_or_else(|| format!("No {CONVERT_PROGRAM} program has been selected."))?;

        let mut command = tool.command.clone();
        command.extend([
            "-f".to_string(),
            self.from_version.trim().to_string(),
            "-t".to_string(),
            self.to_version.trim().to_string(),
            "-".to_string(),
        ]);

        let mut request = JobRequest::new(command);
        if self.no_translation {
            request
                .environment
                .push(("LC_MESSAGES".to_string(), Some("C".to_string())));
        }
        request.environment.extend(self.host.interpreter_overrides());
        request.input = Some(self.document_text.clone());
        Ok(request)
    }

    pub(crate) fn base_mut(&mut self) -> &mut DialogBase {
        &mut self.base
    }

    pub(crate) fn document_text(&self) -> &str {
        &self.document_text
    }

    pub(crate) fn set_converted(&mut self, text: String) {
        if text.is_empty() {
            self.html_diff.clear();
            self.unified = UnifiedDiff::default();
        } else {
            self.html_diff = side_by_side_html(
                &self.document_text,
                &text,
                ORIGINAL_TITLE,
                CONVERTED_TITLE,
                SideBySideOptions {
                    wrap_column: Some(DIFF_WRAP_COLUMN),
                    ..SideBySideOptions::default()
                },
            );
            self.unified = UnifiedDiff::compute(
                &self.document_text,
                &text,
                UNIFIED_FROM_LABEL,
                UNIFIED_TO_LABEL,
            );
        }
        self.converted = text;
        self.base.mark_dirty();
    }
}
