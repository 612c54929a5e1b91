use std::path::PathBuf;

use crate::RunPhase;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConvertViewModel {
    pub caption: String,
    pub phase: RunPhase,
    pub from_version: String,
    /// Why the from-version was filled in, e.g. found in the document.
    pub version_reason: Option<String>,
    pub to_version: String,
    pub messages: String,
    pub html_diff: String,
    pub unified_diff_html: String,
    pub unified_diff_text: String,
    pub accept_enabled: bool,
    pub copy_messages: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptionView {
    pub key: &'static str,
    pub label: &'static str,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportViewModel {
    pub caption: String,
    pub phase: RunPhase,
    pub source: Option<PathBuf>,
    pub options: Vec<ImportOptionView>,
    pub language: Option<&'static str>,
    pub languages: &'static [&'static str],
    pub messages: String,
    pub output: String,
}
