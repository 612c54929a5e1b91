/// How a finished job looked from the dialog's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobReport {
    pub program: String,
    /// The process never ran (missing executable, permission denied, ...).
    pub failed_to_start: bool,
    pub error: Option<String>,
    /// Exit status was zero. Not consulted by the dialogs, only logged.
    pub success: bool,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl JobReport {
    pub fn start_failure_message(&self) -> String {
        format!(
            "Could not start {}:\n\n{}\n",
            self.program,
            self.error.as_deref().unwrap_or("unknown error")
        )
    }
}

/// An external tool as selected by the user.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ToolInfo {
    /// Program followed by any fixed leading arguments (e.g. an interpreter).
    pub command: Vec<String>,
    pub version: Option<String>,
}

impl ToolInfo {
    pub fn new(command: Vec<String>, version: Option<String>) -> Self {
        Self { command, version }
    }

    pub fn program(&self) -> &str {
        self.command.first().map(String::as_str).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConversionResult {
    pub original: String,
    pub converted: String,
    pub messages: String,
}
