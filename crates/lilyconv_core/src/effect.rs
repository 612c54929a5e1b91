pub type JobId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run an external tool; its completion comes back as a `JobDone` message.
    StartJob { job_id: JobId, request: JobRequest },
}

/// Everything needed to launch one external tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRequest {
    pub command: Vec<String>,
    /// Ordered overrides; `None` removes the variable from the child's environment.
    pub environment: Vec<(String, Option<String>)>,
    /// Written to stdin, which is then closed. `None` leaves stdin empty.
    pub input: Option<String>,
    /// Encoding label used for stdin and for decoding stdout/stderr.
    pub encoding: String,
}

impl JobRequest {
    pub fn new(command: Vec<String>) -> Self {
        Self {
            command,
            environment: Vec::new(),
            input: None,
            encoding: "UTF-8".to_string(),
        }
    }

    pub fn program(&self) -> &str {
        self.command.first().map(String::as_str).unwrap_or_default()
    }

    /// Value of an override, if one was set. `Some(None)` means "unset".
    pub fn env_override(&self, key: &str) -> Option<Option<&str>> {
        self.environment
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_deref())
    }
}
