pub(crate) mod convert;
pub(crate) mod import;

use std::process::ExitCode;

use lilyconv_core::RunPhase;
use lilyconv_logging::lily_warn;

use crate::persistence::SettingsFile;

/// How a dialog run ended, as far as the exit status is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RunStatus {
    Completed,
    /// The tool could not start or the run was blocked by missing input.
    NotRun,
}

impl RunStatus {
    pub(crate) fn from_phase(phase: RunPhase) -> Self {
        match phase {
            RunPhase::Succeeded => RunStatus::Completed,
            RunPhase::Idle | RunPhase::Running { .. } | RunPhase::StartFailed => RunStatus::NotRun,
        }
    }

    pub(crate) fn exit_code(self) -> ExitCode {
        match self {
            RunStatus::Completed => ExitCode::SUCCESS,
            RunStatus::NotRun => ExitCode::from(1),
        }
    }
}

/// Split a user-supplied tool command such as `python3 /opt/lilypond/bin/convert-ly`.
pub(crate) fn tool_command(command: Option<&str>, program: &str) -> Vec<String> {
    let parts: Vec<String> = command
        .unwrap_or(program)
        .split_whitespace()
        .map(str::to_string)
        .collect();
    if parts.is_empty() {
        vec![program.to_string()]
    } else {
        parts
    }
}

pub(crate) fn save_settings(settings: &SettingsFile) {
    if let Err(err) = settings.save() {
        lily_warn!("Could not save settings to {:?}: {}", settings.path(), err);
    }
}
