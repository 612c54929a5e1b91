//! Run lifecycle shared by the conversion and import dialogs.

use crate::{JobId, JobReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunPhase {
    #[default]
    Idle,
    Running {
        job_id: JobId,
    },
    Succeeded,
    StartFailed,
}

/// Facts about the process the dialogs run in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HostEnvironment {
    /// Running from a packaged macOS application bundle.
    pub inside_app_bundle: bool,
}

impl HostEnvironment {
    pub(crate) fn interpreter_overrides(&self) -> Vec<(String, Option<String>)> {
        if self.inside_app_bundle {
            vec![("PYTHONPATH".to_string(), None), ("PYTHONHOME".to_string(), None)]
        } else {
            Vec::new()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Completion {
    /// Not the job in flight; ignore it.
    Stale,
    StartFailed,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct DialogBase {
    last_job_id: JobId,
    phase: RunPhase,
    messages: String,
    dirty: bool,
}

impl DialogBase {
    pub(crate) fn phase(&self) -> RunPhase {
        self.phase
    }

    pub(crate) fn is_running(&self) -> bool {
        matches!(self.phase, RunPhase::Running { .. })
    }

    pub(crate) fn messages(&self) -> &str {
        &self.messages
    }

    pub(crate) fn set_messages(&mut self, text: impl Into<String>) {
        self.messages = text.into();
        self.dirty = true;
    }

    /// Append a notice as its own paragraph.
    pub(crate) fn append_message(&mut self, notice: &str) {
        if !self.messages.is_empty() {
            if !self.messages.ends_with('\n') {
                self.messages.push('\n');
            }
            self.messages.push('\n');
        }
        self.messages.push_str(notice);
        self.dirty = true;
    }

    /// Start tracking a new job. Any earlier job in flight is superseded.
    pub(crate) fn begin_job(&mut self) -> JobId {
        self.last_job_id += 1;
        self.phase = RunPhase::Running {
            job_id: self.last_job_id,
        };
        self.dirty = true;
        self.last_job_id
    }

    pub(crate) fn complete(&mut self, job_id: JobId, report: &JobReport) -> Completion {
        if self.phase != (RunPhase::Running { job_id }) {
            return Completion::Stale;
        }
        self.dirty = true;
        if report.failed_to_start {
            self.phase = RunPhase::StartFailed;
            self.messages = report.start_failure_message();
            Completion::StartFailed
        } else {
            self.phase = RunPhase::Succeeded;
            self.messages = report.stderr.clone();
            Completion::Finished
        }
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}
