use lilyconv_core::JobId;

use crate::job::JobOutcome;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    JobFinished { job_id: JobId, outcome: JobOutcome },
}
