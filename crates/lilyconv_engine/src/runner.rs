use crate::job::{Job, JobOutcome};

/// Executes jobs. The engine runs every job through this seam.
#[async_trait::async_trait]
pub trait JobRunner: Send + Sync {
    async fn run(&self, job: Job) -> JobOutcome;
}

/// Runs jobs as real OS processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

#[async_trait::async_trait]
impl JobRunner for ProcessRunner {
    async fn run(&self, job: Job) -> JobOutcome {
        job.start().wait().await
    }
}
