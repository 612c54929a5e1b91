use std::sync::Arc;

use lilyconv_core::{Effect, JobId, JobReport};
use lilyconv_engine::{
    version_from_outcome, version_job, EngineEvent, EngineHandle, Job, JobRunner, ProcessRunner,
};
use lilyconv_logging::{lily_debug, lily_info, lily_warn};

/// Job id reserved for version probes; dialog jobs count up from 1.
const PROBE_JOB_ID: JobId = 0;

/// Executes dialog effects on the engine and hands completions back as
/// reports.
pub(crate) struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub(crate) fn new() -> Self {
        Self::with_runner(Arc::new(ProcessRunner))
    }

    pub(crate) fn with_runner(runner: Arc<dyn JobRunner>) -> Self {
        Self {
            engine: EngineHandle::with_runner(runner),
        }
    }

    pub(crate) fn execute(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartJob { job_id, request } => {
                    lily_info!("StartJob job_id={} command={:?}", job_id, request.command);
                    self.engine.run(job_id, Job::from_request(&request));
                }
            }
        }
    }

    /// Block until a job finishes. `None` once the engine is gone.
    pub(crate) fn next_report(&self) -> Option<(JobId, JobReport)> {
        loop {
            let EngineEvent::JobFinished { job_id, outcome } = self.engine.recv()?;
            if job_id == PROBE_JOB_ID {
                lily_debug!("Dropping late version probe result");
                continue;
            }
            if outcome.failed_to_start() {
                lily_warn!(
                    "Job {} could not start {}: {}",
                    job_id,
                    outcome.program(),
                    outcome.error().unwrap_or_default()
                );
            } else if !outcome.success() {
                lily_warn!(
                    "Job {} ({}) exited with {:?}",
                    job_id,
                    outcome.program(),
                    outcome.exit_code()
                );
            }
            return Some((job_id, outcome.to_report()));
        }
    }

    /// Ask the tool for its version, blocking until it answers.
    pub(crate) fn probe_version(&self, command: &[String]) -> Option<String> {
        self.engine.run(PROBE_JOB_ID, version_job(command));
        loop {
            let EngineEvent::JobFinished { job_id, outcome } = self.engine.recv()?;
            if job_id != PROBE_JOB_ID {
                lily_warn!("Ignoring job {} while probing the tool version", job_id);
                continue;
            }
            if outcome.failed_to_start() {
                lily_warn!(
                    "Could not ask {} for its version: {}",
                    outcome.program(),
                    outcome.error().unwrap_or_default()
                );
                return None;
            }
            let version = version_from_outcome(&outcome);
            lily_info!("{} reports version {:?}", outcome.program(), version);
            return version;
        }
    }
}
