use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use lilyconv_core::JobId;
use lilyconv_logging::lily_error;

use crate::job::Job;
use crate::runner::{JobRunner, ProcessRunner};
use crate::EngineEvent;

enum EngineCommand {
    Run { job_id: JobId, job: Job },
}

/// Runs jobs on a background tokio runtime; completions come back as
/// [`EngineEvent`]s on the caller's thread.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new() -> Self {
        Self::with_runner(Arc::new(ProcessRunner))
    }

    pub fn with_runner(runner: Arc<dyn JobRunner>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            while let Ok(command) = cmd_rx.recv() {
                let runner = runner.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(runner.as_ref(), command, event_tx).await;
                });
            }
        });

        Self { cmd_tx, event_rx }
    }

    pub fn run(&self, job_id: JobId, job: Job) {
        if self.cmd_tx.send(EngineCommand::Run { job_id, job }).is_err() {
            lily_error!("Engine thread has stopped; job {job_id} was not started");
        }
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Block until the next event; `None` once the engine thread is gone.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

impl Default for EngineHandle {
    fn default() -> Self {
        Self::new()
    }
}

async fn handle_command(
    runner: &dyn JobRunner,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Run { job_id, job } => {
            let outcome = runner.run(job).await;
            let _ = event_tx.send(EngineEvent::JobFinished { job_id, outcome });
        }
    }
}
