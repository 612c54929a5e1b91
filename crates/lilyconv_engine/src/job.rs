//! One external-process invocation.

use std::process::Stdio;

use encoding_rs::{Encoding, UTF_8};
use lilyconv_core::{JobReport, JobRequest};
use lilyconv_logging::{lily_debug, lily_info, lily_warn};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::sync::oneshot;

use crate::decode::encoding_for_label;

/// A process to run: command line, environment overrides and optional input.
///
/// A `Job` is consumed by [`Job::start`] or [`Job::run`]; running the same
/// command again means building a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    command: Vec<String>,
    environment: Vec<(String, Option<String>)>,
    encoding: &'static Encoding,
    input: Option<Vec<u8>>,
}

impl Job {
    /// An unknown encoding label falls back to UTF-8.
    pub fn new(command: Vec<String>, encoding: &str) -> Self {
        let encoding = encoding_for_label(encoding).unwrap_or_else(|| {
            lily_warn!("Unknown encoding '{encoding}', using UTF-8");
            UTF_8
        });
        Self {
            command,
            environment: Vec::new(),
            encoding,
            input: None,
        }
    }

    pub fn from_request(request: &JobRequest) -> Self {
        let mut job = Self::new(request.command.clone(), &request.encoding);
        for (key, value) in &request.environment {
            job.set_env(key.clone(), value.clone());
        }
        if let Some(input) = &request.input {
            job.set_input(input);
        }
        job
    }

    pub fn program(&self) -> &str {
        self.command.first().map(String::as_str).unwrap_or_default()
    }

    pub fn command(&self) -> &[String] {
        &self.command
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    pub fn add_argument(&mut self, argument: impl Into<String>) {
        self.command.push(argument.into());
    }

    /// Override an environment variable; `None` removes it from the child's
    /// environment. A later override of the same key wins.
    pub fn set_env(&mut self, key: impl Into<String>, value: Option<String>) {
        let key = key.into();
        self.environment.retain(|(existing, _)| *existing != key);
        self.environment.push((key, value));
    }

    /// Text written to the process's stdin, encoded with the job encoding.
    pub fn set_input(&mut self, text: &str) {
        let (bytes, _, had_errors) = self.encoding.encode(text);
        if had_errors {
            lily_warn!(
                "Input for {} is not representable in {}; unmappable characters were replaced",
                self.program(),
                self.encoding.name()
            );
        }
        self.input = Some(bytes.into_owned());
    }

    /// Spawn the job on the current tokio runtime.
    ///
    /// Must be called from within a runtime context.
    pub fn start(self) -> JobHandle {
        let (done_tx, done_rx) = oneshot::channel();
        let program = self.program().to_string();
        let encoding = self.encoding;
        tokio::spawn(async move {
            let outcome = self.run().await;
            let _ = done_tx.send(outcome);
        });
        JobHandle {
            program,
            encoding,
            done_rx,
        }
    }

    /// Run the process to completion and capture its output.
    pub async fn run(self) -> JobOutcome {
        let Some((program, arguments)) = self.command.split_first() else {
            lily_warn!("Refusing to start a job without a program");
            return JobOutcome::start_failure("", self.encoding, "no program given");
        };

        let mut command = Command::new(program);
        command
            .args(arguments)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(if self.input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            });
        for (key, value) in &self.environment {
            match value {
                Some(value) => command.env(key, value),
                None => command.env_remove(key),
            };
        }

        lily_info!("Starting {}", self.command.join(" "));
        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(err) => {
                lily_warn!("Could not start {program}: {err}");
                return JobOutcome::start_failure(program, self.encoding, err.to_string());
            }
        };

        // The input is written alongside draining stdout and stderr so a
        // full pipe on either side cannot stall the other.
        let writer = match (child.stdin.take(), self.input) {
            (Some(mut stdin), Some(input)) => Some(tokio::spawn(async move {
                let result = stdin.write_all(&input).await;
                drop(stdin);
                result
            })),
            _ => None,
        };

        let output = child.wait_with_output().await;

        if let Some(writer) = writer {
            match writer.await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => lily_warn!("Writing input to {program} failed: {err}"),
                Err(err) => lily_warn!("Input writer for {program} did not finish: {err}"),
            }
        }

        match output {
            Ok(output) => {
                let exit_code = output.status.code();
                lily_info!("{program} exited with {exit_code:?}");
                lily_debug!(
                    "{program} wrote {} bytes to stdout and {} bytes to stderr",
                    output.stdout.len(),
                    output.stderr.len()
                );
                JobOutcome {
                    program: program.clone(),
                    encoding: self.encoding,
                    failed_to_start: false,
                    error: None,
                    success: output.status.success(),
                    exit_code,
                    stdout: output.stdout,
                    stderr: output.stderr,
                }
            }
            Err(err) => {
                lily_warn!("Lost track of {program}: {err}");
                JobOutcome {
                    program: program.clone(),
                    encoding: self.encoding,
                    failed_to_start: false,
                    error: Some(err.to_string()),
                    success: false,
                    exit_code: None,
                    stdout: Vec::new(),
                    stderr: Vec::new(),
                }
            }
        }
    }
}

/// Completion of a started [`Job`], delivered once.
#[derive(Debug)]
pub struct JobHandle {
    program: String,
    encoding: &'static Encoding,
    done_rx: oneshot::Receiver<JobOutcome>,
}

impl JobHandle {
    pub fn program(&self) -> &str {
        &self.program
    }

    pub async fn wait(self) -> JobOutcome {
        match self.done_rx.await {
            Ok(outcome) => outcome,
            Err(_) => {
                lily_warn!("Job for {} was dropped before completing", self.program);
                JobOutcome::start_failure(
                    &self.program,
                    self.encoding,
                    "the job was dropped before it completed",
                )
            }
        }
    }

    /// Call `done` with the outcome on the current runtime.
    pub fn on_done<F>(self, done: F)
    where
        F: FnOnce(JobOutcome) + Send + 'static,
    {
        tokio::spawn(async move {
            done(self.wait().await);
        });
    }
}

/// What a finished job produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobOutcome {
    program: String,
    encoding: &'static Encoding,
    failed_to_start: bool,
    error: Option<String>,
    success: bool,
    exit_code: Option<i32>,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
}

impl JobOutcome {
    pub fn start_failure(
        program: &str,
        encoding: &'static Encoding,
        error: impl Into<String>,
    ) -> Self {
        Self {
            program: program.to_string(),
            encoding,
            failed_to_start: true,
            error: Some(error.into()),
            success: false,
            exit_code: None,
            stdout: Vec::new(),
            stderr: Vec::new(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn failed_to_start(&self) -> bool {
        self.failed_to_start
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The process ran and exited with status zero.
    pub fn success(&self) -> bool {
        self.success
    }

    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    pub fn stdout(&self) -> String {
        self.decode(&self.stdout, "stdout")
    }

    pub fn stderr(&self) -> String {
        self.decode(&self.stderr, "stderr")
    }

    pub fn to_report(&self) -> JobReport {
        JobReport {
            program: self.program.clone(),
            failed_to_start: self.failed_to_start,
            error: self.error.clone(),
            success: self.success,
            exit_code: self.exit_code,
            stdout: self.stdout(),
            stderr: self.stderr(),
        }
    }

    fn decode(&self, bytes: &[u8], stream: &str) -> String {
        let (text, had_errors) = self.encoding.decode_without_bom_handling(bytes);
        if had_errors {
            lily_warn!(
                "{} wrote {stream} that is not valid {}; replaced undecodable bytes",
                self.program,
                self.encoding.name()
            );
        }
        text.into_owned()
    }
}
