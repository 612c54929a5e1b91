//! Asking a tool which LilyPond version it belongs to.

use crate::job::{Job, JobOutcome};
use crate::runner::JobRunner;

/// `<tool> --version`, with the same command prefix used for conversions.
pub fn version_job(command: &[String]) -> Job {
    let mut job = Job::new(command.to_vec(), "UTF-8");
    job.add_argument("--version");
    job
}

/// First `x.y` or `x.y.z` token in the tool's version banner, e.g.
/// `convert-ly (GNU LilyPond) 2.24.3` gives `2.24.3`.
pub fn parse_version_output(output: &str) -> Option<String> {
    output
        .split_whitespace()
        .map(|token| token.trim_matches(|c: char| !c.is_ascii_alphanumeric()))
        .find(|token| is_version(token))
        .map(str::to_string)
}

fn is_version(token: &str) -> bool {
    let parts: Vec<&str> = token.split('.').collect();
    (2..=3).contains(&parts.len())
        && parts
            .iter()
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()))
}

/// The version in a finished [`version_job`]. Tools print the banner on
/// stdout or stderr depending on their age, so both are searched.
pub fn version_from_outcome(outcome: &JobOutcome) -> Option<String> {
    if outcome.failed_to_start() {
        return None;
    }
    parse_version_output(&outcome.stdout()).or_else(|| parse_version_output(&outcome.stderr()))
}

pub async fn probe_version(runner: &dyn JobRunner, command: &[String]) -> Option<String> {
    version_from_outcome(&runner.run(version_job(command)).await)
}
