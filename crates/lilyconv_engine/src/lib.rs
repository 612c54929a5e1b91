//! lilyconv engine: external processes, file IO and effect execution.
mod decode;
mod engine;
mod environment;
mod job;
mod persist;
mod probe;
mod runner;
mod types;

pub use decode::{
    decode_document, encode_document, encoding_for_label, DecodeError, DecodedText,
};
pub use engine::EngineHandle;
pub use environment::host_environment;
pub use job::{Job, JobHandle, JobOutcome};
pub use persist::{
    ensure_output_dir, write_file, write_text_file, AtomicFileWriter, PersistError,
};
pub use probe::{parse_version_output, probe_version, version_from_outcome, version_job};
pub use runner::{JobRunner, ProcessRunner};
pub use types::EngineEvent;
