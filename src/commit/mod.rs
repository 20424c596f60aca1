//! AI-generated commit messages from staged changes.

pub mod generator;
pub mod message;
pub mod pipeline;
pub mod prompt;
pub mod sink;

pub use generator::MessageGenerator;
pub use message::GeneratedMessage;
pub use pipeline::{NO_STAGED_CHANGES_NOTICE, Outcome, Pipeline};
pub use prompt::build_commit_prompt;
pub use sink::{EditableSink, FileSink, MessageSink, StdoutSink};
