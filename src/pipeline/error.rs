use std::time::Duration;

/// Errors that can stop a matching run
///
/// Bad peak data never ends up here: the matching stages degrade to empty
/// results instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    /// The run's cancel token was triggered
    #[error("Matching run was cancelled")]
    Cancelled,

    /// The run exceeded its time budget
    #[error("Matching run timed out after {0:?}")]
    TimedOut(Duration),

    /// Two queued files share a nickname, so their columns would collide
    #[error("Experimental file nickname '{0}' is used more than once")]
    DuplicateFile(String),
}
