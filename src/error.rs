//! Crate error types
//!
//! Every failure the core can produce is contained at the component where it
//! occurs and converted into "no result for this unit of work"; none of these
//! variants is allowed to abort a source's `start()` task.

/// Error type for cache, discovery and ingestion operations
#[derive(Debug, Clone)]
pub enum Error {
    /// Cache loader failed or produced no update; contents are preserved
    Load(String),
    /// Program discovery failed for a tag (upstream unreachable or malformed)
    Discovery { tag: String, message: String },
    /// Programs were found for a tag but none satisfied the matching policy
    Match { tag: String },
    /// Ingestion connection failed or dropped mid-stream
    Transport { program: String, message: String },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Load(message) => write!(f, "Cache load produced no update: {}", message),
            Error::Discovery { tag, message } => {
                write!(f, "Program discovery failed for tag {}: {}", tag, message)
            }
            Error::Match { tag } => write!(f, "No acceptable program for tag {}", tag),
            Error::Transport { program, message } => {
                write!(f, "Transport failed for program {}: {}", program, message)
            }
        }
    }
}

impl std::error::Error for Error {}

/// Convenience result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
