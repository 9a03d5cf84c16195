use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

/// Per-identifier failures. None of these abort the run; the loop logs
/// them and moves on to the next identifier.
#[derive(Debug, Error)]
pub enum Error {
    #[error("fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("page structure mismatch: {0}")]
    Extract(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not encode record: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Which stage failed, as reported in the per-identifier log line.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Fetch { .. } => "fetch",
            Error::Extract(_) => "extract",
            Error::Io(_) | Error::Json(_) => "persist",
        }
    }
}
