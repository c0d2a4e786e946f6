/// Crate-level error type.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Convenience type alias for fallible operations in this crate.
pub type FeedResult<T> = Result<T, FeedError>;
