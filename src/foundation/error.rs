/// Crate-wide result alias.
pub type BoardcastResult<T> = Result<T, BoardcastError>;

/// Error taxonomy for the rendering pipeline.
///
/// All variants are fatal from the caller's perspective: a failed render
/// never returns partial output.
#[derive(thiserror::Error, Debug)]
pub enum BoardcastError {
    /// Invalid caller-supplied options or parameters.
    #[error("validation error: {0}")]
    Validation(String),

    /// Broken render configuration: missing/undecodable sprite or font asset.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The rules engine rejected a move while replaying a history prefix.
    #[error("engine error: {0}")]
    Engine(String),

    /// Failure while encoding frames into the output container.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error with context.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BoardcastError {
    /// Build a [`BoardcastError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`BoardcastError::Configuration`].
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Build a [`BoardcastError::Engine`].
    pub fn engine(msg: impl Into<String>) -> Self {
        Self::Engine(msg.into())
    }

    /// Build a [`BoardcastError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}
