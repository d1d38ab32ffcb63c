use thiserror::Error;

/// Failure to turn an artifact file into a model
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid artifact: {0}")]
    Invalid(String),
}

impl ArtifactError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}
