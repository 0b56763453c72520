//! Error types shared across QuizReel crates.
//!
//! Only fatal conditions are represented here. Missing or undecodable
//! media is recoverable and handled by the component that asked for it.

/// Top-level error type for QuizReel operations.
#[derive(Debug, thiserror::Error)]
pub enum QuizError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Malformed question #{index}: {message}")]
    MalformedQuestion { index: usize, message: String },

    #[error("Failed to assemble clip '{label}': {source}")]
    Clip {
        label: String,
        #[source]
        source: Box<QuizError>,
    },

    #[error("Layer error: {message}")]
    Layer { message: String },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Unsupported operation: {message}")]
    Unsupported { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using QuizError.
pub type QuizResult<T> = Result<T, QuizError>;

impl QuizError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn layer(msg: impl Into<String>) -> Self {
        Self::Layer {
            message: msg.into(),
        }
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported {
            message: msg.into(),
        }
    }

    /// Wrap an error with the label of the clip being assembled.
    pub fn in_clip(self, label: impl Into<String>) -> Self {
        Self::Clip {
            label: label.into(),
            source: Box::new(self),
        }
    }

    /// Whether this error aborts a run because of bad configuration
    /// (as opposed to a rendering or I/O failure further down).
    pub fn is_configuration(&self) -> bool {
        match self {
            Self::Config { .. } | Self::MalformedQuestion { .. } => true,
            Self::Clip { source, .. } => source.is_configuration(),
            _ => false,
        }
    }
}
