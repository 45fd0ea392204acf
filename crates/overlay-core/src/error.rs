use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OverlayError {
    /// The overlay layout map or the reference PDF could not be loaded.
    #[error("Failed to load {resource}: {reason}")]
    ResourceLoad { resource: String, reason: String },

    /// A required upload was not chosen before starting an action.
    #[error("{0}")]
    MissingFile(String),

    /// The server answered with a non-success status.
    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Browser API error: {0}")]
    Js(String),
}

impl OverlayError {
    pub fn resource_load(resource: impl Into<String>, reason: impl Into<String>) -> Self {
        OverlayError::ResourceLoad {
            resource: resource.into(),
            reason: reason.into(),
        }
    }

    /// Whether initialization has to stop after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, OverlayError::ResourceLoad { .. })
    }
}

impl From<serde_json::Error> for OverlayError {
    fn from(e: serde_json::Error) -> Self {
        OverlayError::Decode(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, OverlayError>;
