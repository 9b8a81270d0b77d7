use thiserror::Error;

/// Errors produced by the editor core
#[derive(Debug, Error)]
pub enum EditorError {
    /// The byte source is not an image we can decode
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// The bitmap could not be encoded for export
    #[error("Failed to encode image: {0}")]
    Encode(String),

    /// The operation needs state that does not exist yet (usually an image)
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(&'static str),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for editor operations
pub type EditorResult<T> = Result<T, EditorError>;
