//! Error types for transport operations

/// Result type for transport operations
pub type TransportResult<T> = std::result::Result<T, TransportError>;

/// Errors raised while executing a request against the search service.
///
/// The message-carrying variants display their message verbatim; it ends up
/// as the user-visible `last_error` of the failed operation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    /// Request exceeded its deadline
    #[error("{0}")]
    Timeout(String),

    /// Connection could not be established
    #[error("{0}")]
    Connect(String),

    /// Any other failure while sending or receiving
    #[error("{0}")]
    Request(String),

    /// Service answered with a non-success status
    #[error("Search service returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Body could not be encoded or decoded
    #[error("Malformed body: {0}")]
    Decode(String),

    /// HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    Client(String),
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        TransportError::Decode(err.to_string())
    }
}
