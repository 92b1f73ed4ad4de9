//! Error types for rust-netconf

use thiserror::Error;

/// Main error type for NETCONF client operations
#[derive(Debug, Error)]
pub enum NetconfError {
    /// Transport establishment or mid-session failure
    #[error("connection error: {0}")]
    Connection(String),

    /// The peer rejected or could not process an RPC.
    /// `payload` carries the original `<rpc-error>` XML from the reply.
    #[error("rpc error: {message}")]
    Rpc {
        /// Human-readable message extracted from the error reply
        message: String,
        /// Serialized `<rpc-error>` element(s) as received from the peer
        payload: String,
    },

    /// A request could not be constructed from the given input
    /// (unparsable dispatch command, config fragment, or filter)
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// XML encoding or decoding error
    #[error("XML error: {0}")]
    Xml(String),

    /// Extension point invoked without a device-specific override
    #[error("{0} is not implemented for this device")]
    NotImplemented(&'static str),

    /// IO error (file transfer overrides)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error (capability report)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for NETCONF client operations
pub type Result<T> = std::result::Result<T, NetconfError>;
