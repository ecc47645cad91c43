use std::io;

use collectd_net_core::EncodeError;

/// Result type alias for transport operations
pub type Result<T, E = TransportError> = std::result::Result<T, E>;

/// Errors reported by [`crate::CollectdClient::send`] and friends
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Encoding failed: {0}")]
    Encode(#[from] EncodeError),
    #[error("Transmission failed: {0}")]
    Transmission(#[from] io::Error),
    #[error("Could not resolve collector address {host}:{port}")]
    Resolve { host: String, port: u16 },
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl TransportError {
    /// Whether the datagram never left because the sample itself was invalid
    pub fn is_encoding(&self) -> bool {
        matches!(self, TransportError::Encode(_))
    }
}
