use thiserror::Error;

/// Failure to read a weight out of a manufacturer data buffer
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Invalid payload: expected at least 5 bytes, got {len}")]
    InvalidPayload { len: usize },
}

/// Errors surfaced by the adapter to its integration point
#[derive(Error, Debug)]
pub enum Error {
    /// The host framework rejected a registration or notification.
    #[error("Device sink error: {0}")]
    Sink(#[source] anyhow::Error),

    #[error("BLE error: {0}")]
    Ble(#[from] bluest::Error),

    #[error("Default BLE adapter not found")]
    AdapterUnavailable,

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
