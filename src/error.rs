use thiserror::Error;

/// Errors raised while provisioning a device
#[derive(Debug, Error)]
pub enum Error {
    /// Required setting missing or malformed
    #[error("configuration error: {0}")]
    Config(String),

    /// PeeringDB answered with a non-success status
    #[error("failed to retrieve {endpoint} data: {status}")]
    Lookup {
        endpoint: &'static str,
        status: u16,
    },

    #[error("no PeeringDB network registered for AS{0}")]
    PeerNotFound(u32),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// TCP, SSH handshake or authentication failure
    #[error("connection failed: {0}")]
    Connection(String),

    /// Device refused a mode change (locked database, syntax error, ...)
    #[error("device rejected request: {0}")]
    DeviceState(String),

    /// I/O failure on an already open session
    #[error("session error: {0}")]
    Session(String),

    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
