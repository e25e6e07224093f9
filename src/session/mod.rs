mod platform;
mod ssh;
mod transaction;

use std::fmt;
use std::net::IpAddr;
use std::time::Duration;

use crate::error::{Error, Result};

pub use platform::Platform;
pub use ssh::SshSession;
pub use transaction::{push_peering, push_ports, ConfigTransaction, Outcome, TransactionState};

/// How to talk to a device once the TCP connection is up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    pub platform: Platform,
    /// Applied to connect, handshake and every read while waiting for a prompt
    pub timeout: Duration,
}

/// Where and as whom to log in. Validated on construction, immutable afterwards.
#[derive(Clone)]
pub struct DeviceTarget {
    host: String,
    username: String,
    password: String,
    port: u16,
    transport: TransportConfig,
}

impl DeviceTarget {
    pub fn new(
        host: &str,
        username: &str,
        password: String,
        port: u16,
        transport: TransportConfig,
    ) -> Result<Self> {
        let host = host.trim();
        if !is_valid_host(host) {
            return Err(Error::Config(format!("invalid device address: {:?}", host)));
        }
        if username.trim().is_empty() {
            return Err(Error::Config("device username is empty".to_string()));
        }
        if port == 0 {
            return Err(Error::Config("SSH port must be non-zero".to_string()));
        }

        Ok(Self {
            host: host.to_string(),
            username: username.to_string(),
            password,
            port,
            transport,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn transport(&self) -> &TransportConfig {
        &self.transport
    }
}

impl fmt::Debug for DeviceTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceTarget")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("port", &self.port)
            .field("transport", &self.transport)
            .finish()
    }
}

/// An IP literal, or a hostname made of alphanumerics, hyphens, dots and underscores
fn is_valid_host(host: &str) -> bool {
    if host.parse::<IpAddr>().is_ok() {
        return true;
    }
    if host.is_empty() || host.len() > 253 {
        return false;
    }
    host.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.' || c == '_')
}

/// An open CLI session on a network device.
///
/// Implementations own the underlying connection; `close` must be safe to
/// call more than once.
pub trait DeviceSession {
    /// Enter configuration mode, failing with `DeviceState` if the device refuses
    fn enter_config_mode(&mut self) -> Result<String>;

    /// Send every line of the batch in order and return the device echo
    fn send_config_set(&mut self, commands: &[String]) -> Result<String>;

    /// Show the uncommitted candidate configuration
    fn pending_diff(&mut self) -> Result<String>;

    /// Activate the candidate and leave configuration mode
    fn commit(&mut self) -> Result<String>;

    /// Drop the candidate and leave configuration mode
    fn discard(&mut self) -> Result<String>;

    /// Leave configuration mode without touching the candidate
    fn exit_config_mode(&mut self) -> Result<String>;

    fn close(&mut self);
}
