pub mod peering;
pub mod ports;

use crate::error::Error;

/// Map a failed device task (panic or cancellation) into a session error
fn join_error(e: tokio::task::JoinError) -> Error {
    Error::Session(format!("device task failed: {}", e))
}

/// Unique scratch file for tests that need real paths
#[cfg(test)]
pub(crate) fn scratch_file(name: &str, content: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("ix-provision-{}-{}", std::process::id(), name));
    std::fs::write(&path, content).unwrap();
    path
}
