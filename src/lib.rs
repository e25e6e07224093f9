//! Push IX peering and switch port configuration to network devices.
//!
//! Two pipelines share one device workflow:
//!
//! * `ix-peer-config` looks a peer up in PeeringDB, renders BGP neighbor
//!   stanzas for the chosen exchange and commits them on the edge router
//!   after the operator has reviewed the diff.
//! * `member-port-config` renders one interface stanza per row of a port
//!   sheet and loads the batch onto an access switch.

pub mod config;
pub mod error;
pub mod exchange;
pub mod peeringdb;
pub mod pipeline;
pub mod ports;
pub mod prompt;
pub mod render;
pub mod session;

pub use error::{Error, Result};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing. Logs go to stderr so device output on stdout stays readable.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ix_provision=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
