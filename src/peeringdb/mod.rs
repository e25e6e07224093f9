pub mod client;
pub mod types;

pub use client::PeeringDbClient;
pub use types::PeerRecord;
