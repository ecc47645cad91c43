//! UDP dispatch of collectd samples.
//!
//! Each [`CollectdClient::send`] assembles one [`collectd_net_core::Datagram`]
//! and hands it to the network as a single UDP datagram. There is no retry,
//! batching or delivery confirmation.

use std::net::SocketAddr;

pub mod client;
pub mod config;
pub mod error;
pub mod udp;

pub use client::{AsyncCollectdClient, CollectdClient};
pub use config::ClientConfig;
pub use error::{Result, TransportError};
pub use udp::{resolve, AsyncUdpTransport, UdpTransport};

pub use collectd_net_core::{Datagram, Sample};

/// Sends whole datagrams to a fixed destination
pub trait Transport {
    fn send(&self, data: &[u8]) -> Result<()>;
    fn peer_addr(&self) -> SocketAddr;
}

#[async_trait::async_trait]
pub trait AsyncTransport: Send + Sync {
    async fn send_async(&self, data: &[u8]) -> Result<()>;
    fn peer_addr(&self) -> SocketAddr;
}
