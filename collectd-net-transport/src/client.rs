use std::net::SocketAddr;

use collectd_net_core::{Datagram, Sample};
use log::{debug, info};

use crate::config::ClientConfig;
use crate::error::Result;
use crate::udp::{AsyncUdpTransport, UdpTransport};
use crate::{AsyncTransport, Transport};

/// Sends samples to one collector, one datagram per sample
///
/// The destination and default interval are fixed at construction. A client
/// keeps no per-send state, so `send` may be called from several threads at
/// once when the transport allows it.
#[derive(Debug)]
pub struct CollectdClient<T = UdpTransport> {
    transport: T,
    config: ClientConfig,
}

impl CollectdClient<UdpTransport> {
    /// Create a client for `server:port` reporting `interval_secs` by default
    pub fn new(server: &str, port: u16, interval_secs: u64) -> Result<Self> {
        Self::from_config(&ClientConfig::new(server, port, interval_secs))
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let transport = UdpTransport::connect(&config.server, config.port)?;
        if let Some(ttl) = config.multicast_ttl {
            transport.set_multicast_ttl(ttl)?;
        }
        info!(
            "collectd client sending to {} (interval {}s)",
            transport.peer_addr(),
            config.interval_secs
        );
        Ok(Self::with_transport(transport, config))
    }
}

impl<T: Transport> CollectdClient<T> {
    /// Wrap an existing transport
    pub fn with_transport(transport: T, config: &ClientConfig) -> Self {
        Self {
            transport,
            config: config.clone(),
        }
    }

    /// Start a sample carrying this client's host and plugin defaults
    pub fn sample(&self, type_name: &str, values: Vec<f64>) -> Result<Sample> {
        self.config.sample(type_name, values)
    }

    /// Assemble the datagram `send` would transmit, without sending it
    pub fn encode(&self, sample: &Sample) -> Result<Datagram> {
        Ok(Datagram::assemble(sample, self.config.interval_secs)?)
    }

    /// Assemble `sample` and send it as exactly one UDP datagram
    ///
    /// Nothing is sent if assembly fails. Delivery is not confirmed.
    pub fn send(&self, sample: &Sample) -> Result<()> {
        let datagram = self.encode(sample)?;
        self.transport.send(datagram.as_bytes())?;
        debug!("Sent {} bytes to {}", datagram.len(), self.transport.peer_addr());
        Ok(())
    }

    pub fn destination(&self) -> SocketAddr {
        self.transport.peer_addr()
    }

    pub fn interval(&self) -> u64 {
        self.config.interval_secs
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

/// Async counterpart of [`CollectdClient`]
#[derive(Debug)]
pub struct AsyncCollectdClient<T = AsyncUdpTransport> {
    transport: T,
    config: ClientConfig,
}

impl AsyncCollectdClient<AsyncUdpTransport> {
    pub async fn from_config(config: &ClientConfig) -> Result<Self> {
        let transport = AsyncUdpTransport::connect(&config.server, config.port).await?;
        if let Some(ttl) = config.multicast_ttl {
            transport.set_multicast_ttl(ttl)?;
        }
        info!(
            "collectd client sending to {} (interval {}s)",
            transport.peer_addr(),
            config.interval_secs
        );
        Ok(Self::with_transport(transport, config))
    }
}

impl<T: AsyncTransport> AsyncCollectdClient<T> {
    pub fn with_transport(transport: T, config: &ClientConfig) -> Self {
        Self {
            transport,
            config: config.clone(),
        }
    }

    pub fn sample(&self, type_name: &str, values: Vec<f64>) -> Result<Sample> {
        self.config.sample(type_name, values)
    }

    pub fn encode(&self, sample: &Sample) -> Result<Datagram> {
        Ok(Datagram::assemble(sample, self.config.interval_secs)?)
    }

    /// Assemble `sample` and send it as exactly one UDP datagram
    pub async fn send(&self, sample: &Sample) -> Result<()> {
        let datagram = self.encode(sample)?;
        self.transport.send_async(datagram.as_bytes()).await?;
        debug!("Sent {} bytes to {}", datagram.len(), self.transport.peer_addr());
        Ok(())
    }

    pub fn destination(&self) -> SocketAddr {
        self.transport.peer_addr()
    }

    pub fn interval(&self) -> u64 {
        self.config.interval_secs
    }
}
