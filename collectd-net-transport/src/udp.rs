use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs, UdpSocket};

use log::{debug, warn};

use crate::error::{Result, TransportError};
use crate::{AsyncTransport, Transport};

/// Resolve a collector host name to a socket address
///
/// IPv4 addresses win over IPv6 ones, see [`select_addr`].
pub fn resolve(host: &str, port: u16) -> Result<SocketAddr> {
    let addrs = (host, port).to_socket_addrs().map_err(|e| {
        warn!("Failed to resolve {}:{}: {}", host, port, e);
        resolve_error(host, port)
    })?;
    select_addr(addrs).ok_or_else(|| resolve_error(host, port))
}

/// Pick the first IPv4 address, or the first address when none is IPv4
pub fn select_addr(addrs: impl IntoIterator<Item = SocketAddr>) -> Option<SocketAddr> {
    let mut fallback = None;
    for addr in addrs {
        if addr.is_ipv4() {
            return Some(addr);
        }
        fallback.get_or_insert(addr);
    }
    fallback
}

fn resolve_error(host: &str, port: u16) -> TransportError {
    TransportError::Resolve {
        host: host.to_string(),
        port,
    }
}

/// Wildcard local address in the same family as the destination
fn local_bind_addr(peer: &SocketAddr) -> SocketAddr {
    let ip = match peer.ip() {
        IpAddr::V4(_) => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        IpAddr::V6(_) => IpAddr::V6(Ipv6Addr::UNSPECIFIED),
    };
    SocketAddr::new(ip, 0)
}

/// Blocking UDP transport with a fixed destination
///
/// The socket is non-blocking: a send either completes immediately or fails.
#[derive(Debug)]
pub struct UdpTransport {
    socket: UdpSocket,
    peer_addr: SocketAddr,
}

impl UdpTransport {
    /// Resolve `host:port` and create a transport sending there
    pub fn connect(host: &str, port: u16) -> Result<Self> {
        Self::with_addr(resolve(host, port)?)
    }

    /// Create a transport sending to an already resolved address
    pub fn with_addr(peer_addr: SocketAddr) -> Result<Self> {
        let socket = UdpSocket::bind(local_bind_addr(&peer_addr))?;
        socket.set_nonblocking(true)?;
        debug!(
            "UDP transport bound to {}, sending to {}",
            socket.local_addr()?,
            peer_addr
        );
        Ok(Self { socket, peer_addr })
    }

    /// Set the multicast TTL when the destination is an IPv4 multicast group
    pub fn set_multicast_ttl(&self, ttl: u32) -> Result<()> {
        match self.peer_addr.ip() {
            IpAddr::V4(ip) if ip.is_multicast() => {
                self.socket.set_multicast_ttl_v4(ttl)?;
                debug!("Multicast TTL for {} set to {}", self.peer_addr, ttl);
            }
            _ => debug!("Ignoring multicast TTL for {}", self.peer_addr),
        }
        Ok(())
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }
}

impl Transport for UdpTransport {
    fn send(&self, data: &[u8]) -> Result<()> {
        self.socket.send_to(data, self.peer_addr).map_err(|e| {
            warn!("Failed to send {} bytes to {}: {}", data.len(), self.peer_addr, e);
            TransportError::Transmission(e)
        })?;
        Ok(())
    }

    fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }
}

/// Tokio UDP transport with a fixed destination
#[derive(Debug)]
pub struct AsyncUdpTransport {
    socket: tokio::net::UdpSocket,
    peer_addr: SocketAddr,
}

impl AsyncUdpTransport {
    /// Resolve `host:port` and create a transport sending there
    pub async fn connect(host: &str, port: u16) -> Result<Self> {
        let addrs = tokio::net::lookup_host((host, port)).await.map_err(|e| {
            warn!("Failed to resolve {}:{}: {}", host, port, e);
            resolve_error(host, port)
        })?;
        let peer_addr = select_addr(addrs).ok_or_else(|| resolve_error(host, port))?;
        Self::with_addr(peer_addr).await
    }

    /// Create a transport sending to an already resolved address
    pub async fn with_addr(peer_addr: SocketAddr) -> Result<Self> {
        let socket = tokio::net::UdpSocket::bind(local_bind_addr(&peer_addr)).await?;
        debug!(
            "Async UDP transport bound to {}, sending to {}",
            socket.local_addr()?,
            peer_addr
        );
        Ok(Self { socket, peer_addr })
    }

    /// Set the multicast TTL when the destination is an IPv4 multicast group
    pub fn set_multicast_ttl(&self, ttl: u32) -> Result<()> {
        match self.peer_addr.ip() {
            IpAddr::V4(ip) if ip.is_multicast() => self.socket.set_multicast_ttl_v4(ttl)?,
            _ => debug!("Ignoring multicast TTL for {}", self.peer_addr),
        }
        Ok(())
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }
}

#[async_trait::async_trait]
impl AsyncTransport for AsyncUdpTransport {
    async fn send_async(&self, data: &[u8]) -> Result<()> {
        match self.socket.send_to(data, self.peer_addr).await {
            Ok(_) => Ok(()),
            Err(e) => {
                warn!("Failed to send {} bytes to {}: {}", data.len(), self.peer_addr, e);
                Err(TransportError::Transmission(e))
            }
        }
    }

    fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }
}
