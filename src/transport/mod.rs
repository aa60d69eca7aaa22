pub mod udp;

use std::net::SocketAddr;
use async_trait::async_trait;
use bytes::Bytes;
#[cfg(test)] use mockall::automock;
use crate::error::DatagrumpError;

/// A datagram as it came off the wire, with the local time of its arrival
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedDatagram {
    pub payload: Bytes,
    pub source: SocketAddr,
    pub timestamp: u64,
}

/// This is an abstraction for datagram I/O, introduced to decouple the protocol's event loops from
///  actual sockets (and to facilitate in-memory testing).
///
/// All futures returned by this trait must be cancel safe: the event loops race them against each
///  other and against timers, dropping the ones that lose.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DatagramTransport: Send + Sync + 'static {
    /// Sends to the peer this transport is connected to
    async fn send(&self, datagram: &[u8]) -> Result<(), DatagrumpError>;

    async fn send_to(&self, to: SocketAddr, datagram: &[u8]) -> Result<(), DatagrumpError>;

    /// Waits for the next datagram. Datagrams exceeding the transport's maximum size are an error,
    ///  not a truncated result.
    async fn recv(&self) -> Result<ReceivedDatagram, DatagrumpError>;

    /// Resolves when the transport can (probably) accept another datagram without waiting
    async fn writable(&self) -> Result<(), DatagrumpError>;

    fn local_addr(&self) -> Result<SocketAddr, DatagrumpError>;
}
