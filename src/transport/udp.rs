use std::net::SocketAddr;
use std::sync::Arc;
use async_trait::async_trait;
use bytes::BytesMut;
use tokio::net::UdpSocket;
use tokio::sync::Mutex;
use tracing::{debug, info, trace};
use crate::clock::Clock;
use crate::error::DatagrumpError;
use crate::transport::{DatagramTransport, ReceivedDatagram};

/// [DatagramTransport] on a tokio [UdpSocket]. Arrival timestamps are taken from the [Clock] as
///  soon as a datagram is read from the socket.
pub struct UdpTransport {
    socket: UdpSocket,
    max_datagram_size: usize,
    clock: Arc<dyn Clock>,
    /// One byte bigger than `max_datagram_size` so that oversized datagrams can be detected
    receive_buffer: Mutex<BytesMut>,
}

impl UdpTransport {
    pub async fn bind(addr: SocketAddr, max_datagram_size: usize, clock: Arc<dyn Clock>) -> anyhow::Result<UdpTransport> {
        let socket = UdpSocket::bind(addr).await?;
        info!("bound UDP socket to {:?}", socket.local_addr()?);

        Ok(UdpTransport {
            socket,
            max_datagram_size,
            clock,
            receive_buffer: Mutex::new(BytesMut::with_capacity(max_datagram_size + 1)),
        })
    }

    /// This does not send anything, it just fixes the destination for [DatagramTransport::send]
    ///  and filters incoming datagrams to those from `peer`.
    pub async fn connect(&self, peer: SocketAddr) -> anyhow::Result<()> {
        self.socket.connect(peer).await?;
        debug!("connected UDP socket to {:?}", peer);
        Ok(())
    }

    pub fn peer_addr(&self) -> Result<SocketAddr, DatagrumpError> {
        Ok(self.socket.peer_addr()?)
    }
}

#[async_trait]
impl DatagramTransport for UdpTransport {
    async fn send(&self, datagram: &[u8]) -> Result<(), DatagrumpError> {
        trace!("UDP socket: sending {} bytes to connected peer", datagram.len());
        self.socket.send(datagram).await?;
        Ok(())
    }

    async fn send_to(&self, to: SocketAddr, datagram: &[u8]) -> Result<(), DatagrumpError> {
        trace!("UDP socket: sending {} bytes to {:?}", datagram.len(), to);
        self.socket.send_to(datagram, to).await?;
        Ok(())
    }

    async fn recv(&self) -> Result<ReceivedDatagram, DatagrumpError> {
        let mut buf = self.receive_buffer.lock().await;
        buf.resize(self.max_datagram_size + 1, 0);

        let (num_read, source) = self.socket.recv_from(buf.as_mut()).await?;
        let timestamp = self.clock.now_ms();

        if num_read > self.max_datagram_size {
            buf.clear();
            return Err(DatagrumpError::OversizedDatagram { max: self.max_datagram_size });
        }

        buf.truncate(num_read);
        trace!("UDP socket: received {} bytes from {:?}", num_read, source);
        Ok(ReceivedDatagram {
            payload: buf.split().freeze(),
            source,
            timestamp,
        })
    }

    async fn writable(&self) -> Result<(), DatagrumpError> {
        self.socket.writable().await?;
        Ok(())
    }

    fn local_addr(&self) -> Result<SocketAddr, DatagrumpError> {
        Ok(self.socket.local_addr()?)
    }
}
