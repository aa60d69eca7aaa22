use std::future::pending;
use std::net::SocketAddr;
use std::sync::{Arc, PoisonError};
use std::time::Duration;
use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::{mpsc, Mutex};
use tokio::time::{self, Instant};
use tracing::{debug, trace};
use crate::clock::Clock;
use crate::error::DatagrumpError;
use crate::transport::{DatagramTransport, ReceivedDatagram};

type DropFilter = Box<dyn FnMut(&[u8]) -> bool + Send>;

struct InFlight {
    deliver_at: Instant,
    source: SocketAddr,
    payload: Bytes,
}

struct Inbox {
    rx: mpsc::UnboundedReceiver<InFlight>,
    /// taken from the channel but not yet delivered, kept here so that `recv` is cancel safe
    next: Option<InFlight>,
}

/// One end of an in-memory datagram link with a fixed one-way latency. Delivery is in order,
///  and datagrams are lost only if a drop filter says so.
///
/// Every datagram passed to `send` / `send_to` is recorded, including the ones that are dropped.
///
/// If the other end is dropped, sending still succeeds and nothing is ever received, which is
///  how UDP behaves.
pub struct MemoryTransport {
    local_addr: SocketAddr,
    peer_addr: SocketAddr,
    latency: Duration,
    clock: Arc<dyn Clock>,
    outbox: mpsc::UnboundedSender<InFlight>,
    inbox: Mutex<Inbox>,
    sent: std::sync::Mutex<Vec<Bytes>>,
    drop_filter: std::sync::Mutex<Option<DropFilter>>,
}

impl MemoryTransport {
    /// Returns two connected transports, the first one at `a`, the second one at `b`
    pub fn pair(a: SocketAddr, b: SocketAddr, latency: Duration, clock: Arc<dyn Clock>) -> (MemoryTransport, MemoryTransport) {
        let (tx_a, rx_a) = mpsc::unbounded_channel();
        let (tx_b, rx_b) = mpsc::unbounded_channel();

        (
            Self::new(a, b, latency, clock.clone(), tx_b, rx_a),
            Self::new(b, a, latency, clock, tx_a, rx_b),
        )
    }

    fn new(
        local_addr: SocketAddr,
        peer_addr: SocketAddr,
        latency: Duration,
        clock: Arc<dyn Clock>,
        outbox: mpsc::UnboundedSender<InFlight>,
        rx: mpsc::UnboundedReceiver<InFlight>,
    ) -> MemoryTransport {
        MemoryTransport {
            local_addr,
            peer_addr,
            latency,
            clock,
            outbox,
            inbox: Mutex::new(Inbox { rx, next: None }),
            sent: Default::default(),
            drop_filter: Default::default(),
        }
    }

    /// Datagrams for which `filter` returns `true` are silently lost
    pub fn set_drop_filter(&self, filter: impl FnMut(&[u8]) -> bool + Send + 'static) {
        *self.drop_filter.lock().unwrap_or_else(PoisonError::into_inner) = Some(Box::new(filter));
    }

    pub fn sent_datagrams(&self) -> Vec<Bytes> {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn is_dropped(&self, datagram: &[u8]) -> bool {
        match self.drop_filter.lock().unwrap_or_else(PoisonError::into_inner).as_mut() {
            Some(filter) => filter(datagram),
            None => false,
        }
    }
}

#[async_trait]
impl DatagramTransport for MemoryTransport {
    async fn send(&self, datagram: &[u8]) -> Result<(), DatagrumpError> {
        self.send_to(self.peer_addr, datagram).await
    }

    async fn send_to(&self, to: SocketAddr, datagram: &[u8]) -> Result<(), DatagrumpError> {
        let payload = Bytes::copy_from_slice(datagram);
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).push(payload.clone());

        if to != self.peer_addr {
            debug!("no link from {:?} to {:?} - datagram is lost", self.local_addr, to);
            return Ok(());
        }
        if self.is_dropped(datagram) {
            trace!("dropping datagram of {} bytes", datagram.len());
            return Ok(());
        }

        // the receiving end may be gone, which is no error for a datagram transport
        let _ = self.outbox.send(InFlight {
            deliver_at: Instant::now() + self.latency,
            source: self.local_addr,
            payload,
        });
        Ok(())
    }

    async fn recv(&self) -> Result<ReceivedDatagram, DatagrumpError> {
        let mut inbox = self.inbox.lock().await;

        if inbox.next.is_none() {
            let next = match inbox.rx.recv().await {
                Some(d) => d,
                None => pending().await,
            };
            inbox.next = Some(next);
        }

        if let Some(deliver_at) = inbox.next.as_ref().map(|d| d.deliver_at) {
            time::sleep_until(deliver_at).await;
        }

        match inbox.next.take() {
            Some(d) => Ok(ReceivedDatagram {
                payload: d.payload,
                source: d.source,
                timestamp: self.clock.now_ms(),
            }),
            None => pending().await,
        }
    }

    async fn writable(&self) -> Result<(), DatagrumpError> {
        Ok(())
    }

    fn local_addr(&self) -> Result<SocketAddr, DatagrumpError> {
        Ok(self.local_addr)
    }
}
