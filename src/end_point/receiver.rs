use std::future::Future;
use std::sync::Arc;
use bytes::BytesMut;
use tokio::select;
use tracing::{debug, error, info, trace_span};
use crate::clock::{Clock, SystemClock};
use crate::config::ReceiverConfig;
use crate::error::DatagrumpError;
use crate::message::Message;
use crate::session::receiver::ReceiverSession;
use crate::transport::udp::UdpTransport;
use crate::transport::{DatagramTransport, ReceivedDatagram};

/// The receiving side of the harness: it acknowledges every datagram it receives, sending the ack
///  back to wherever the datagram came from.
pub struct ReceiverEndPoint<T: DatagramTransport> {
    session: ReceiverSession,
    transport: T,
    clock: Arc<dyn Clock>,
    send_buf: BytesMut,
}

impl ReceiverEndPoint<UdpTransport> {
    pub async fn bind_udp(config: &ReceiverConfig) -> anyhow::Result<ReceiverEndPoint<UdpTransport>> {
        config.validate()?;

        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let transport = UdpTransport::bind(config.self_addr, config.max_datagram_size, clock.clone()).await?;
        Ok(Self::new(transport, clock))
    }
}

impl<T: DatagramTransport> ReceiverEndPoint<T> {
    pub fn new(transport: T, clock: Arc<dyn Clock>) -> ReceiverEndPoint<T> {
        ReceiverEndPoint {
            session: ReceiverSession::new(),
            transport,
            clock,
            send_buf: BytesMut::new(),
        }
    }

    pub fn session(&self) -> &ReceiverSession {
        &self.session
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Acknowledges incoming datagrams until `shutdown` resolves or the transport fails
    pub async fn run(&mut self, shutdown: impl Future<Output = ()>) -> anyhow::Result<()> {
        info!("listening on {:?}", self.transport.local_addr()?);

        let result = self.event_loop(shutdown).await;
        match &result {
            Ok(()) => info!("receiver stopped after acknowledging {} datagrams", self.session.next_ack_seq()),
            Err(e) => error!("receiver failed: {}", e),
        }
        Ok(result?)
    }

    async fn event_loop(&mut self, shutdown: impl Future<Output = ()>) -> Result<(), DatagrumpError> {
        tokio::pin!(shutdown);

        loop {
            select! {
                biased;
                _ = &mut shutdown => return Ok(()),
                received = self.transport.recv() => self.on_datagram(received?).await?,
            }
        }
    }

    async fn on_datagram(&mut self, received: ReceivedDatagram) -> Result<(), DatagrumpError> {
        let source = received.source;
        let Some(mut ack) = self.acknowledge(received)? else {
            return Ok(());
        };

        ack.stamp_send_time(self.clock.now_ms());

        self.send_buf.clear();
        ack.ser(&mut self.send_buf);
        self.transport.send_to(source, &self.send_buf).await
    }

    /// Returns `None` for datagrams that are dropped without an ack
    fn acknowledge(&mut self, received: ReceivedDatagram) -> Result<Option<Message>, DatagrumpError> {
        let span = trace_span!("datagram_received", source = ?received.source, timestamp = received.timestamp);
        let _entered = span.enter();

        match self.session.acknowledge(received.payload, received.timestamp) {
            Ok(ack) => Ok(Some(ack)),
            Err(e @ DatagrumpError::TruncatedHeader { .. }) => {
                debug!("dropping datagram: {}", e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
