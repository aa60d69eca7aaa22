use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use bytes::{Bytes, BytesMut};
use tokio::{select, time};
use tracing::{debug, error, info, trace, trace_span};
use crate::clock::{Clock, SystemClock};
use crate::config::SenderConfig;
use crate::controller::Controller;
use crate::end_point::WaitOutcome;
use crate::error::DatagrumpError;
use crate::message::Message;
use crate::session::sender::SenderSession;
use crate::transport::udp::UdpTransport;
use crate::transport::{DatagramTransport, ReceivedDatagram};

/// Counters for what happened during a sender's lifetime
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SenderStats {
    /// all data messages, including timeout probes
    pub data_sent: u64,
    pub timeout_probes: u64,
    pub acks_received: u64,
    /// datagrams that were too short to be parsed
    pub datagrams_dropped: u64,
}

/// The sending side of the harness: it keeps the window filled with data messages, feeds acks
///  into the [Controller], and probes the path when nothing happened for the controller's timeout.
pub struct SenderEndPoint<C: Controller, T: DatagramTransport> {
    config: Arc<SenderConfig>,
    session: SenderSession<C>,
    transport: T,
    clock: Arc<dyn Clock>,
    /// every data message carries the same dummy payload
    payload: Bytes,
    send_buf: BytesMut,
    stats: SenderStats,
}

impl<C: Controller> SenderEndPoint<C, UdpTransport> {
    /// Binds a UDP socket and connects it to the configured peer. Nothing is sent until
    ///  [SenderEndPoint::run] is called.
    pub async fn connect_udp(config: Arc<SenderConfig>, controller: C) -> anyhow::Result<SenderEndPoint<C, UdpTransport>> {
        config.validate()?;

        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let transport = UdpTransport::bind(config.bind_addr, config.max_datagram_size, clock.clone()).await?;
        transport.connect(config.peer_addr).await?;

        Self::new(config, controller, transport, clock)
    }
}

impl<C: Controller, T: DatagramTransport> SenderEndPoint<C, T> {
    /// `transport` is expected to be connected to `config.peer_addr`
    pub fn new(config: Arc<SenderConfig>, controller: C, transport: T, clock: Arc<dyn Clock>) -> anyhow::Result<SenderEndPoint<C, T>> {
        config.validate()?;

        Ok(SenderEndPoint {
            payload: Bytes::from(vec![b'x'; config.payload_len]),
            send_buf: BytesMut::with_capacity(config.max_datagram_size),
            config,
            session: SenderSession::new(controller),
            transport,
            clock,
            stats: SenderStats::default(),
        })
    }

    pub fn session(&self) -> &SenderSession<C> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SenderSession<C> {
        &mut self.session
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn stats(&self) -> SenderStats {
        self.stats
    }

    /// Runs the event loop until `shutdown` resolves or the session fails.
    ///
    /// Receiving anything other than an ack is a failure since the peer is violating the
    ///  protocol. Datagrams that are too short to parse are dropped.
    ///
    /// Calling this again after it returned continues the same session.
    pub async fn run(&mut self, shutdown: impl Future<Output = ()>) -> anyhow::Result<()> {
        info!("sending to {:?}", self.config.peer_addr);

        let result = self.event_loop(shutdown).await;
        match &result {
            Ok(()) => info!("sender stopped: {:?}", self.stats),
            Err(e) => error!("sender failed: {} - {:?}", e, self.stats),
        }
        Ok(result?)
    }

    async fn event_loop(&mut self, shutdown: impl Future<Output = ()>) -> Result<(), DatagrumpError> {
        tokio::pin!(shutdown);

        loop {
            match self.wait(shutdown.as_mut()).await {
                WaitOutcome::Exit => return Ok(()),
                WaitOutcome::Readable(received) => self.on_datagram(received?)?,
                WaitOutcome::Writable(writable) => {
                    writable?;
                    self.fill_window().await?;
                }
                WaitOutcome::TimedOut => {
                    debug!("no ack and no send opportunity for {} ms - sending a probe", self.session.next_timeout_ms());
                    self.stats.timeout_probes += 1;
                    self.send_datagram().await?;
                }
            }
        }
    }

    /// The timeout and the interest in writability are taken from the session anew for every
    ///  wait, so controller changes take effect immediately.
    async fn wait<F: Future<Output = ()>>(&self, shutdown: Pin<&mut F>) -> WaitOutcome {
        let timeout = Duration::from_millis(self.session.next_timeout_ms());
        let window_is_open = self.session.window_is_open();

        select! {
            biased;
            _ = shutdown => WaitOutcome::Exit,
            received = self.transport.recv() => WaitOutcome::Readable(received),
            writable = self.transport.writable(), if window_is_open => WaitOutcome::Writable(writable),
            _ = time::sleep(timeout) => WaitOutcome::TimedOut,
        }
    }

    fn on_datagram(&mut self, received: ReceivedDatagram) -> Result<(), DatagrumpError> {
        let span = trace_span!("datagram_received", source = ?received.source, timestamp = received.timestamp);
        let _entered = span.enter();

        let message = match Message::decode(received.payload) {
            Ok(message) => message,
            Err(e @ DatagrumpError::TruncatedHeader { .. }) => {
                debug!("dropping datagram: {}", e);
                self.stats.datagrams_dropped += 1;
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        self.session.on_ack_received(received.timestamp, &message)?;
        self.stats.acks_received += 1;
        Ok(())
    }

    /// Sends until the window is closed, or until the configured number of sends per turn is
    ///  reached. In the latter case, the next turn of the event loop continues sending if
    ///  there is nothing else to do.
    async fn fill_window(&mut self) -> Result<(), DatagrumpError> {
        let mut num_sent: usize = 0;
        while self.session.window_is_open() {
            if let Some(max) = self.config.max_sends_per_turn {
                if num_sent >= max {
                    trace!("sent {} datagrams in one turn - yielding to the event loop", num_sent);
                    break;
                }
            }
            self.send_datagram().await?;
            num_sent += 1;
        }
        Ok(())
    }

    async fn send_datagram(&mut self) -> Result<(), DatagrumpError> {
        let mut message = self.session.new_data_message(self.payload.clone());

        let now = self.clock.now_ms();
        message.stamp_send_time(now);

        self.send_buf.clear();
        message.ser(&mut self.send_buf);
        self.transport.send(&self.send_buf).await?;

        self.session.on_datagram_sent(message.sequence_number(), now);
        self.stats.data_sent += 1;
        Ok(())
    }
}
