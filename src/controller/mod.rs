//! The admission policy, i.e. the place where congestion control algorithms plug in.
//!
//! The sender's session makes no assumption about a controller's internals. It asks for the
//!  current window size before every send opportunity and for the idle timeout before every
//!  wait, and it reports every datagram it sends and every ack it receives.

pub mod fixed_window;

#[cfg(test)] use mockall::automock;

/// All methods are called from the sender's event loop, so they must be cheap and must not block.
#[cfg_attr(test, automock)]
pub trait Controller: Send + 'static {
    /// The number of datagrams that may be in flight (sent but not acknowledged) at the same time
    fn window_size(&self) -> u64;

    /// The time (in millis) without acks or send opportunities after which the sender probes the
    ///  path with a single datagram, regardless of the window
    fn timeout_ms(&self) -> u64;

    fn datagram_was_sent(&mut self, sequence_number: u64, send_timestamp: u64);

    /// `ack_send_timestamp` and `ack_recv_timestamp` are the peer's view and may be missing if
    ///  the peer did not set them. `local_recv_timestamp` is when the ack arrived here.
    fn ack_received(
        &mut self,
        ack_sequence_number: u64,
        ack_send_timestamp: Option<u64>,
        ack_recv_timestamp: Option<u64>,
        local_recv_timestamp: u64,
    );
}
