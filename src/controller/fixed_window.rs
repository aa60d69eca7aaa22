use tracing::{debug, instrument};
use crate::controller::Controller;

/// A controller that does no congestion control at all: its window and timeout never change.
///
/// It is the starting point for experiments and a baseline to compare real algorithms against.
#[derive(Debug, Clone)]
pub struct FixedWindowController {
    window_size: u64,
    timeout_ms: u64,
}

impl FixedWindowController {
    pub const DEFAULT_WINDOW_SIZE: u64 = 50;
    pub const DEFAULT_TIMEOUT_MS: u64 = 1000;

    pub fn new(window_size: u64, timeout_ms: u64) -> FixedWindowController {
        FixedWindowController {
            window_size,
            timeout_ms,
        }
    }
}

impl Default for FixedWindowController {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WINDOW_SIZE, Self::DEFAULT_TIMEOUT_MS)
    }
}

impl Controller for FixedWindowController {
    fn window_size(&self) -> u64 {
        self.window_size
    }

    fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    #[instrument(level = "trace", skip(self))]
    fn datagram_was_sent(&mut self, sequence_number: u64, send_timestamp: u64) {
        debug!("at time {} sent datagram {}, window size is {}", send_timestamp, sequence_number, self.window_size);
    }

    #[instrument(level = "trace", skip(self))]
    fn ack_received(&mut self, ack_sequence_number: u64, ack_send_timestamp: Option<u64>, ack_recv_timestamp: Option<u64>, local_recv_timestamp: u64) {
        debug!("at time {} received ack for datagram {} (sent {:?}, received by peer {:?})",
            local_recv_timestamp, ack_sequence_number, ack_send_timestamp, ack_recv_timestamp);
    }
}
