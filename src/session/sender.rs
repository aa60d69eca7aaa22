use bytes::Bytes;
use tracing::{trace, warn};
use crate::controller::Controller;
use crate::error::DatagrumpError;
use crate::message::Message;

/// The sender's bookkeeping, independent of any I/O: sequence numbering of outgoing data messages,
///  the in-flight count, and forwarding of sends and acks to the [Controller].
///
/// Loss is never detected explicitly. A datagram that is never acknowledged simply stays 'in
///  flight' until an ack for a later sequence number moves `next_ack_expected` past it.
pub struct SenderSession<C: Controller> {
    controller: C,
    /// sequence number for the next data message to be created
    next_outgoing_sequence: u64,
    /// if the network does not reorder or lose datagrams, this is the sequence number that the
    ///  receiver will acknowledge next
    next_ack_expected: u64,
    /// highest sequence number reported via [SenderSession::on_datagram_sent]
    last_sent: Option<u64>,
}

impl<C: Controller> SenderSession<C> {
    pub fn new(controller: C) -> SenderSession<C> {
        SenderSession {
            controller,
            next_outgoing_sequence: 0,
            next_ack_expected: 0,
            last_sent: None,
        }
    }

    pub fn controller(&self) -> &C {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut C {
        &mut self.controller
    }

    pub fn next_outgoing_sequence(&self) -> u64 {
        self.next_outgoing_sequence
    }

    pub fn next_ack_expected(&self) -> u64 {
        self.next_ack_expected
    }

    /// NB: A misbehaving peer can acknowledge sequence numbers that were never sent, pushing
    ///      `next_ack_expected` past `next_outgoing_sequence`. That counts as nothing in flight.
    pub fn in_flight(&self) -> u64 {
        self.next_outgoing_sequence.saturating_sub(self.next_ack_expected)
    }

    /// Allocates the next sequence number for a new data message. The caller is expected to
    ///  stamp and send it, and then to call [SenderSession::on_datagram_sent].
    pub fn new_data_message(&mut self, payload: Bytes) -> Message {
        let message = Message::new_data(self.next_outgoing_sequence, payload);
        self.next_outgoing_sequence += 1;
        message
    }

    pub fn on_datagram_sent(&mut self, sequence_number: u64, send_timestamp: u64) {
        debug_assert!(sequence_number < self.next_outgoing_sequence, "sent a sequence number that was never allocated");
        debug_assert!(self.last_sent.map_or(true, |last| last <= sequence_number), "datagrams must be reported in sequence order");
        self.last_sent = Some(sequence_number);

        trace!("datagram {} sent at {}", sequence_number, send_timestamp);
        self.controller.datagram_was_sent(sequence_number, send_timestamp);
    }

    /// Duplicate and reordered acks are harmless: `next_ack_expected` never moves backward. They
    ///  are passed to the controller just like fresh ones.
    pub fn on_ack_received(&mut self, recv_timestamp: u64, ack: &Message) -> Result<(), DatagrumpError> {
        let header = &ack.header;
        let ack_sequence_number = match header.ack_sequence_number {
            Some(n) => n,
            None => return Err(DatagrumpError::NotAnAck { sequence_number: header.sequence_number }),
        };

        if ack_sequence_number >= self.next_outgoing_sequence {
            warn!("peer acknowledged datagram {} which was never sent (next outgoing is {})", ack_sequence_number, self.next_outgoing_sequence);
        }
        else if ack_sequence_number < self.next_ack_expected {
            trace!("stale ack for datagram {} (next expected is {})", ack_sequence_number, self.next_ack_expected);
        }

        self.next_ack_expected = self.next_ack_expected.max(ack_sequence_number.saturating_add(1));

        self.controller.ack_received(
            ack_sequence_number,
            header.ack_send_timestamp,
            header.ack_recv_timestamp,
            recv_timestamp,
        );
        Ok(())
    }

    /// This is the only gate for sending data messages, apart from the idle timeout probe. It
    ///  asks the controller every time since the window can change with every ack.
    pub fn window_is_open(&self) -> bool {
        self.in_flight() < self.controller.window_size()
    }

    pub fn next_timeout_ms(&self) -> u64 {
        self.controller.timeout_ms()
    }
}
