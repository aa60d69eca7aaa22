use bytes::{Buf, BufMut};
use crate::error::DatagrumpError;

/// On the wire, a field that was never set carries all bits one. Inside the crate it is `None`.
const UNSET: u64 = u64::MAX;

/// NB: `Some(u64::MAX)` is indistinguishable from `None` on the wire. This can happen when acking a
///      peer's datagram with sequence number `u64::MAX`, and the result is then no ack.
fn to_wire(value: Option<u64>) -> u64 {
    value.unwrap_or(UNSET)
}

fn from_wire(raw: u64) -> Option<u64> {
    if raw == UNSET {
        None
    }
    else {
        Some(raw)
    }
}

/// The fixed-size header at the start of every datagram.
///
/// The four `ack_*` fields describe a previously received message that this message acknowledges,
///  and they are all unset for data messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MessageHeader {
    pub sequence_number: u64,
    pub send_timestamp: Option<u64>,
    pub ack_sequence_number: Option<u64>,
    pub ack_send_timestamp: Option<u64>,
    pub ack_recv_timestamp: Option<u64>,
    pub ack_payload_length: Option<u64>,
}

impl MessageHeader {
    pub const NUM_FIELDS: usize = 6;
    pub const SERIALIZED_LEN: usize = Self::NUM_FIELDS * std::mem::size_of::<u64>();

    pub fn for_data(sequence_number: u64) -> MessageHeader {
        MessageHeader {
            sequence_number,
            send_timestamp: None,
            ack_sequence_number: None,
            ack_send_timestamp: None,
            ack_recv_timestamp: None,
            ack_payload_length: None,
        }
    }

    pub fn is_ack(&self) -> bool {
        self.ack_sequence_number.is_some()
    }

    pub fn ser(&self, buf: &mut impl BufMut) {
        buf.put_u64(self.sequence_number);
        buf.put_u64(to_wire(self.send_timestamp));
        buf.put_u64(to_wire(self.ack_sequence_number));
        buf.put_u64(to_wire(self.ack_send_timestamp));
        buf.put_u64(to_wire(self.ack_recv_timestamp));
        buf.put_u64(to_wire(self.ack_payload_length));
    }

    /// Consumes exactly [MessageHeader::SERIALIZED_LEN] bytes, leaving the payload in `buf`
    pub fn deser(buf: &mut impl Buf) -> Result<MessageHeader, DatagrumpError> {
        if buf.remaining() < Self::SERIALIZED_LEN {
            return Err(DatagrumpError::TruncatedHeader { len: buf.remaining() });
        }

        Ok(MessageHeader {
            sequence_number: buf.get_u64(),
            send_timestamp: from_wire(buf.get_u64()),
            ack_sequence_number: from_wire(buf.get_u64()),
            ack_send_timestamp: from_wire(buf.get_u64()),
            ack_recv_timestamp: from_wire(buf.get_u64()),
            ack_payload_length: from_wire(buf.get_u64()),
        })
    }
}
