use bytes::Bytes;
use crate::error::DatagrumpError;
use crate::message::ack::acknowledge;
use crate::message::Message;

/// The receiver acknowledges every datagram it gets, independently of all others: there is no
///  buffering, reordering or deduplication. Its only state is its own outgoing sequence space.
#[derive(Debug, Default)]
pub struct ReceiverSession {
    next_ack_seq: u64,
}

impl ReceiverSession {
    pub fn new() -> ReceiverSession {
        Default::default()
    }

    pub fn next_ack_seq(&self) -> u64 {
        self.next_ack_seq
    }

    /// Turns a raw datagram into the ack that should be sent back to its source. The ack is not
    ///  stamped yet.
    ///
    /// A datagram that is too short for a header does not use up a sequence number.
    pub fn acknowledge(&mut self, datagram: Bytes, recv_timestamp: u64) -> Result<Message, DatagrumpError> {
        let received = Message::decode(datagram)?;

        let ack = acknowledge(&received, self.next_ack_seq, recv_timestamp);
        self.next_ack_seq += 1;
        Ok(ack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::header::MessageHeader;

    fn data_datagram(sequence_number: u64, payload_len: usize, send_timestamp: u64) -> Bytes {
        let mut message = Message::new_data(sequence_number, Bytes::from(vec![b'x'; payload_len]));
        message.stamp_send_time(send_timestamp);
        message.encode().freeze()
    }

    #[test]
    fn test_first_ack() {
        let mut session = ReceiverSession::new();

        let ack = session.acknowledge(data_datagram(7, 1424, 500), 512).unwrap();

        assert_eq!(ack.header, MessageHeader {
            sequence_number: 0,
            send_timestamp: None,
            ack_sequence_number: Some(7),
            ack_send_timestamp: Some(500),
            ack_recv_timestamp: Some(512),
            ack_payload_length: Some(1424),
        });
        assert!(ack.payload.is_empty());
        assert_eq!(session.next_ack_seq(), 1);
    }

    #[test]
    fn test_every_datagram_is_acked_with_fresh_sequence_number() {
        let mut session = ReceiverSession::new();

        // duplicates and reordering make no difference
        let incoming = [3, 1, 1, 2, 0, 3];
        for (i, &seq) in incoming.iter().enumerate() {
            let ack = session.acknowledge(data_datagram(seq, 10, 0), 100 + i as u64).unwrap();
            assert_eq!(ack.sequence_number(), i as u64);
            assert_eq!(ack.header.ack_sequence_number, Some(seq));
            assert_eq!(ack.header.ack_recv_timestamp, Some(100 + i as u64));
        }
    }

    #[test]
    fn test_truncated_datagram_does_not_consume_sequence_number() {
        let mut session = ReceiverSession::new();

        let result = session.acknowledge(Bytes::from_static(b"too short"), 1);
        assert!(matches!(result, Err(DatagrumpError::TruncatedHeader { len: 9 })));
        assert_eq!(session.next_ack_seq(), 0);

        let ack = session.acknowledge(data_datagram(0, 0, 0), 2).unwrap();
        assert_eq!(ack.sequence_number(), 0);
        assert_eq!(ack.header.ack_payload_length, Some(0));
    }
}
