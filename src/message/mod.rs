//! The unit of exchange between sender and receiver: a [MessageHeader] followed by an opaque
//!  payload that extends to the end of the datagram.

pub mod ack;
pub mod header;

use bytes::{BufMut, Bytes, BytesMut};
use crate::error::DatagrumpError;
use crate::message::header::MessageHeader;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub header: MessageHeader,
    pub payload: Bytes,
}

impl Message {
    /// A data message that is neither stamped nor an ack. The caller must call
    ///  [Message::stamp_send_time] right before transmitting it.
    pub fn new_data(sequence_number: u64, payload: Bytes) -> Message {
        Message {
            header: MessageHeader::for_data(sequence_number),
            payload,
        }
    }

    /// Parses a complete datagram. The payload shares memory with `datagram`.
    pub fn decode(mut datagram: Bytes) -> Result<Message, DatagrumpError> {
        let header = MessageHeader::deser(&mut datagram)?;
        Ok(Message {
            header,
            payload: datagram,
        })
    }

    pub fn encode(&self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(self.encoded_len());
        self.ser(&mut buf);
        buf
    }

    pub fn ser(&self, buf: &mut impl BufMut) {
        self.header.ser(buf);
        buf.put_slice(&self.payload);
    }

    pub fn encoded_len(&self) -> usize {
        MessageHeader::SERIALIZED_LEN + self.payload.len()
    }

    pub fn stamp_send_time(&mut self, now_ms: u64) {
        self.header.send_timestamp = Some(now_ms);
    }

    pub fn sequence_number(&self) -> u64 {
        self.header.sequence_number
    }

    pub fn is_ack(&self) -> bool {
        self.header.is_ack()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn datagram(header: &[u64], payload: &[u8]) -> Bytes {
        let mut buf = BytesMut::new();
        for &field in header {
            buf.put_u64(field);
        }
        buf.put_slice(payload);
        buf.freeze()
    }

    #[rstest]
    #[case::header_only(datagram(&[0, 1, 2, 3, 4, 5], b""))]
    #[case::all_unset(datagram(&[u64::MAX; 6], b""))]
    #[case::with_payload(datagram(&[9, 17, u64::MAX, u64::MAX, u64::MAX, u64::MAX], b"xxxxxxxx"))]
    #[case::odd_payload(datagram(&[1, 2, 3, u64::MAX, 5, u64::MAX], &[0, 255, 1]))]
    #[case::big_payload(datagram(&[1, 2, u64::MAX, u64::MAX, u64::MAX, u64::MAX], &[b'x'; 1424]))]
    fn test_encode_decode_is_identity_on_bytes(#[case] raw: Bytes) {
        let decoded = Message::decode(raw.clone()).unwrap();
        assert_eq!(decoded.encode().freeze(), raw);
    }

    #[rstest]
    #[case::data(Message::new_data(0, Bytes::from_static(b"hello")))]
    #[case::empty_data(Message::new_data(12345, Bytes::new()))]
    #[case::stamped({
        let mut m = Message::new_data(4, Bytes::from(vec![b'x'; 1424]));
        m.stamp_send_time(1_700_000_000_000);
        m
    })]
    #[case::ack(ack::acknowledge(&Message::new_data(7, Bytes::from_static(b"abc")), 2, 77))]
    fn test_decode_encode_is_identity_on_messages(#[case] message: Message) {
        let encoded = message.encode();
        assert_eq!(encoded.len(), message.encoded_len());
        assert_eq!(Message::decode(encoded.freeze()).unwrap(), message);
    }

    #[test]
    fn test_decode_exactly_header() {
        let raw = datagram(&[1, 2, 3, 4, 5, 6], b"");
        assert_eq!(raw.len(), 48);

        let decoded = Message::decode(raw).unwrap();
        assert!(decoded.payload.is_empty());
        assert_eq!(decoded.header, MessageHeader {
            sequence_number: 1,
            send_timestamp: Some(2),
            ack_sequence_number: Some(3),
            ack_send_timestamp: Some(4),
            ack_recv_timestamp: Some(5),
            ack_payload_length: Some(6),
        });
    }

    #[test]
    fn test_decode_truncated() {
        let raw = Bytes::from(vec![0u8; 47]);
        assert!(matches!(Message::decode(raw), Err(DatagrumpError::TruncatedHeader { len: 47 })));
    }

    #[test]
    fn test_new_data_is_not_ack() {
        let message = Message::new_data(3, Bytes::from_static(b"x"));
        assert!(!message.is_ack());
        assert_eq!(message.sequence_number(), 3);
        assert_eq!(message.header.send_timestamp, None);
        assert_eq!(message.header.ack_send_timestamp, None);
        assert_eq!(message.header.ack_recv_timestamp, None);
        assert_eq!(message.header.ack_payload_length, None);
    }

    #[test]
    fn test_stamp_send_time() {
        let mut message = Message::new_data(3, Bytes::new());
        message.stamp_send_time(42);
        assert_eq!(message.header.send_timestamp, Some(42));
        message.stamp_send_time(43);
        assert_eq!(message.header.send_timestamp, Some(43));
    }
}
