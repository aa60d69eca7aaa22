use bytes::Bytes;
use crate::message::header::MessageHeader;
use crate::message::Message;
use crate::util::safe_converter::SafeCast;

/// Builds the acknowledgment for a received message.
///
/// The ack takes a slot in the acknowledging party's own sequence space (`sequence_number`), and
///  it carries no payload. Its send timestamp is left unset to be stamped right before sending.
pub fn acknowledge(received: &Message, sequence_number: u64, recv_timestamp: u64) -> Message {
    Message {
        header: MessageHeader {
            sequence_number,
            send_timestamp: None,
            ack_sequence_number: Some(received.header.sequence_number),
            ack_send_timestamp: received.header.send_timestamp,
            ack_recv_timestamp: Some(recv_timestamp),
            ack_payload_length: Some(received.payload.len().safe_cast()),
        },
        payload: Bytes::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::first_ack(7, Some(100), 1424, 0, 105)]
    #[case::unstamped_data(7, None, 1424, 1, 105)]
    #[case::empty_payload(0, Some(0), 0, 99, 1)]
    #[case::large_numbers(u64::MAX - 1, Some(u64::MAX - 1), 3, u64::MAX - 1, u64::MAX - 1)]
    fn test_acknowledge(
        #[case] data_sequence_number: u64,
        #[case] data_send_timestamp: Option<u64>,
        #[case] payload_len: usize,
        #[case] ack_sequence_number: u64,
        #[case] recv_timestamp: u64,
    ) {
        let mut data = Message::new_data(data_sequence_number, Bytes::from(vec![b'x'; payload_len]));
        data.header.send_timestamp = data_send_timestamp;
        let before = data.clone();

        let ack = acknowledge(&data, ack_sequence_number, recv_timestamp);

        assert!(ack.is_ack());
        assert_eq!(ack.header, MessageHeader {
            sequence_number: ack_sequence_number,
            send_timestamp: None,
            ack_sequence_number: Some(data_sequence_number),
            ack_send_timestamp: data_send_timestamp,
            ack_recv_timestamp: Some(recv_timestamp),
            ack_payload_length: Some(payload_len as u64),
        });
        assert!(ack.payload.is_empty());

        // the received message is left alone
        assert_eq!(data, before);
    }

    #[test]
    fn test_acknowledge_an_ack() {
        let data = Message::new_data(1, Bytes::from_static(b"abc"));
        let first = acknowledge(&data, 10, 5);
        let second = acknowledge(&first, 11, 6);

        assert_eq!(second.header.ack_sequence_number, Some(10));
        assert_eq!(second.header.ack_payload_length, Some(0));
        assert_eq!(second.header.ack_send_timestamp, None);
    }
}
