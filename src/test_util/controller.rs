use crate::controller::Controller;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerEvent {
    DatagramSent {
        sequence_number: u64,
        send_timestamp: u64,
    },
    AckReceived {
        ack_sequence_number: u64,
        ack_send_timestamp: Option<u64>,
        ack_recv_timestamp: Option<u64>,
        local_recv_timestamp: u64,
    },
}

/// A [Controller] with a window and timeout that can be changed by test code at any time. It
///  records every notification it gets.
#[derive(Debug, Clone)]
pub struct RecordingController {
    pub window_size: u64,
    pub timeout_ms: u64,
    pub events: Vec<ControllerEvent>,
}

impl RecordingController {
    pub fn new(window_size: u64, timeout_ms: u64) -> RecordingController {
        RecordingController {
            window_size,
            timeout_ms,
            events: Vec::new(),
        }
    }

    pub fn sent_sequence_numbers(&self) -> Vec<u64> {
        self.events.iter()
            .filter_map(|e| match e {
                ControllerEvent::DatagramSent { sequence_number, .. } => Some(*sequence_number),
                ControllerEvent::AckReceived { .. } => None,
            })
            .collect()
    }

    pub fn acked_sequence_numbers(&self) -> Vec<u64> {
        self.events.iter()
            .filter_map(|e| match e {
                ControllerEvent::DatagramSent { .. } => None,
                ControllerEvent::AckReceived { ack_sequence_number, .. } => Some(*ack_sequence_number),
            })
            .collect()
    }
}

impl Controller for RecordingController {
    fn window_size(&self) -> u64 {
        self.window_size
    }

    fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    fn datagram_was_sent(&mut self, sequence_number: u64, send_timestamp: u64) {
        self.events.push(ControllerEvent::DatagramSent { sequence_number, send_timestamp });
    }

    fn ack_received(&mut self, ack_sequence_number: u64, ack_send_timestamp: Option<u64>, ack_recv_timestamp: Option<u64>, local_recv_timestamp: u64) {
        self.events.push(ControllerEvent::AckReceived {
            ack_sequence_number,
            ack_send_timestamp,
            ack_recv_timestamp,
            local_recv_timestamp,
        });
    }
}
