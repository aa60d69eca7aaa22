use thiserror::Error;

/// Failures of the wire protocol and of the transport underneath it.
///
/// Which of these are fatal depends on where they occur: a [DatagrumpError::TruncatedHeader] only
///  costs the datagram it was found in, while [DatagrumpError::NotAnAck] ends a sender's session
///  and transport errors end the process unless the caller recovers.
#[derive(Debug, Error)]
pub enum DatagrumpError {
    #[error("datagram of {len} bytes is too short to contain a 48-byte header")]
    TruncatedHeader { len: usize },

    #[error("sender got something other than an ack from the receiver (sequence number {sequence_number})")]
    NotAnAck { sequence_number: u64 },

    #[error("received oversized datagram (more than {max} bytes)")]
    OversizedDatagram { max: usize },

    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),
}
