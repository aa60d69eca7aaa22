//! A harness for experimenting with congestion control over UDP.
//!
//! A sender streams data messages to a receiver, which acknowledges every datagram it gets. The
//!  sender's admission of new datagrams is governed by a pluggable [controller::Controller] that
//!  sees every send and every ack, and decides on a window size and an idle timeout.
//!
//! Every datagram starts with the same header of six big-endian u64 fields:
//!
//! ```ascii
//! 0: sequence number
//! 8: send timestamp
//! 16: ack sequence number
//! 24: ack send timestamp
//! 32: ack receive timestamp
//! 40: ack payload length
//! 48: payload (data messages only)
//! ```
//!
//! A field value of `u64::MAX` means 'unset'. Acks have all four `ack_*` fields set, data
//!  messages have none of them set.

pub mod clock;
pub mod config;
pub mod controller;
pub mod end_point;
pub mod error;
pub mod message;
pub mod session;
pub mod test_util;
pub mod transport;
pub mod util;
