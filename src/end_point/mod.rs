//! Event loops that drive the protocol sessions over a [crate::transport::DatagramTransport].
//!
//! Each loop runs on a single task. It waits for the first of several events (a datagram arrived,
//!  the transport can take more data, a timeout elapsed, or the caller asked to exit), handles
//!  that event to completion, and then waits again. Session state is only ever touched from the
//!  loop itself, so there is no locking.

pub mod receiver;
pub mod sender;

use crate::error::DatagrumpError;
use crate::transport::ReceivedDatagram;

/// The result of waiting for the next event.
///
/// `Writable` is only reported when the session is interested in sending, i.e. when its window is
///  open. `TimedOut` means that nothing else happened for the full timeout.
#[derive(Debug)]
pub enum WaitOutcome {
    Exit,
    Readable(Result<ReceivedDatagram, DatagrumpError>),
    Writable(Result<(), DatagrumpError>),
    TimedOut,
}
