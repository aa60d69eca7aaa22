//! Protocol state for both directions, without any I/O. The event loops driving these sessions
//!  over a transport live in [crate::end_point].

pub mod receiver;
pub mod sender;
