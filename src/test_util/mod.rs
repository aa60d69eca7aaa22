//! Utilities for testing code that uses the sender and receiver end points without real sockets
//!  or congestion control algorithms. They are used for testing the crate itself, but they are
//!  also exported for testing controllers.

pub mod controller;
pub mod transport;
