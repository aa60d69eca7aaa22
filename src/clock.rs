use std::time::SystemTime;
use tokio::time::Instant;

/// Source of millisecond timestamps for the wire.
///
/// The epoch is arbitrary, but sender and receiver should agree on it if one-way delays are to be
///  meaningful. Timestamps never reach `u64::MAX`, which marks an unset field on the wire.
pub trait Clock: Send + Sync + 'static {
    fn now_ms(&self) -> u64;
}

fn clamp_millis(millis: u128) -> u64 {
    millis.try_into()
        .unwrap_or(u64::MAX)
        .min(u64::MAX - 1)
}

/// Wall clock time, millis since the UNIX epoch
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        let since_epoch = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default();
        clamp_millis(since_epoch.as_millis())
    }
}

/// Millis since this clock was created, based on tokio's clock. In a runtime with paused time,
///  this clock follows the virtual time.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    start: Instant,
}

impl TokioClock {
    pub fn new() -> TokioClock {
        TokioClock {
            start: Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now_ms(&self) -> u64 {
        clamp_millis(self.start.elapsed().as_millis())
    }
}
