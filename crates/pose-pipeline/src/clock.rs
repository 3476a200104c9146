use pose_graph::Timestamp;
use std::time::Instant;

/// Microsecond clock that never hands out the same timestamp twice.
///
/// Two reads inside the same microsecond get consecutive values instead of
/// a duplicate the stream adapter would reject.
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    origin: Instant,
    last: Option<i64>,
}

impl MonotonicClock {
    pub fn start() -> Self {
        Self {
            origin: Instant::now(),
            last: None,
        }
    }

    pub fn now(&mut self) -> Timestamp {
        let elapsed = self.origin.elapsed().as_micros().min(i64::MAX as u128) as i64;
        let micros = match self.last {
            Some(last) if elapsed <= last => last + 1,
            _ => elapsed,
        };
        self.last = Some(micros);
        Timestamp::from_micros(micros)
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::start()
    }
}
