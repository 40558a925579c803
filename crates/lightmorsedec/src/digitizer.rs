//! Sensor reading to sample conversion

use std::time::Duration;

use lightmorse::Sample;
use log::trace;

/// Analog threshold comparator
///
/// Reduces a raw sensor reading to light (`true`) or dark. By
/// default, readings strictly above the threshold are light. An
/// inverted digitizer treats readings strictly below the
/// threshold as light instead, for sensors which read lower as
/// they are illuminated. A reading exactly at the threshold is
/// always dark.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Digitizer {
    threshold: u16,
    invert: bool,
}

impl Digitizer {
    pub fn new(threshold: u16, invert: bool) -> Self {
        Self { threshold, invert }
    }

    /// Digitize one reading
    pub fn digitize(&self, level: u16) -> bool {
        if self.invert {
            level < self.threshold
        } else {
            level > self.threshold
        }
    }
}

/// Timestamps from a fixed polling rate
///
/// The `n`th reading, counting from zero, was taken at `n / rate`
/// seconds after the start of input. Conversion is exact to the
/// nanosecond and never accumulates rounding error.
#[derive(Clone, Debug)]
pub struct PollClock {
    rate: u32,
    count: u64,
}

impl PollClock {
    /// New clock at `rate` polls per second
    ///
    /// # Panics
    ///
    /// Panics if `rate` is zero.
    pub fn new(rate: u32) -> Self {
        assert!(rate > 0, "poll clock: rate must be nonzero");
        Self { rate, count: 0 }
    }

    /// Timestamp for the next reading
    pub fn next_timestamp(&mut self) -> Duration {
        let nanos = (self.count as u128) * 1_000_000_000u128 / (self.rate as u128);
        self.count += 1;
        Duration::new(
            (nanos / 1_000_000_000) as u64,
            (nanos % 1_000_000_000) as u32,
        )
    }

    /// Digitize `level` and stamp it with the next timestamp
    ///
    /// Every reading is logged at `trace` level, which helps
    /// choose a `--threshold`.
    pub fn sample(&mut self, digitizer: &Digitizer, level: u16) -> Sample {
        let out = Sample::new(digitizer.digitize(level), self.next_timestamp());
        trace!(
            "reading [{:<10}]: level {:>5} → signal {}",
            self.count,
            level,
            out.raw as u8
        );
        out
    }

    /// Number of readings stamped so far
    pub fn count(&self) -> u64 {
        self.count
    }
}
