//! Input debouncing
//!
//! The light sensor is noisy: flicker, reflections, and a
//! slowly-settling photoresistor all cause the digitized signal
//! to chatter around every real edge. The [`Debouncer`] accepts a
//! new level only after the raw input has held it for longer than
//! a configurable window.

use std::time::Duration;

/// One poll of the digitized sensor
///
/// The `timestamp` is measured by the caller's monotonic clock
/// from any fixed epoch (such as the start of the session).
/// Timestamps must never decrease from one sample to the next.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Sample {
    /// Digitized level: `true` for light (HIGH)
    pub raw: bool,

    /// Time of the poll
    pub timestamp: Duration,
}

impl Sample {
    /// Sample with the given level and time
    pub fn new(raw: bool, timestamp: Duration) -> Self {
        Self { raw, timestamp }
    }
}

/// A change in the debounced signal
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StableTransition {
    /// Previous stable level
    pub from: bool,

    /// New stable level
    pub to: bool,

    /// Time at which the new level was accepted
    pub at: Duration,
}

impl StableTransition {
    /// True if the signal went from dark to light
    pub fn is_rising(&self) -> bool {
        !self.from && self.to
    }
}

/// Time-window debouncer
///
/// Every raw edge restarts a timer. Once the raw level has been
/// constant for strictly longer than the debounce `window`, and
/// it differs from the current stable level, it becomes the new
/// stable level. Both edges of a pulse are delayed by the same
/// amount, so pulse durations survive debouncing intact.
///
/// The stable signal starts LOW (dark).
#[derive(Clone, Debug)]
pub struct Debouncer {
    // minimum hold time
    window: Duration,

    // raw level at the previous poll
    last_raw: bool,

    // time of the last raw edge
    last_change: Duration,

    // accepted level
    stable: bool,

    // time of the previous poll
    last_seen: Duration,
}

impl Debouncer {
    /// New debouncer with the given hold `window`
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_raw: false,
            last_change: Duration::ZERO,
            stable: false,
            last_seen: Duration::ZERO,
        }
    }

    /// Reset to zero initial conditions
    pub fn reset(&mut self) {
        self.last_raw = false;
        self.last_change = Duration::ZERO;
        self.stable = false;
        self.last_seen = Duration::ZERO;
    }

    /// Process one raw sample
    ///
    /// Returns a [`StableTransition`] if this sample changed the
    /// stable level.
    ///
    /// # Panics
    ///
    /// Panics if `now` is earlier than the time of a previous
    /// call. A clock which runs backwards would yield garbage
    /// durations downstream.
    pub fn feed(&mut self, raw: bool, now: Duration) -> Option<StableTransition> {
        assert!(
            now >= self.last_seen,
            "debouncer: non-monotonic timestamp {:?} precedes {:?}",
            now,
            self.last_seen
        );
        self.last_seen = now;

        if raw != self.last_raw {
            self.last_change = now;
        }
        self.last_raw = raw;

        if now - self.last_change > self.window && raw != self.stable {
            let from = self.stable;
            self.stable = raw;
            Some(StableTransition {
                from,
                to: raw,
                at: now,
            })
        } else {
            None
        }
    }

    /// Current stable level
    pub fn stable(&self) -> bool {
        self.stable
    }

    /// Debounce window
    pub fn window(&self) -> Duration {
        self.window
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(50);

    fn ms(t: u64) -> Duration {
        Duration::from_millis(t)
    }

    #[test]
    fn test_fast_chatter_is_ignored() {
        let mut uut = Debouncer::new(WINDOW);

        // toggles every 20 ms, well inside the window
        for (i, t) in (0..2000u64).step_by(10).enumerate() {
            let raw = (i / 2) % 2 == 1;
            assert_eq!(None, uut.feed(raw, ms(t)));
        }
        assert!(!uut.stable());
    }

    #[test]
    fn test_held_level_accepted_once() {
        let mut uut = Debouncer::new(WINDOW);

        let mut changes = vec![];
        for t in (0..500u64).step_by(10) {
            if let Some(edge) = uut.feed(t >= 100, ms(t)) {
                changes.push(edge);
            }
        }

        // edge at 100 ms; 150 ms is exactly the window, not past it
        assert_eq!(
            vec![StableTransition {
                from: false,
                to: true,
                at: ms(160)
            }],
            changes
        );
        assert!(changes[0].is_rising());
        assert!(uut.stable());
    }

    #[test]
    fn test_glitch_restarts_timer() {
        let mut uut = Debouncer::new(WINDOW);
        assert_eq!(None, uut.feed(true, ms(0)));
        assert_eq!(None, uut.feed(true, ms(40)));

        // one dark poll in the middle of the light
        assert_eq!(None, uut.feed(false, ms(45)));
        assert_eq!(None, uut.feed(true, ms(50)));
        assert_eq!(None, uut.feed(true, ms(100)));

        let edge = uut.feed(true, ms(101)).expect("expected edge");
        assert_eq!(ms(101), edge.at);

        // and back down
        assert_eq!(None, uut.feed(false, ms(200)));
        let edge = uut.feed(false, ms(251)).expect("expected edge");
        assert!(!edge.is_rising());
        assert!(!edge.to);
    }

    #[test]
    fn test_initial_dark_is_not_an_edge() {
        let mut uut = Debouncer::new(WINDOW);
        for t in (0..1000u64).step_by(10) {
            assert_eq!(None, uut.feed(false, ms(t)));
        }
    }

    #[test]
    fn test_reset() {
        let mut uut = Debouncer::new(WINDOW);
        uut.feed(true, ms(0));
        assert!(uut.feed(true, ms(60)).is_some());
        uut.reset();
        assert!(!uut.stable());
        assert_eq!(None, uut.feed(false, ms(0)));
    }

    #[test]
    #[should_panic(expected = "non-monotonic")]
    fn test_backwards_clock_panics() {
        let mut uut = Debouncer::new(WINDOW);
        uut.feed(false, ms(100));
        uut.feed(false, ms(99));
    }
}
