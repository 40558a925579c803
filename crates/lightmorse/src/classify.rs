//! Pulse and gap classification
//!
//! The [`PulseClassifier`] turns debounced edges into Morse events.
//! It measures two kinds of interval:
//!
//! * **marks** (light), which become [symbols](crate::Symbol); and
//! * **spaces** (dark), which may end a letter, a word, or the
//!   whole transmission.
//!
//! ```txt
//!   start
//!   ||
//!   \/
//! +--------+  rising   +--------+  falling / Symbol   +---------+
//! |  Idle  | ========> |  Mark  | ==================> |  Space  |
//! +--------+           +--------+ <================== +---------+
//!                          /\     rising / boundaries      ||
//!                          ||                              || silence
//!                          ||                              \/
//!                          ||   rising   +---------------------+
//!                          ||=========== |    SequenceEnded    |
//!                                        +---------------------+
//! ```
//!
//! A single gap answers two nested questions. A gap longer than
//! the next-letter threshold ends the letter; if it is also
//! longer than the letter/word threshold, it ends the word too.
//! Gaps are only judged when the *next* mark begins, so a
//! transmission which simply stops is ended by the silence
//! timeout instead.

use std::time::Duration;

use arrayvec::ArrayVec;

#[cfg(not(test))]
use log::{debug, trace};

#[cfg(test)]
use std::println as debug;
#[cfg(test)]
use std::println as trace;

use crate::debounce::StableTransition;
use crate::symbol::Symbol;

/// Classified pulse event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PulseEvent {
    /// A mark ended and was classified
    Symbol(Symbol),

    /// The letter in progress is complete
    LetterBoundary,

    /// The word in progress is complete
    ///
    /// Always immediately preceded by a `LetterBoundary`.
    WordBoundary,

    /// The transmission has gone silent
    SequenceEnd,
}

/// Events produced by a single edge
///
/// No edge produces more than a letter and a word boundary.
pub type PulseEvents = ArrayVec<PulseEvent, 2>;

/// Classifier state
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum_macros::AsRefStr, strum_macros::Display,
)]
pub enum ClassifierState {
    /// No light has been seen yet
    #[strum(serialize = "idle")]
    Idle,

    /// The signal is HIGH
    #[strum(serialize = "mark")]
    Mark,

    /// The signal is LOW
    #[strum(serialize = "space")]
    Space,

    /// The signal is LOW, and the silence timeout has fired
    #[strum(serialize = "sequence ended")]
    SequenceEnded,
}

/// Timing state machine for marks and spaces
///
/// Feed it every stable edge with [`transition()`](#method.transition)
/// and call [`poll()`](#method.poll) on every sample which did
/// *not* produce an edge so that silence can be detected.
///
/// All thresholds are exclusive: a mark of exactly
/// `short_long` is a [`Dot`](Symbol::Dot), and a gap of exactly
/// `next_letter` does not end the letter.
#[derive(Clone, Debug)]
pub struct PulseClassifier {
    state: ClassifierState,

    // start of the current (or last) mark
    mark_start: Duration,

    // start of the current (or last) space
    space_start: Duration,

    // a symbol has been emitted since the last letter boundary
    letter_open: bool,

    // the silence timeout has fired for the current space
    sequence_ended: bool,

    short_long: Duration,
    next_letter: Duration,
    letter_word: Duration,
}

impl PulseClassifier {
    /// New classifier
    ///
    /// * Marks longer than `short_long` are dashes.
    /// * Spaces longer than `next_letter` end a letter.
    /// * Spaces longer than `letter_word` end a word.
    /// * Spaces longer than twice `letter_word` end the sequence.
    ///
    /// The caller is responsible for ordering the thresholds
    /// sensibly; see [`DecoderBuilder`](crate::DecoderBuilder).
    pub fn new(short_long: Duration, next_letter: Duration, letter_word: Duration) -> Self {
        Self {
            state: ClassifierState::Idle,
            mark_start: Duration::ZERO,
            space_start: Duration::ZERO,
            letter_open: false,
            sequence_ended: false,
            short_long,
            next_letter,
            letter_word,
        }
    }

    /// Reset to zero initial conditions
    pub fn reset(&mut self) {
        self.state = ClassifierState::Idle;
        self.mark_start = Duration::ZERO;
        self.space_start = Duration::ZERO;
        self.letter_open = false;
        self.sequence_ended = false;
    }

    /// Handle a stable edge
    ///
    /// A falling edge emits the [`Symbol`] for the mark that just
    /// ended. A rising edge judges the space that just ended and
    /// may emit a letter boundary, or a letter boundary followed
    /// by a word boundary.
    pub fn transition(&mut self, edge: &StableTransition) -> PulseEvents {
        let mut out = PulseEvents::new();

        if edge.to {
            if self.state == ClassifierState::Space && self.letter_open {
                let gap = edge.at.saturating_sub(self.space_start);
                trace!("classifier: space of {:?}", gap);
                if gap > self.next_letter {
                    out.push(PulseEvent::LetterBoundary);
                    self.letter_open = false;
                    if gap > self.letter_word {
                        out.push(PulseEvent::WordBoundary);
                    }
                }
            }

            self.mark_start = edge.at;
            self.sequence_ended = false;
            self.enter(ClassifierState::Mark);
        } else {
            if self.state != ClassifierState::Mark {
                return out;
            }

            let duration = edge.at.saturating_sub(self.mark_start);
            let sym = if duration > self.short_long {
                Symbol::Dash
            } else {
                Symbol::Dot
            };
            trace!("classifier: mark of {:?} → \"{}\"", duration, sym);
            out.push(PulseEvent::Symbol(sym));

            self.letter_open = true;
            self.space_start = edge.at;
            self.sequence_ended = false;
            self.enter(ClassifierState::Space);
        }

        out
    }

    /// Check for end of transmission
    ///
    /// Call on every sample which did not produce an edge, with
    /// that sample's timestamp. If the signal has been dark for
    /// longer than the [sequence timeout](#method.sequence_timeout),
    /// emits [`PulseEvent::SequenceEnd`] exactly once. It will not
    /// fire again until a new mark has been seen.
    pub fn poll(&mut self, now: Duration) -> Option<PulseEvent> {
        if self.state != ClassifierState::Space || self.sequence_ended {
            return None;
        }

        if now.saturating_sub(self.space_start) > self.sequence_timeout() {
            self.close();
            Some(PulseEvent::SequenceEnd)
        } else {
            None
        }
    }

    /// End the sequence now
    ///
    /// Marks the current letter and sequence as finished without
    /// waiting for the silence timeout. If the signal is dark, the
    /// timeout will not fire for this space. If the signal is
    /// light, the mark in progress will start a new letter.
    pub fn close(&mut self) {
        self.letter_open = false;
        if self.state == ClassifierState::Space {
            self.sequence_ended = true;
            self.enter(ClassifierState::SequenceEnded);
        }
    }

    /// Current state
    pub fn state(&self) -> ClassifierState {
        self.state
    }

    /// True if a symbol has been seen since the last boundary
    pub fn letter_open(&self) -> bool {
        self.letter_open
    }

    /// Silence required to end the sequence
    pub fn sequence_timeout(&self) -> Duration {
        self.letter_word * 2
    }

    #[inline]
    fn enter(&mut self, state: ClassifierState) {
        if state != self.state {
            debug!("classifier: {} → {}", self.state, state);
            self.state = state;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(t: u64) -> Duration {
        Duration::from_millis(t)
    }

    fn rise(at: u64) -> StableTransition {
        StableTransition {
            from: false,
            to: true,
            at: ms(at),
        }
    }

    fn fall(at: u64) -> StableTransition {
        StableTransition {
            from: true,
            to: false,
            at: ms(at),
        }
    }

    fn classifier() -> PulseClassifier {
        PulseClassifier::new(ms(300), ms(500), ms(1500))
    }

    // mark from `start` to `end`, then return the symbol
    fn mark(uut: &mut PulseClassifier, start: u64, end: u64) -> PulseEvents {
        let mut out = uut.transition(&rise(start));
        out.extend(uut.transition(&fall(end)));
        out
    }

    #[test]
    fn test_mark_threshold() {
        let mut uut = classifier();
        assert_eq!(ClassifierState::Idle, uut.state());

        assert_eq!(
            &[PulseEvent::Symbol(Symbol::Dot)],
            mark(&mut uut, 0, 100).as_slice()
        );
        assert_eq!(ClassifierState::Space, uut.state());

        // exactly on the threshold is still short
        assert_eq!(
            &[PulseEvent::Symbol(Symbol::Dot)],
            mark(&mut uut, 200, 500).as_slice()
        );
        assert_eq!(
            &[PulseEvent::Symbol(Symbol::Dash)],
            mark(&mut uut, 600, 901).as_slice()
        );
    }

    #[test]
    fn test_gap_nesting() {
        let mut uut = classifier();

        // within a letter
        mark(&mut uut, 0, 100);
        assert!(uut.letter_open());
        assert!(uut.transition(&rise(600)).is_empty());
        uut.transition(&fall(700));

        // on the threshold: still within the letter
        let out = uut.transition(&rise(1200));
        assert!(out.is_empty());
        uut.transition(&fall(1300));

        // letter only, up to and including the word threshold
        assert_eq!(
            &[PulseEvent::LetterBoundary],
            uut.transition(&rise(1801)).as_slice()
        );
        uut.transition(&fall(1900));
        assert_eq!(
            &[PulseEvent::LetterBoundary],
            uut.transition(&rise(3400)).as_slice()
        );
        uut.transition(&fall(3500));

        // letter and word
        assert_eq!(
            &[PulseEvent::LetterBoundary, PulseEvent::WordBoundary],
            uut.transition(&rise(5001)).as_slice()
        );
        assert_eq!(ClassifierState::Mark, uut.state());
    }

    #[test]
    fn test_no_boundary_without_letter() {
        let mut uut = classifier();

        // first light after a long dark period
        assert!(uut.transition(&rise(10_000)).is_empty());
        assert!(!uut.letter_open());

        // falling edge with no mark
        let mut idle = classifier();
        assert!(idle.transition(&fall(100)).is_empty());
        assert_eq!(ClassifierState::Idle, idle.state());
    }

    #[test]
    fn test_sequence_end_fires_once() {
        let mut uut = classifier();
        assert_eq!(ms(3000), uut.sequence_timeout());

        // no sequence end without a mark
        assert_eq!(None, uut.poll(ms(100_000)));

        mark(&mut uut, 100_000, 100_100);
        assert_eq!(None, uut.poll(ms(103_100)));

        let mut ends = 0;
        for t in (103_101..120_000u64).step_by(10) {
            if let Some(evt) = uut.poll(ms(t)) {
                assert_eq!(PulseEvent::SequenceEnd, evt);
                ends += 1;
            }
        }
        assert_eq!(1, ends);
        assert_eq!(ClassifierState::SequenceEnded, uut.state());
        assert!(!uut.letter_open());

        // the next mark produces no boundaries, and re-arms the timeout
        assert!(uut.transition(&rise(120_000)).is_empty());
        uut.transition(&fall(120_100));
        assert_eq!(Some(PulseEvent::SequenceEnd), uut.poll(ms(123_101)));
    }

    #[test]
    fn test_close() {
        let mut uut = classifier();
        mark(&mut uut, 0, 100);
        uut.close();
        assert_eq!(ClassifierState::SequenceEnded, uut.state());
        assert_eq!(None, uut.poll(ms(10_000)));

        // closing during a mark keeps the mark
        let mut uut = classifier();
        mark(&mut uut, 0, 100);
        uut.transition(&rise(200));
        uut.close();
        assert_eq!(ClassifierState::Mark, uut.state());
        assert_eq!(
            &[PulseEvent::Symbol(Symbol::Dash)],
            uut.transition(&fall(600)).as_slice()
        );
        assert!(uut.letter_open());
    }

    #[test]
    fn test_reset() {
        let mut uut = classifier();
        mark(&mut uut, 0, 100);
        uut.reset();
        assert_eq!(ClassifierState::Idle, uut.state());
        assert!(!uut.letter_open());
        assert_eq!(None, uut.poll(ms(10_000)));
    }
}
