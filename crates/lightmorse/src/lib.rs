//! # lightmorse: Optical Morse Code Decoding
//!
//! This crate decodes Morse code sent with a light: a flashlight,
//! a signal lamp, or an LED. It consumes a stream of *polls* of
//! a light sensor, each reduced to a single bit (light or dark)
//! and stamped with the time it was taken. It reports the
//! decoded text as it arrives.
//!
//! ## Example
//!
//! Obtaining the samples is up to you. A photoresistor on a
//! microcontroller's analog input, compared against a fixed
//! threshold, works well enough. Poll it every few milliseconds
//! and timestamp each poll with a monotonic clock.
//!
//! ```
//! use std::time::Duration;
//! use lightmorse::{DecodeEvent, DecoderBuilder, Sample};
//!
//! let mut decoder = DecoderBuilder::new()
//!     .with_debounce_window(Duration::from_millis(50))     // ignore flicker
//!     .with_short_long_threshold(Duration::from_millis(400)) // dot or dash?
//!     .build()
//!     .expect("bad decoder configuration");
//!
//! // one long flash, polled every 10 ms
//! let samples = (0..500u64).map(|tick| {
//!     Sample::new((10..100).contains(&tick), Duration::from_millis(tick * 10))
//! });
//!
//! let mut sentence = None;
//! for evt in decoder.iter(samples) {
//!     match evt {
//!         DecodeEvent::Letter(c) => println!("letter: {}", c),
//!         DecodeEvent::SequenceEnd(text) => sentence = Some(text),
//!         _ => {}
//!     }
//! }
//! assert_eq!(Some("T".to_owned()), sentence);
//! ```
//!
//! The decoder is created via a [builder](DecoderBuilder), which
//! sets its timing thresholds.
//!
//! [`MorseDecoder`] binds by iterator to any source of
//! [`Sample`]s. The iterator consumes as many samples as are
//! needed to produce the next [`DecodeEvent`]. If you would rather
//! push samples one at a time, use
//! [`tick()`](MorseDecoder::tick) with an [`EventSink`].
//!
//! ## How it works
//!
//! Each sample passes through four stages:
//!
//! 1. A [`Debouncer`] holds back any change in the light level
//!    until it has persisted for longer than the debounce window.
//!
//! 2. A [`PulseClassifier`] times the debounced marks (light) and
//!    spaces (dark). A mark longer than the short/long threshold
//!    is a dash; otherwise it is a dot. A space longer than the
//!    next-letter threshold ends the letter. A space longer than
//!    the letter/word threshold also ends the word. Silence for
//!    twice the letter/word threshold ends the transmission.
//!
//! 3. A [`LetterAccumulator`] collects dots and dashes and looks
//!    them up in the [`MorseTable`]. Unknown sequences become a
//!    fallback character, `?` by default.
//!
//! 4. A [`SentenceAssembler`] strings the letters and word breaks
//!    together until the transmission ends.
//!
//! Time comes only from the sample timestamps. The decoder never
//! reads a clock of its own, so a recording decodes exactly like
//! the live signal it was made from.

mod builder;
mod classify;
mod debounce;
mod decoder;
mod letter;
mod output;
mod sentence;
mod symbol;
mod table;

pub use builder::{ConfigError, DecoderBuilder};
pub use classify::{ClassifierState, PulseClassifier, PulseEvent, PulseEvents};
pub use debounce::{Debouncer, Sample, StableTransition};
pub use decoder::{MorseDecoder, SourceIter};
pub use letter::{LetterAccumulator, MAX_PENDING_SYMBOLS};
pub use output::{DecodeEvent, EventSink, LogSink, NullSink};
pub use sentence::{SentenceAssembler, WORD_SEPARATOR};
pub use symbol::Symbol;
pub use table::{MorseTable, MAX_PATTERN_LEN};
