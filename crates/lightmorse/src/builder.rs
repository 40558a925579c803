use std::time::Duration;

use thiserror::Error;

use crate::decoder::MorseDecoder;

/// Builds a Morse decoder
///
/// The builder comes with a sensible set of default timings for
/// a hand-keyed lamp sending at roughly five words per minute.
/// Faster or slower operators will want to adjust them. All four
/// timings must be strictly increasing:
///
/// ```txt
/// 0 < debounce window < short/long < next letter < letter/word
/// ```
///
/// [`build()`](#method.build) checks this and refuses to create
/// a decoder with an inconsistent configuration.
///
/// ```
/// use std::time::Duration;
/// use lightmorse::{ConfigError, DecoderBuilder};
///
/// let decoder = DecoderBuilder::new()
///     .with_short_long_threshold(Duration::from_millis(400))
///     .with_letter_word_threshold(Duration::from_millis(1200))
///     .build()
///     .expect("valid configuration");
///
/// let err = DecoderBuilder::new()
///     .with_next_letter_threshold(Duration::from_millis(2000))
///     .build()
///     .unwrap_err();
/// assert!(matches!(err, ConfigError::NextLetterNotBelowLetterWord { .. }));
/// ```
///
/// The API specified by the builder is part of this crate's
/// API. The actual default values are *not*, however, and
/// are subject to revision in any minor release. If you
/// care very strongly about a setting, be sure to configure
/// it here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DecoderBuilder {
    debounce_window: Duration,
    short_long_threshold: Duration,
    next_letter_threshold: Duration,
    letter_word_threshold: Duration,
    fallback: char,
}

impl DecoderBuilder {
    /// New decoder configuration with "sensible" defaults
    pub fn new() -> Self {
        Self {
            debounce_window: Duration::from_millis(50),
            short_long_threshold: Duration::from_millis(300),
            next_letter_threshold: Duration::from_millis(500),
            letter_word_threshold: Duration::from_millis(1500),
            fallback: '?',
        }
    }

    /// Build a decoder
    ///
    /// Once built, the decoder is immediately ready to process
    /// samples. Fails if the timings are not strictly
    /// increasing.
    pub fn build(&self) -> Result<MorseDecoder, ConfigError> {
        self.validate()?;
        Ok(MorseDecoder::from(self))
    }

    /// Check the timing order without building
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.debounce_window.is_zero() {
            return Err(ConfigError::ZeroDebounceWindow);
        }

        if self.debounce_window >= self.short_long_threshold {
            return Err(ConfigError::DebounceNotBelowShortLong {
                debounce_window: self.debounce_window,
                short_long: self.short_long_threshold,
            });
        }

        if self.short_long_threshold >= self.next_letter_threshold {
            return Err(ConfigError::ShortLongNotBelowNextLetter {
                short_long: self.short_long_threshold,
                next_letter: self.next_letter_threshold,
            });
        }

        if self.next_letter_threshold >= self.letter_word_threshold {
            return Err(ConfigError::NextLetterNotBelowLetterWord {
                next_letter: self.next_letter_threshold,
                letter_word: self.letter_word_threshold,
            });
        }

        Ok(())
    }

    /// Debounce window
    ///
    /// The raw input must hold a new level for longer than this
    /// before the decoder believes it. Increase if the output
    /// flickers; keep it well below the length of a dot.
    pub fn with_debounce_window(&mut self, window: Duration) -> &mut Self {
        self.debounce_window = window;
        self
    }

    /// Short/long mark threshold
    ///
    /// Marks longer than this are dashes. Marks of this length
    /// or shorter are dots. Set slightly longer than the
    /// operator's dot.
    pub fn with_short_long_threshold(&mut self, threshold: Duration) -> &mut Self {
        self.short_long_threshold = threshold;
        self
    }

    /// Next-letter threshold
    ///
    /// Spaces longer than this end the current letter. Set
    /// slightly longer than the space between two symbols of
    /// the same letter.
    pub fn with_next_letter_threshold(&mut self, threshold: Duration) -> &mut Self {
        self.next_letter_threshold = threshold;
        self
    }

    /// Letter/word threshold
    ///
    /// Spaces longer than this end the current word as well as
    /// the letter. Set longer than the space between two letters.
    ///
    /// Twice this value is the silence which ends the whole
    /// transmission.
    pub fn with_letter_word_threshold(&mut self, threshold: Duration) -> &mut Self {
        self.letter_word_threshold = threshold;
        self
    }

    /// Fallback character
    ///
    /// Reported in place of any letter whose symbols do not form
    /// a known Morse pattern.
    pub fn with_fallback(&mut self, fallback: char) -> &mut Self {
        self.fallback = fallback;
        self
    }

    /// Debounce window
    pub fn debounce_window(&self) -> Duration {
        self.debounce_window
    }

    /// Short/long mark threshold
    pub fn short_long_threshold(&self) -> Duration {
        self.short_long_threshold
    }

    /// Next-letter threshold
    pub fn next_letter_threshold(&self) -> Duration {
        self.next_letter_threshold
    }

    /// Letter/word threshold
    pub fn letter_word_threshold(&self) -> Duration {
        self.letter_word_threshold
    }

    /// Silence which ends the transmission
    pub fn sequence_timeout(&self) -> Duration {
        self.letter_word_threshold * 2
    }

    /// Fallback character
    pub fn fallback(&self) -> char {
        self.fallback
    }
}

impl std::default::Default for DecoderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Inconsistent decoder timing
///
/// Each variant names the pair of timings which are out of
/// order. The decoder cannot classify anything sensibly unless
/// every threshold is strictly greater than the one before it.
#[derive(Error, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ConfigError {
    /// Debounce window is zero, so every glitch is believed
    #[error("debounce window must be longer than zero")]
    ZeroDebounceWindow,

    /// Debounce window swallows whole dots
    #[error(
        "debounce window ({debounce_window:?}) must be shorter than the short/long threshold ({short_long:?})"
    )]
    DebounceNotBelowShortLong {
        /// Configured debounce window
        debounce_window: Duration,
        /// Configured short/long threshold
        short_long: Duration,
    },

    /// Every gap inside a letter would look like a dash
    #[error(
        "short/long threshold ({short_long:?}) must be shorter than the next-letter threshold ({next_letter:?})"
    )]
    ShortLongNotBelowNextLetter {
        /// Configured short/long threshold
        short_long: Duration,
        /// Configured next-letter threshold
        next_letter: Duration,
    },

    /// Word breaks would precede letter breaks
    #[error(
        "next-letter threshold ({next_letter:?}) must be shorter than the letter/word threshold ({letter_word:?})"
    )]
    NextLetterNotBelowLetterWord {
        /// Configured next-letter threshold
        next_letter: Duration,
        /// Configured letter/word threshold
        letter_word: Duration,
    },
}
