//! Decoder outputs for the client

use std::fmt;

#[cfg(not(test))]
use log::{debug, info, trace};

#[cfg(test)]
use std::println as debug;
#[cfg(test)]
use std::println as info;
#[cfg(test)]
use std::println as trace;

use crate::symbol::Symbol;

/// Decoded output
///
/// The decoder reports text at two speeds:
///
/// 1. **Live feedback**: every [`Symbol`](DecodeEvent::Symbol) as
///    its mark ends, and every [`Letter`](DecodeEvent::Letter) and
///    [`WordBreak`](DecodeEvent::WordBreak) as it resolves.
///
/// 2. **Sentences**: when the transmission falls silent, the
///    complete text is reported as a
///    [`SequenceEnd`](DecodeEvent::SequenceEnd).
///
/// Letters and word breaks always appear in the sentence in the
/// order they were reported.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DecodeEvent {
    /// A mark ended and was classified
    Symbol(Symbol),

    /// A letter resolved
    ///
    /// Unrecognized letters are reported as the decoder's fallback
    /// character.
    Letter(char),

    /// A word ended
    WordBreak,

    /// The transmission ended
    ///
    /// Includes the full text of the sentence. The sentence is
    /// cleared afterwards.
    SequenceEnd(String),
}

impl DecodeEvent {
    /// Completed sentence, if any
    pub fn sentence(&self) -> Option<&str> {
        match self {
            DecodeEvent::SequenceEnd(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Consume event, returning the completed sentence, if any
    pub fn into_sentence(self) -> Option<String> {
        match self {
            DecodeEvent::SequenceEnd(text) => Some(text),
            _ => None,
        }
    }
}

impl AsRef<str> for DecodeEvent {
    fn as_ref(&self) -> &str {
        match self {
            DecodeEvent::Symbol(_) => "symbol",
            DecodeEvent::Letter(_) => "letter",
            DecodeEvent::WordBreak => "word break",
            DecodeEvent::SequenceEnd(_) => "sequence end",
        }
    }
}

impl fmt::Display for DecodeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeEvent::Symbol(sym) => write!(f, "{}: \"{}\"", self.as_ref(), sym),
            DecodeEvent::Letter(c) => write!(f, "{}: '{}'", self.as_ref(), c),
            DecodeEvent::SequenceEnd(text) => write!(f, "{}: \"{}\"", self.as_ref(), text),
            DecodeEvent::WordBreak => write!(f, "{}", self.as_ref()),
        }
    }
}

impl From<DecodeEvent> for Option<String> {
    fn from(evt: DecodeEvent) -> Self {
        evt.into_sentence()
    }
}

/// Receives decoded output
///
/// The decoder calls [`emit()`](EventSink::emit) once per event,
/// synchronously, in the order the events occur.
pub trait EventSink {
    /// Accept one event
    fn emit(&mut self, event: DecodeEvent);
}

impl<S> EventSink for &mut S
where
    S: EventSink + ?Sized,
{
    fn emit(&mut self, event: DecodeEvent) {
        (**self).emit(event)
    }
}

/// Collects every event
impl EventSink for Vec<DecodeEvent> {
    fn emit(&mut self, event: DecodeEvent) {
        self.push(event)
    }
}

/// Discards every event
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: DecodeEvent) {}
}

/// Writes every event to the log
///
/// Symbols are logged at `trace`, letters and word breaks at
/// `debug`, and sentences at `info`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&mut self, event: DecodeEvent) {
        match &event {
            DecodeEvent::Symbol(_) => trace!("decoded {}", event),
            DecodeEvent::Letter(_) | DecodeEvent::WordBreak => debug!("decoded {}", event),
            DecodeEvent::SequenceEnd(_) => info!("decoded {}", event),
        }
    }
}
