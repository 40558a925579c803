//! Full decoder chain

#[cfg(not(test))]
use log::{debug, info, trace};

#[cfg(test)]
use std::println as debug;
#[cfg(test)]
use std::println as info;
#[cfg(test)]
use std::println as trace;

use std::convert::From;
use std::iter::{IntoIterator, Iterator};

use arraydeque::ArrayDeque;

use crate::builder::DecoderBuilder;
use crate::classify::{ClassifierState, PulseClassifier, PulseEvent};
use crate::debounce::{Debouncer, Sample};
use crate::letter::LetterAccumulator;
use crate::output::{DecodeEvent, EventSink};
use crate::sentence::SentenceAssembler;
use crate::symbol::Symbol;

/// A complete Morse decoder
///
/// The decoder takes timestamped boolean [`Sample`]s, one per
/// poll of the light sensor, and performs the following
/// operations:
///
/// 1. Debouncing, which rejects flicker shorter than the
///    debounce window.
/// 2. Pulse classification, which times each mark and space.
///    Marks become dots and dashes; spaces become letter and
///    word boundaries; a long silence ends the sequence.
/// 3. Letter accumulation and lookup.
/// 4. Sentence assembly.
///
/// All state lives in this object. There is no hidden clock:
/// time comes only from the sample timestamps, so the decoder
/// runs equally well against a live sensor or a recording.
///
/// To create the decoder, first create its Builder:
///
/// ```
/// use lightmorse::DecoderBuilder;
///
/// let decoder = DecoderBuilder::default().build().expect("bad config");
/// assert_eq!("", decoder.sentence());
/// ```
///
/// See [module documentation](index.html) for details.
#[derive(Clone, Debug)]
pub struct MorseDecoder {
    debouncer: Debouncer,
    classifier: PulseClassifier,
    letter: LetterAccumulator,
    sentence: SentenceAssembler,
    sample_counter: u64,
    backlog: EventBacklog,
}

impl MorseDecoder {
    /// Process one sample
    ///
    /// Runs `sample` through the whole chain and reports any
    /// resulting events to `sink`, in order. Most samples produce
    /// no events at all.
    ///
    /// # Panics
    ///
    /// Panics if the sample timestamp is earlier than that of a
    /// previous sample.
    pub fn tick<S>(&mut self, sample: Sample, sink: &mut S)
    where
        S: EventSink + ?Sized,
    {
        self.sample_counter = self.sample_counter.wrapping_add(1);

        match self.debouncer.feed(sample.raw, sample.timestamp) {
            Some(edge) => {
                trace!(
                    "decoder [{:<10}]: edge {} → {} at {:?}",
                    self.sample_counter,
                    edge.from as u8,
                    edge.to as u8,
                    edge.at
                );
                for evt in self.classifier.transition(&edge) {
                    self.dispatch(evt, sink);
                }
            }
            None => {
                if let Some(evt) = self.classifier.poll(sample.timestamp) {
                    self.dispatch(evt, sink);
                }
            }
        }
    }

    /// Decode from a source of samples
    ///
    /// Bind an iterator which will consume the `input` and
    /// produce [`DecodeEvent`]s. The iterator consumes as many
    /// samples as are required to produce the next event. It
    /// returns `None` once the input is exhausted.
    ///
    /// A transmission which is still in progress when the input
    /// runs out is *not* reported. Call
    /// [`flush()`](#method.flush) afterwards to collect it.
    #[must_use = "iterators are lazy and do nothing unless consumed"]
    pub fn iter<'dec, I, T>(&'dec mut self, input: I) -> SourceIter<'dec, T>
    where
        I: IntoIterator<Item = Sample> + IntoIterator<IntoIter = T>,
        T: Iterator<Item = Sample>,
    {
        SourceIter {
            source: input.into_iter(),
            decoder: self,
        }
    }

    /// End the transmission now and emit what remains
    ///
    /// Use at the end of input. If a letter or sentence is in
    /// progress, the letter is resolved and the whole sentence is
    /// reported to `sink` as a [`DecodeEvent::SequenceEnd`]. The
    /// sentence text is also returned.
    ///
    /// Returns `None` if there was nothing to flush. The silence
    /// timeout will not report the same sentence again. Events
    /// still queued by an abandoned [`iter()`](#method.iter) are
    /// reported first.
    pub fn flush<S>(&mut self, sink: &mut S) -> Option<String>
    where
        S: EventSink + ?Sized,
    {
        while let Some(evt) = self.backlog.pop_front() {
            sink.emit(evt);
        }

        if self.letter.is_empty() && self.sentence.is_empty() {
            return None;
        }

        debug!("decoder: flushing at end of input");
        self.classifier.close();
        Some(self.end_sequence(sink))
    }

    /// Clear all state and reset to zero initial conditions
    ///
    /// Any letter or sentence in progress is discarded. The next
    /// sample may use any timestamp.
    pub fn reset(&mut self) {
        self.debouncer.reset();
        self.classifier.reset();
        self.letter.clear();
        self.sentence.clear();
        self.sample_counter = 0;
        self.backlog.clear();
    }

    /// Sentence decoded so far
    ///
    /// Does not include the letter in progress.
    pub fn sentence(&self) -> &str {
        self.sentence.as_str()
    }

    /// Symbols of the letter in progress
    pub fn pending_symbols(&self) -> &[Symbol] {
        self.letter.symbols()
    }

    /// Classifier state
    pub fn state(&self) -> ClassifierState {
        self.classifier.state()
    }

    /// Debounced signal level
    pub fn stable_signal(&self) -> bool {
        self.debouncer.stable()
    }

    /// Lifetime total sample counter
    ///
    /// Reports the number of samples processed since creation
    /// or the last [`reset()`](#method.reset).
    pub fn sample_counter(&self) -> u64 {
        self.sample_counter
    }

    // Act on one classifier event
    fn dispatch<S>(&mut self, evt: PulseEvent, sink: &mut S)
    where
        S: EventSink + ?Sized,
    {
        match evt {
            PulseEvent::Symbol(sym) => {
                self.letter.push_symbol(sym);
                sink.emit(DecodeEvent::Symbol(sym));
            }
            PulseEvent::LetterBoundary => self.resolve_letter(sink),
            PulseEvent::WordBoundary => {
                if self.sentence.push_word_break() {
                    sink.emit(DecodeEvent::WordBreak);
                }
            }
            PulseEvent::SequenceEnd => {
                self.end_sequence(sink);
            }
        }
    }

    // Move the letter in progress, if any, into the sentence
    fn resolve_letter<S>(&mut self, sink: &mut S)
    where
        S: EventSink + ?Sized,
    {
        if let Some(c) = self.letter.resolve() {
            self.sentence.push_char(c);
            sink.emit(DecodeEvent::Letter(c));
        }
    }

    // Resolve the final letter and report the sentence
    fn end_sequence<S>(&mut self, sink: &mut S) -> String
    where
        S: EventSink + ?Sized,
    {
        self.resolve_letter(sink);
        let text = self.sentence.flush();
        info!(
            "decoder [{:<10}]: sequence ended: \"{}\"",
            self.sample_counter, text
        );
        sink.emit(DecodeEvent::SequenceEnd(text.clone()));
        text
    }
}

impl From<&DecoderBuilder> for MorseDecoder {
    /// Create the decoder from its Builder
    ///
    /// The builder's configuration is not checked. Prefer
    /// [`DecoderBuilder::build()`].
    fn from(cfg: &DecoderBuilder) -> Self {
        Self {
            debouncer: Debouncer::new(cfg.debounce_window()),
            classifier: PulseClassifier::new(
                cfg.short_long_threshold(),
                cfg.next_letter_threshold(),
                cfg.letter_word_threshold(),
            ),
            letter: LetterAccumulator::new(cfg.fallback()),
            sentence: SentenceAssembler::new(),
            sample_counter: 0,
            backlog: EventBacklog::new(),
        }
    }
}

/// Sample source iterator
///
/// This iterator is bound to a source of [`Sample`]s. Calling
/// the `next()` method will return the next [`DecodeEvent`]
/// from the decoder or `None` if the available samples have
/// been consumed without any new events.
#[derive(Debug)]
pub struct SourceIter<'dec, I>
where
    I: Iterator<Item = Sample>,
{
    source: I,
    decoder: &'dec mut MorseDecoder,
}

impl<'dec, I> Iterator for SourceIter<'dec, I>
where
    I: Iterator<Item = Sample>,
{
    type Item = DecodeEvent;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(evt) = self.decoder.backlog.pop_front() {
            return Some(evt);
        }

        for sa in &mut self.source {
            let mut backlog =
                std::mem::replace(&mut self.decoder.backlog, EventBacklog::new());
            self.decoder.tick(sa, &mut backlog);
            let out = backlog.pop_front();
            self.decoder.backlog = backlog;

            if out.is_some() {
                return out;
            }
        }

        None
    }
}

/// Events from one sample which have not been returned yet
///
/// A single sample yields at most a letter and a word break, or
/// a final letter and a sentence.
type EventBacklog = ArrayDeque<DecodeEvent, 4, arraydeque::Saturating>;

impl EventSink for EventBacklog {
    fn emit(&mut self, event: DecodeEvent) {
        if let Err(err) = self.push_back(event) {
            // unreachable with the classifier's event bound
            log::error!("decoder: event backlog overflow: dropped {}", err.element);
        }
    }
}
