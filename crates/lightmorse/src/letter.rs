//! Letter accumulation

use std::fmt;

use arrayvec::ArrayVec;

#[cfg(not(test))]
use log::{debug, warn};

#[cfg(test)]
use std::println as debug;
#[cfg(test)]
use std::println as warn;

use crate::symbol::Symbol;
use crate::table::MorseTable;

/// Symbols retained for the letter in progress
///
/// Longer than any valid pattern, so that a run of extra
/// symbols is still reported (as the fallback character)
/// instead of silently truncated to something valid.
pub const MAX_PENDING_SYMBOLS: usize = 8;

/// Symbols of the letter in progress
type PendingLetter = ArrayVec<Symbol, MAX_PENDING_SYMBOLS>;

/// Collects symbols into a letter
///
/// Symbols are pushed as marks end. When the classifier decides
/// the letter is over, [`resolve()`](#method.resolve) looks the
/// sequence up in the [`MorseTable`]. Sequences which are not in
/// the table resolve to a *fallback* character instead of
/// failing.
///
/// ```
/// use lightmorse::{LetterAccumulator, Symbol};
///
/// let mut letter = LetterAccumulator::new('?');
/// letter.push_symbol(Symbol::Dash);
/// letter.push_symbol(Symbol::Dot);
/// assert_eq!(Some('N'), letter.resolve());
///
/// // resolving always consumes the letter
/// assert_eq!(None, letter.resolve());
/// ```
#[derive(Clone, Debug)]
pub struct LetterAccumulator {
    pending: PendingLetter,

    // more symbols were pushed than we could store
    overflow: bool,

    fallback: char,
}

impl LetterAccumulator {
    /// New, empty accumulator with the given `fallback` character
    pub fn new(fallback: char) -> Self {
        Self {
            pending: PendingLetter::new(),
            overflow: false,
            fallback,
        }
    }

    /// Discard the letter in progress
    pub fn clear(&mut self) {
        self.pending.clear();
        self.overflow = false;
    }

    /// Append a symbol to the letter in progress
    pub fn push_symbol(&mut self, sym: Symbol) {
        if self.pending.try_push(sym).is_err() {
            self.overflow = true;
        }
    }

    /// Resolve and consume the letter in progress
    ///
    /// Returns the character for the accumulated symbols, or the
    /// fallback character if they do not form a known pattern.
    /// The letter is cleared either way.
    ///
    /// If no symbols have been pushed since the last call, there
    /// is nothing to resolve and `None` is returned.
    pub fn resolve(&mut self) -> Option<char> {
        if self.is_empty() {
            return None;
        }

        let found = if self.overflow {
            None
        } else {
            MorseTable::lookup_symbols(&self.pending)
        };

        let out = match found {
            Some(c) => {
                debug!("letter: \"{}\" → '{}'", self, c);
                c
            }
            None => {
                warn!("letter: unrecognized pattern \"{}\"", self);
                self.fallback
            }
        };

        self.clear();
        Some(out)
    }

    /// True if no symbols are pending
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Number of pending symbols
    ///
    /// Saturates at [`MAX_PENDING_SYMBOLS`].
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Pending symbols, oldest first
    pub fn symbols(&self) -> &[Symbol] {
        self.pending.as_slice()
    }

    /// Fallback character
    pub fn fallback(&self) -> char {
        self.fallback
    }
}

impl fmt::Display for LetterAccumulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for sym in &self.pending {
            write!(f, "{}", sym)?;
        }
        if self.overflow {
            write!(f, "…")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::str::FromStr;

    fn push_pattern(uut: &mut LetterAccumulator, pattern: &str) {
        for ch in pattern.chars() {
            uut.push_symbol(Symbol::from_str(ch.encode_utf8(&mut [0u8; 4])).unwrap());
        }
    }

    #[test]
    fn test_resolve_every_entry() {
        let mut uut = LetterAccumulator::new('?');
        for (pattern, c) in MorseTable::entries() {
            push_pattern(&mut uut, pattern);
            assert_eq!(pattern, &format!("{}", uut));
            assert_eq!(Some(c), uut.resolve());
            assert!(uut.is_empty());
        }
    }

    #[test]
    fn test_resolve_unknown() {
        let mut uut = LetterAccumulator::new('?');

        // four-symbol pattern that is not a letter
        push_pattern(&mut uut, "---.");
        assert_eq!(Some('?'), uut.resolve());

        // six symbols is longer than any pattern
        push_pattern(&mut uut, "......");
        assert_eq!(6, uut.len());
        assert_eq!(Some('?'), uut.resolve());
        assert!(uut.is_empty());

        // custom fallback
        let mut uut = LetterAccumulator::new('*');
        assert_eq!('*', uut.fallback());
        push_pattern(&mut uut, ".-.-.-");
        assert_eq!(Some('*'), uut.resolve());
    }

    #[test]
    fn test_overflow() {
        let mut uut = LetterAccumulator::new('?');
        push_pattern(&mut uut, "-----------");
        assert_eq!(MAX_PENDING_SYMBOLS, uut.len());
        assert!(format!("{}", uut).ends_with('…'));
        assert_eq!(Some('?'), uut.resolve());

        // the overflow does not leak into the next letter
        push_pattern(&mut uut, "-----");
        assert_eq!(Some('0'), uut.resolve());
    }

    #[test]
    fn test_resolve_is_guarded() {
        let mut uut = LetterAccumulator::new('?');
        assert_eq!(None, uut.resolve());

        push_pattern(&mut uut, "...");
        assert_eq!(Some('S'), uut.resolve());
        assert_eq!(None, uut.resolve());
        assert_eq!(None, uut.resolve());
    }

    #[test]
    fn test_clear() {
        let mut uut = LetterAccumulator::new('?');
        push_pattern(&mut uut, ".-");
        assert_eq!(&[Symbol::Dot, Symbol::Dash], uut.symbols());
        uut.clear();
        assert_eq!(None, uut.resolve());
    }
}
