//! Sentence assembly

use std::fmt;

/// Separator appended at a word break
pub const WORD_SEPARATOR: char = ' ';

/// Collects resolved characters into a sentence
///
/// Word breaks collapse: a break is never the first character
/// of a sentence and never follows another break.
///
/// ```
/// use lightmorse::SentenceAssembler;
///
/// let mut sentence = SentenceAssembler::new();
/// assert!(!sentence.push_word_break());
/// sentence.push_char('H');
/// sentence.push_char('I');
/// assert!(sentence.push_word_break());
/// assert!(!sentence.push_word_break());
/// assert_eq!("HI ", sentence.flush());
/// assert!(sentence.is_empty());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SentenceAssembler {
    text: String,
}

impl SentenceAssembler {
    /// New, empty sentence
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a character
    pub fn push_char(&mut self, c: char) {
        self.text.push(c);
    }

    /// Append a word break
    ///
    /// Returns `true` if a separator was actually appended.
    pub fn push_word_break(&mut self) -> bool {
        match self.text.chars().last() {
            None | Some(WORD_SEPARATOR) => false,
            Some(_) => {
                self.text.push(WORD_SEPARATOR);
                true
            }
        }
    }

    /// Take the sentence, leaving this one empty
    pub fn flush(&mut self) -> String {
        std::mem::take(&mut self.text)
    }

    /// Discard the sentence
    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Sentence so far
    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }

    /// True if nothing has been appended
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl AsRef<str> for SentenceAssembler {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for SentenceAssembler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.text.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_breaks_collapse() {
        let mut uut = SentenceAssembler::new();
        assert!(!uut.push_word_break());
        assert!(uut.is_empty());

        uut.push_char('E');
        assert!(uut.push_word_break());
        assert!(!uut.push_word_break());
        uut.push_char('T');
        assert_eq!("E T", uut.as_str());
    }

    #[test]
    fn test_flush() {
        let mut uut = SentenceAssembler::new();
        uut.push_char('S');
        uut.push_char('O');
        uut.push_char('S');
        assert_eq!("SOS", &format!("{}", uut));

        assert_eq!("SOS", uut.flush());
        assert_eq!("", uut.flush());

        // a flush resets the collapsing rule too
        assert!(!uut.push_word_break());
    }
}
