//! Morse symbols

/// A single Morse code element
///
/// A `Symbol` is derived from the duration of one *mark*
/// (an interval of light). Short marks are [`Dot`](Symbol::Dot)s
/// and long marks are [`Dash`](Symbol::Dash)es.
///
/// Symbols have a one-character text representation, which is
/// also used by the [`MorseTable`](crate::MorseTable) patterns:
///
/// ```
/// use std::str::FromStr;
/// use lightmorse::Symbol;
///
/// assert_eq!(".", Symbol::Dot.as_ref());
/// assert_eq!("-", &format!("{}", Symbol::Dash));
/// assert_eq!(Symbol::Dash, Symbol::from_str("-").unwrap());
/// ```
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum_macros::AsRefStr,
    strum_macros::Display,
    strum_macros::EnumIter,
    strum_macros::EnumString,
)]
pub enum Symbol {
    /// Short mark
    #[strum(serialize = ".")]
    Dot,

    /// Long mark
    #[strum(serialize = "-")]
    Dash,
}

impl Symbol {
    /// Pattern character for this symbol
    pub fn as_char(&self) -> char {
        match self {
            Symbol::Dot => '.',
            Symbol::Dash => '-',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::str::FromStr;

    use strum::IntoEnumIterator;

    #[test]
    fn test_text_forms_agree() {
        for sym in Symbol::iter() {
            let mut buf = [0u8; 4];
            assert_eq!(sym.as_ref(), sym.as_char().encode_utf8(&mut buf));
            assert_eq!(sym, Symbol::from_str(sym.as_ref()).unwrap());
        }
        assert!(Symbol::from_str("_").is_err());
    }
}
