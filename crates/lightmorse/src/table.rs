//! International Morse code table
//!
//! The decoder recognizes the 36 alphanumeric characters of
//! International Morse code. Each is a sequence of one to five
//! [symbols](crate::Symbol):
//!
//! | Char | Code    | Char | Code    | Char | Code    |
//! |------|---------|------|---------|------|---------|
//! | `A`  | `.-`    | `M`  | `--`    | `Y`  | `-.--`  |
//! | `B`  | `-...`  | `N`  | `-.`    | `Z`  | `--..`  |
//! | `C`  | `-.-.`  | `O`  | `---`   | `0`  | `-----` |
//! | `D`  | `-..`   | `P`  | `.--.`  | `1`  | `.----` |
//! | `E`  | `.`     | `Q`  | `--.-`  | `2`  | `..---` |
//! | `F`  | `..-.`  | `R`  | `.-.`   | `3`  | `...--` |
//! | `G`  | `--.`   | `S`  | `...`   | `4`  | `....-` |
//! | `H`  | `....`  | `T`  | `-`     | `5`  | `.....` |
//! | `I`  | `..`    | `U`  | `..-`   | `6`  | `-....` |
//! | `J`  | `.---`  | `V`  | `...-`  | `7`  | `--...` |
//! | `K`  | `-.-`   | `W`  | `.--`   | `8`  | `---..` |
//! | `L`  | `.-..`  | `X`  | `-..-`  | `9`  | `----.` |
//!
//! Punctuation and prosigns are not recognized.

use arrayvec::ArrayString;
use phf::phf_map;

use crate::symbol::Symbol;

/// Longest pattern in the table, in symbols
pub const MAX_PATTERN_LEN: usize = 5;

/// Bidirectional Morse code lookup
///
/// The table is static and immutable. Lookup is by exact match
/// only: there is no prefix or "closest" matching.
///
/// ```
/// use lightmorse::{MorseTable, Symbol};
///
/// assert_eq!(Some('O'), MorseTable::lookup("---"));
/// assert_eq!(Some('A'), MorseTable::lookup_symbols(&[Symbol::Dot, Symbol::Dash]));
/// assert_eq!(None, MorseTable::lookup("......"));
/// assert_eq!(Some("...--"), MorseTable::pattern_for('3'));
/// assert_eq!(Some("-.-"), MorseTable::pattern_for('k'));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MorseTable;

impl MorseTable {
    /// Character for a text pattern like "`.-.`"
    pub fn lookup<S>(pattern: S) -> Option<char>
    where
        S: AsRef<str>,
    {
        CODEBOOK.get(pattern.as_ref()).copied()
    }

    /// Character for a sequence of symbols
    ///
    /// Returns `None` if the sequence is empty, longer than any
    /// valid pattern, or simply not in the table.
    pub fn lookup_symbols(symbols: &[Symbol]) -> Option<char> {
        if symbols.is_empty() || symbols.len() > MAX_PATTERN_LEN {
            return None;
        }

        let mut pattern = ArrayString::<MAX_PATTERN_LEN>::new();
        for sym in symbols {
            pattern.push(sym.as_char());
        }
        Self::lookup(pattern.as_str())
    }

    /// Text pattern for a character
    ///
    /// Letters are matched without regard to case.
    pub fn pattern_for(c: char) -> Option<&'static str> {
        PATTERNS.get(&c.to_ascii_uppercase()).copied()
    }

    /// All `(pattern, character)` entries
    pub fn entries() -> impl Iterator<Item = (&'static str, char)> {
        CODEBOOK.entries().map(|(pattern, c)| (*pattern, *c))
    }

    /// Number of entries
    pub fn len() -> usize {
        CODEBOOK.len()
    }
}

/// Pattern → character
static CODEBOOK: phf::Map<&'static str, char> = phf_map! {
    // letters
    ".-" => 'A',
    "-..." => 'B',
    "-.-." => 'C',
    "-.." => 'D',
    "." => 'E',
    "..-." => 'F',
    "--." => 'G',
    "...." => 'H',
    ".." => 'I',
    ".---" => 'J',
    "-.-" => 'K',
    ".-.." => 'L',
    "--" => 'M',
    "-." => 'N',
    "---" => 'O',
    ".--." => 'P',
    "--.-" => 'Q',
    ".-." => 'R',
    "..." => 'S',
    "-" => 'T',
    "..-" => 'U',
    "...-" => 'V',
    ".--" => 'W',
    "-..-" => 'X',
    "-.--" => 'Y',
    "--.." => 'Z',

    // digits
    "-----" => '0',
    ".----" => '1',
    "..---" => '2',
    "...--" => '3',
    "....-" => '4',
    "....." => '5',
    "-...." => '6',
    "--..." => '7',
    "---.." => '8',
    "----." => '9',
};

/// Character → pattern
///
/// Must mirror [`CODEBOOK`] exactly.
static PATTERNS: phf::Map<char, &'static str> = phf_map! {
    'A' => ".-",
    'B' => "-...",
    'C' => "-.-.",
    'D' => "-..",
    'E' => ".",
    'F' => "..-.",
    'G' => "--.",
    'H' => "....",
    'I' => "..",
    'J' => ".---",
    'K' => "-.-",
    'L' => ".-..",
    'M' => "--",
    'N' => "-.",
    'O' => "---",
    'P' => ".--.",
    'Q' => "--.-",
    'R' => ".-.",
    'S' => "...",
    'T' => "-",
    'U' => "..-",
    'V' => "...-",
    'W' => ".--",
    'X' => "-..-",
    'Y' => "-.--",
    'Z' => "--..",
    '0' => "-----",
    '1' => ".----",
    '2' => "..---",
    '3' => "...--",
    '4' => "....-",
    '5' => ".....",
    '6' => "-....",
    '7' => "--...",
    '8' => "---..",
    '9' => "----.",
};
