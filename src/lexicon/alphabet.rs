//! The ordered domain alphabet and Thai script classification

use std::collections::HashMap;

/// Thai consonants in Royal Institute dictionary order
///
/// This is both the order in which the lookup service is walked and the primary
/// collation rank of every character.
pub const THAI_ALPHABET: [char; 46] = [
    'ก', 'ข', 'ฃ', 'ค', 'ฅ', 'ฆ', 'ง', 'จ', 'ฉ', 'ช', 'ซ', 'ฌ', 'ญ', 'ฎ', 'ฏ', 'ฐ', 'ฑ', 'ฒ',
    'ณ', 'ด', 'ต', 'ถ', 'ท', 'ธ', 'น', 'บ', 'ป', 'ผ', 'ฝ', 'พ', 'ฟ', 'ภ', 'ม', 'ย', 'ร', 'ฤ',
    'ล', 'ฦ', 'ว', 'ศ', 'ษ', 'ส', 'ห', 'ฬ', 'อ', 'ฮ',
];

/// Separators that turn an entry into a compound word: space, hyphen, en dash
pub const COMPOUND_SEPARATORS: [char; 3] = [' ', '-', '\u{2013}'];

/// Returns true if the character belongs to the Thai block
///
/// Covers consonants, vowels, tone marks, the baht sign and Thai digits/punctuation
/// (U+0E01..=U+0E3A and U+0E3F..=U+0E5B). The unassigned gap U+0E3B..=U+0E3E is
/// excluded.
pub fn is_script_char(c: char) -> bool {
    matches!(c, '\u{0E01}'..='\u{0E3A}' | '\u{0E3F}'..='\u{0E5B}')
}

/// Returns true if the character separates the parts of a compound word
pub fn is_compound_separator(c: char) -> bool {
    COMPOUND_SEPARATORS.contains(&c)
}

/// Returns true if the word contains a compound separator
pub fn is_compound_word(word: &str) -> bool {
    word.chars().any(is_compound_separator)
}

/// A fixed, ordered set of domain symbols
///
/// Each symbol is one request partition of the remote dictionary; its position is its
/// collation rank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
    ranks: HashMap<char, u32>,
}

impl Alphabet {
    /// The Royal Institute alphabet used against the live service
    pub fn thai() -> Self {
        let symbols = THAI_ALPHABET.to_vec();
        let ranks = symbols
            .iter()
            .enumerate()
            .map(|(index, symbol)| (*symbol, index as u32))
            .collect();
        Self { symbols, ranks }
    }

    /// Builds an alphabet from an ordered list of symbols
    ///
    /// Returns the first repeated symbol as the error if the list is not a set.
    pub fn new(symbols: Vec<char>) -> Result<Self, char> {
        let mut ranks = HashMap::with_capacity(symbols.len());
        for (index, symbol) in symbols.iter().enumerate() {
            if ranks.insert(*symbol, index as u32).is_some() {
                return Err(*symbol);
            }
        }
        Ok(Self { symbols, ranks })
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbol at a crawl position
    pub fn symbol(&self, index: usize) -> Option<char> {
        self.symbols.get(index).copied()
    }

    /// Crawl position (and collation rank) of a symbol
    pub fn rank(&self, symbol: char) -> Option<u32> {
        self.ranks.get(&symbol).copied()
    }

    pub fn contains(&self, symbol: char) -> bool {
        self.ranks.contains_key(&symbol)
    }

    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::thai()
    }
}
