//! DTMF symbol alphabet and frequency matrix
//!
//! Shared lookup tables used by the synthesizer, the codec and the sequencer.
//! The sixteen symbols are ordered so that a symbol's index is its nibble value.

/// Symbol characters in nibble order (`0x0` → `'0'`, ..., `0xF` → `'*'`).
pub const ALPHABET: [u8; 16] = *b"0123456789ABCD#*";

/// Low-group (row) frequencies in Hz.
pub const ROW_FREQUENCIES: [u16; 4] = [697, 770, 852, 941];

/// High-group (column) frequencies in Hz.
pub const COLUMN_FREQUENCIES: [u16; 4] = [1209, 1336, 1477, 1633];

/// Keypad layout, row-major, matching [`ROW_FREQUENCIES`] × [`COLUMN_FREQUENCIES`].
const KEYPAD: [[u8; 4]; 4] = [
    *b"123A", //
    *b"456B", //
    *b"789C", //
    *b"*0#D",
];

/// Marker for bytes that are not part of the alphabet in [`NIBBLE_OF`].
const INVALID: u8 = 0xFF;

/// Reverse table: ASCII byte → nibble value, or [`INVALID`].
static NIBBLE_OF: [u8; 256] = build_nibble_table();

const fn build_nibble_table() -> [u8; 256] {
    let mut table = [INVALID; 256];
    let mut i = 0;
    while i < ALPHABET.len() {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
}

/// (low, high) frequency pair per nibble value.
static FREQUENCY_PAIRS: [(u16, u16); 16] = build_pair_table();

const fn build_pair_table() -> [(u16, u16); 16] {
    let mut pairs = [(0u16, 0u16); 16];
    let mut row = 0;
    while row < 4 {
        let mut col = 0;
        while col < 4 {
            let key = KEYPAD[row][col];
            let mut nibble = 0;
            while ALPHABET[nibble] != key {
                nibble += 1;
            }
            pairs[nibble] = (ROW_FREQUENCIES[row], COLUMN_FREQUENCIES[col]);
            col += 1;
        }
        row += 1;
    }
    pairs
}

/// One of the sixteen DTMF symbols.
///
/// The wrapped value is the symbol's nibble (`0x0..=0xF`); construction goes
/// through [`Symbol::from_nibble`] or [`Symbol::from_ascii`], so it is always
/// in range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(u8);

impl Symbol {
    /// Every symbol in nibble order.
    pub const ALL: [Symbol; 16] = {
        let mut all = [Symbol(0); 16];
        let mut i = 0;
        while i < 16 {
            all[i] = Symbol(i as u8);
            i += 1;
        }
        all
    };

    /// Symbol for the low four bits of `nibble`.
    #[inline]
    pub const fn from_nibble(nibble: u8) -> Self {
        Symbol(nibble & 0x0F)
    }

    /// Exact (case-sensitive) lookup of an alphabet character.
    #[inline]
    pub fn from_ascii(byte: u8) -> Option<Self> {
        match NIBBLE_OF[byte as usize] {
            INVALID => None,
            nibble => Some(Symbol(nibble)),
        }
    }

    /// Nibble value `0x0..=0xF`.
    #[inline]
    pub const fn nibble(self) -> u8 {
        self.0
    }

    /// ASCII character of this symbol.
    #[inline]
    pub const fn as_ascii(self) -> u8 {
        ALPHABET[self.0 as usize]
    }

    /// Index usable for per-symbol tables.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// (low-group, high-group) frequency pair in Hz.
    #[inline]
    pub fn frequencies(self) -> (u16, u16) {
        FREQUENCY_PAIRS[self.0 as usize]
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_ascii() as char)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_nibble_mapping_is_bijective() {
        for nibble in 0u8..16 {
            let symbol = Symbol::from_nibble(nibble);
            assert_eq!(symbol.nibble(), nibble);
            assert_eq!(Symbol::from_ascii(symbol.as_ascii()), Some(symbol));
        }
    }

    #[test]
    fn test_hash_and_star_positions() {
        assert_eq!(Symbol::from_ascii(b'#').map(Symbol::nibble), Some(0xE));
        assert_eq!(Symbol::from_ascii(b'*').map(Symbol::nibble), Some(0xF));
    }

    #[test]
    fn test_rejects_non_alphabet_bytes() {
        let valid: HashSet<u8> = ALPHABET.iter().copied().collect();
        for byte in 0u8..=255 {
            assert_eq!(Symbol::from_ascii(byte).is_some(), valid.contains(&byte));
        }
        // Lower case is not part of the codec alphabet.
        assert_eq!(Symbol::from_ascii(b'a'), None);
    }

    #[test]
    fn test_frequency_pairs_are_unique() {
        let pairs: HashSet<(u16, u16)> = Symbol::ALL.iter().map(|s| s.frequencies()).collect();
        assert_eq!(pairs.len(), 16);
    }

    #[test]
    fn test_standard_keypad_frequencies() {
        let pair = |c: u8| Symbol::from_ascii(c).unwrap().frequencies();
        assert_eq!(pair(b'1'), (697, 1209));
        assert_eq!(pair(b'0'), (941, 1336));
        assert_eq!(pair(b'*'), (941, 1209));
        assert_eq!(pair(b'#'), (941, 1477));
        assert_eq!(pair(b'A'), (697, 1633));
        assert_eq!(pair(b'D'), (941, 1633));
    }

    #[test]
    fn test_pair_table_matches_keypad() {
        for (row, keys) in KEYPAD.iter().enumerate() {
            for (col, &key) in keys.iter().enumerate() {
                let symbol = Symbol::from_ascii(key).unwrap();
                assert_eq!(
                    symbol.frequencies(),
                    (ROW_FREQUENCIES[row], COLUMN_FREQUENCIES[col])
                );
            }
        }
        assert!(FREQUENCY_PAIRS.iter().all(|&(low, high)| low > 0 && high > 0));
    }

    #[test]
    fn test_display() {
        assert_eq!(Symbol::from_nibble(0xE).to_string(), "#");
    }
}
