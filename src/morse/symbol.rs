//! Canonical symbols and their glyph rendering.

use super::table::{self, DASH, DOT};
use serde::{Deserialize, Serialize};

/// Separator between letters in a rendered Morse string.
pub const LETTER_SEPARATOR: &str = " ";
/// Separator between words in a rendered Morse string.
pub const WORD_SEPARATOR: &str = " / ";

/// The five timing classes a clustered run can belong to.
///
/// The discriminant is the signed length in Morse units: marks are
/// positive, gaps negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CanonicalSymbol {
    /// Gap between words (7 units).
    WordGap = -7,
    /// Gap between letters (3 units).
    LetterGap = -3,
    /// Gap between the dots and dashes of one letter (1 unit).
    SymbolGap = -1,
    /// Short mark (1 unit).
    Dot = 1,
    /// Long mark (3 units).
    Dash = 3,
}

impl CanonicalSymbol {
    /// All symbols in ascending order of value.
    pub const ALL: [CanonicalSymbol; 5] = [
        CanonicalSymbol::WordGap,
        CanonicalSymbol::LetterGap,
        CanonicalSymbol::SymbolGap,
        CanonicalSymbol::Dot,
        CanonicalSymbol::Dash,
    ];

    /// Signed unit length.
    #[inline]
    pub fn value(self) -> i32 {
        self as i32
    }

    /// Unsigned unit length.
    #[inline]
    pub fn units(self) -> usize {
        self.value().unsigned_abs() as usize
    }

    /// True for `Dot` and `Dash`.
    #[inline]
    pub fn is_mark(self) -> bool {
        self.value() > 0
    }

    /// Glyph text emitted for this symbol. The symbol gap is implicit.
    pub fn glyph(self) -> &'static str {
        match self {
            CanonicalSymbol::WordGap => WORD_SEPARATOR,
            CanonicalSymbol::LetterGap => LETTER_SEPARATOR,
            CanonicalSymbol::SymbolGap => "",
            CanonicalSymbol::Dot => ".",
            CanonicalSymbol::Dash => "-",
        }
    }
}

/// Renders a symbol sequence to a Morse glyph string.
pub fn render_morse(symbols: &[CanonicalSymbol]) -> String {
    symbols.iter().map(|s| s.glyph()).collect()
}

/// Decodes a rendered Morse string to text.
///
/// Unknown glyph groups are dropped. Decoded words are separated by a
/// single space.
pub fn decode_morse(morse: &str) -> String {
    let mut output = String::new();
    for word in morse.split(WORD_SEPARATOR) {
        for glyphs in word.split(LETTER_SEPARATOR) {
            if let Some(letter) = table::morse_to_letter(glyphs) {
                output.push(letter);
            }
        }
        output.push(' ');
    }
    output.trim().to_string()
}

/// Encodes text into the canonical symbol stream a sender would key.
///
/// Characters without a table entry are skipped. Whitespace separates
/// words.
pub fn encode_text(text: &str) -> Vec<CanonicalSymbol> {
    let mut symbols = Vec::new();
    for word in text.split_whitespace() {
        let letters: Vec<&str> = word.chars().filter_map(table::letter_to_morse).collect();
        if letters.is_empty() {
            continue;
        }
        if !symbols.is_empty() {
            symbols.push(CanonicalSymbol::WordGap);
        }
        for (i, glyphs) in letters.iter().enumerate() {
            if i > 0 {
                symbols.push(CanonicalSymbol::LetterGap);
            }
            for (j, glyph) in glyphs.chars().enumerate() {
                if j > 0 {
                    symbols.push(CanonicalSymbol::SymbolGap);
                }
                symbols.push(if glyph == DOT {
                    CanonicalSymbol::Dot
                } else {
                    debug_assert_eq!(glyph, DASH);
                    CanonicalSymbol::Dash
                });
            }
        }
    }
    symbols
}

/// Expands symbols into an on/off keying schedule of `unit_ticks` per unit.
pub fn keying(symbols: &[CanonicalSymbol], unit_ticks: usize) -> Vec<bool> {
    let unit_ticks = unit_ticks.max(1);
    symbols
        .iter()
        .flat_map(|s| std::iter::repeat(s.is_mark()).take(s.units() * unit_ticks))
        .collect()
}
