//! Static Morse lookup table.
//!
//! Covers the letters A-Z and the digits 0-9. Lookups are exact-string
//! matches in both directions; there is no prefix or partial decoding.

/// Glyph for a dot.
pub const DOT: char = '.';
/// Glyph for a dash.
pub const DASH: char = '-';

const MORSE_TABLE: [(char, &str); 36] = [
    ('A', ".-"),
    ('B', "-..."),
    ('C', "-.-."),
    ('D', "-.."),
    ('E', "."),
    ('F', "..-."),
    ('G', "--."),
    ('H', "...."),
    ('I', ".."),
    ('J', ".---"),
    ('K', "-.-"),
    ('L', ".-.."),
    ('M', "--"),
    ('N', "-."),
    ('O', "---"),
    ('P', ".--."),
    ('Q', "--.-"),
    ('R', ".-."),
    ('S', "..."),
    ('T', "-"),
    ('U', "..-"),
    ('V', "...-"),
    ('W', ".--"),
    ('X', "-..-"),
    ('Y', "-.--"),
    ('Z', "--.."),
    ('0', "-----"),
    ('1', ".----"),
    ('2', "..---"),
    ('3', "...--"),
    ('4', "....-"),
    ('5', "....."),
    ('6', "-...."),
    ('7', "--..."),
    ('8', "---.."),
    ('9', "----."),
];

/// Returns the Morse glyph string for a letter or digit.
///
/// Letters are matched case-insensitively.
pub fn letter_to_morse(c: char) -> Option<&'static str> {
    let c = c.to_ascii_uppercase();
    MORSE_TABLE
        .iter()
        .find(|(letter, _)| *letter == c)
        .map(|(_, morse)| *morse)
}

/// Returns the letter or digit for an exact Morse glyph string.
pub fn morse_to_letter(morse: &str) -> Option<char> {
    MORSE_TABLE
        .iter()
        .find(|(_, glyphs)| *glyphs == morse)
        .map(|(letter, _)| *letter)
}

/// Iterates over every `(letter, glyphs)` entry of the table.
pub fn entries() -> impl Iterator<Item = (char, &'static str)> {
    MORSE_TABLE.iter().copied()
}
