//! Morse code tables and symbol rendering.
//!
//! The translator only ever hands this module the five canonical symbols;
//! everything about glyphs and letters lives here.

mod symbol;
mod table;

pub use symbol::{
    decode_morse, encode_text, keying, render_morse, CanonicalSymbol, LETTER_SEPARATOR,
    WORD_SEPARATOR,
};
pub use table::{entries, letter_to_morse, morse_to_letter, DASH, DOT};
