//! Translation output.

use crate::morse::CanonicalSymbol;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Identifies one translation request.
///
/// Codes only ever move forward; a result is current when its code equals
/// the latest issued code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SubmitCode(pub u64);

impl fmt::Display for SubmitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Outcome of translating one recording.
///
/// An unsuccessful result carries no payload; it means the capture held
/// no usable signal, not that something went wrong.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslationResult {
    submit_code: SubmitCode,
    baseline: u8,
    success: bool,
    symbols: Option<Vec<CanonicalSymbol>>,
    morse: Option<String>,
    text: Option<String>,
    completed_at: DateTime<Utc>,
}

impl TranslationResult {
    /// A result with no decoded payload.
    pub fn unsuccessful(submit_code: SubmitCode, baseline: u8) -> Self {
        Self {
            submit_code,
            baseline,
            success: false,
            symbols: None,
            morse: None,
            text: None,
            completed_at: Utc::now(),
        }
    }

    /// A decoded result.
    pub fn successful(
        submit_code: SubmitCode,
        baseline: u8,
        symbols: Vec<CanonicalSymbol>,
        morse: String,
        text: String,
    ) -> Self {
        Self {
            submit_code,
            baseline,
            success: true,
            symbols: Some(symbols),
            morse: Some(morse),
            text: Some(text),
            completed_at: Utc::now(),
        }
    }

    #[inline]
    pub fn submit_code(&self) -> SubmitCode {
        self.submit_code
    }

    #[inline]
    pub fn baseline(&self) -> u8 {
        self.baseline
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn symbols(&self) -> Option<&[CanonicalSymbol]> {
        self.symbols.as_deref()
    }

    pub fn morse(&self) -> Option<&str> {
        self.morse.as_deref()
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }
}

impl fmt::Display for TranslationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.success {
            write!(
                f,
                "{} baseline={} morse=\"{}\" text=\"{}\"",
                self.submit_code,
                self.baseline,
                self.morse.as_deref().unwrap_or_default(),
                self.text.as_deref().unwrap_or_default()
            )
        } else {
            write!(f, "{} baseline={} no signal", self.submit_code, self.baseline)
        }
    }
}
