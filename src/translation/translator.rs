//! Turns a recorded contrast buffer into Morse and text.

use super::encoder::{apply_baseline, run_length_encode, trim};
use super::normalizer::{ArrayNormalizer, KMeansNormalizer};
use super::result::{SubmitCode, TranslationResult};
use crate::morse::{decode_morse, render_morse};
use std::time::Duration;

/// Default grace period before a translation produces output.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(4000);

/// Blocking translator for complete recordings.
///
/// [`Translator::resolve`] sleeps for the settle delay, so it must only
/// be called from a background worker.
pub struct Translator {
    normalizer: Box<dyn ArrayNormalizer>,
    settle_delay: Duration,
}

impl Translator {
    /// Creates a translator around the given normalizer.
    pub fn new(normalizer: Box<dyn ArrayNormalizer>, settle_delay: Duration) -> Self {
        Self {
            normalizer,
            settle_delay,
        }
    }

    /// Translator with the k-means normalizer and no settle delay.
    pub fn immediate() -> Self {
        Self::new(Box::<KMeansNormalizer>::default(), Duration::ZERO)
    }

    /// Returns the configured settle delay.
    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    /// Translates one recording.
    ///
    /// Never fails: captures without usable signal, and captures the
    /// normalizer rejects, come back as unsuccessful results.
    pub fn resolve(
        &mut self,
        submit_code: SubmitCode,
        frames: &[u8],
        baseline: u8,
    ) -> TranslationResult {
        let Some(thresholded) = apply_baseline(frames, baseline) else {
            tracing::debug!(%submit_code, baseline, "no signal above baseline");
            return TranslationResult::unsuccessful(submit_code, baseline);
        };

        if !self.settle_delay.is_zero() {
            std::thread::sleep(self.settle_delay);
        }

        let trimmed = trim(&thresholded);
        let tokens = run_length_encode(trimmed);
        tracing::trace!(%submit_code, trimmed = trimmed.len(), ?tokens, "run-length encoded");

        if tokens.len() < 2 {
            tracing::debug!(%submit_code, tokens = tokens.len(), "not enough runs to classify");
            return TranslationResult::unsuccessful(submit_code, baseline);
        }

        self.normalizer.reset();
        let symbols = match self.normalizer.normalize(&tokens) {
            Ok(symbols) => symbols,
            Err(e) => {
                tracing::warn!(%submit_code, error = %e, "normalization failed");
                return TranslationResult::unsuccessful(submit_code, baseline);
            }
        };

        let morse = render_morse(&symbols);
        let text = decode_morse(&morse);

        tracing::info!(
            %submit_code,
            baseline,
            morse = %morse,
            text = %text,
            "translation finished"
        );
        TranslationResult::successful(submit_code, baseline, symbols, morse, text)
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::new(Box::<KMeansNormalizer>::default(), DEFAULT_SETTLE_DELAY)
    }
}

impl std::fmt::Debug for Translator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Translator")
            .field("settle_delay", &self.settle_delay)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::morse::CanonicalSymbol;
    use crate::morse::{encode_text, keying, CanonicalSymbol::*};
    use crate::translation::NormalizeError;
    use proptest::prelude::*;

    const CODE: SubmitCode = SubmitCode(1);

    fn contrast_for(text: &str, unit: usize, padding: usize) -> Vec<u8> {
        let mut frames = vec![0u8; padding];
        frames.extend(
            keying(&encode_text(text), unit)
                .into_iter()
                .map(|on| if on { 120 } else { 4 }),
        );
        frames.extend(std::iter::repeat(3).take(padding));
        frames
    }

    #[test]
    fn test_empty_buffer_unsuccessful() {
        let result = Translator::immediate().resolve(CODE, &[], 0);
        assert!(!result.is_success());
        assert!(result.morse().is_none());
        assert!(result.text().is_none());
    }

    #[test]
    fn test_example_buffer() {
        let frames = [0, 0, 50, 50, 50, 0, 0, 0, 0, 0, 0, 60, 60, 0, 0];
        let result = Translator::immediate().resolve(CODE, &frames, 10);
        assert!(result.is_success());
        assert_eq!(result.symbols(), Some(&[Dash, WordGap, Dot][..]));
        assert_eq!(result.morse(), Some("- / ."));
        assert_eq!(result.text(), Some("T E"));
        assert_eq!(result.baseline(), 10);
        assert_eq!(result.submit_code(), CODE);
    }

    #[test]
    fn test_single_run_unsuccessful() {
        let result = Translator::immediate().resolve(CODE, &[0, 9, 9, 9, 0], 0);
        assert!(!result.is_success());
        assert!(result.symbols().is_none());
    }

    #[test]
    fn test_decodes_message() {
        let frames = contrast_for("SOS SOS", 4, 30);
        let result = Translator::immediate().resolve(CODE, &frames, 10);
        assert!(result.is_success());
        assert_eq!(result.text(), Some("SOS SOS"));
        assert_eq!(result.morse(), Some("... --- ... / ... --- ..."));
    }

    #[test]
    fn test_low_baseline_keeps_noise_floor() {
        // Baseline below the gap level: the whole buffer is one mark.
        let frames = contrast_for("SOS SOS", 4, 30);
        let result = Translator::immediate().resolve(CODE, &frames, 2);
        assert!(!result.is_success());
    }

    struct Rejecting;

    impl ArrayNormalizer for Rejecting {
        fn normalize(&mut self, _tokens: &[i32]) -> Result<Vec<CanonicalSymbol>, NormalizeError> {
            Err(NormalizeError::InvalidInput {
                marks: 0,
                gaps: 0,
                zeros: 0,
            })
        }
    }

    #[test]
    fn test_normalizer_error_becomes_unsuccessful() {
        let mut translator = Translator::new(Box::new(Rejecting), Duration::ZERO);
        let result = translator.resolve(CODE, &[5, 0, 5], 0);
        assert!(!result.is_success());
    }

    proptest! {
        #[test]
        fn prop_below_baseline_unsuccessful(
            frames in prop::collection::vec(0u8..=30, 0..300),
            extra in 0u8..50,
        ) {
            let baseline = 30 + extra;
            let result = Translator::immediate().resolve(CODE, &frames, baseline);
            prop_assert!(!result.is_success());
            prop_assert!(result.morse().is_none());
            prop_assert!(result.text().is_none());
        }
    }
}
