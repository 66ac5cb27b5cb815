//! Signal-to-text translation.
//!
//! A recorded contrast buffer goes through baseline removal, trimming and
//! run-length encoding; the run lengths are clustered into canonical
//! symbols and finally decoded through the Morse table.

mod encoder;
mod normalizer;
mod result;
mod translator;

pub use encoder::{apply_baseline, run_length_encode, trim};
pub use normalizer::{ArrayNormalizer, KMeansNormalizer, NormalizeError};
pub use result::{SubmitCode, TranslationResult};
pub use translator::{Translator, DEFAULT_SETTLE_DELAY};
