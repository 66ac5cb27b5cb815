//! Maps raw run lengths onto the five canonical Morse symbols.

use crate::clustering::KMeans;
use crate::morse::CanonicalSymbol;
use thiserror::Error;

/// Errors raised while normalizing a token sequence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("run lengths must contain both marks and gaps and no zeros (marks: {marks}, gaps: {gaps}, zeros: {zeros})")]
    InvalidInput {
        marks: usize,
        gaps: usize,
        zeros: usize,
    },
}

/// Converts run-length tokens into canonical symbols.
pub trait ArrayNormalizer: Send {
    /// Normalizes a signed run-length sequence.
    fn normalize(&mut self, tokens: &[i32]) -> Result<Vec<CanonicalSymbol>, NormalizeError>;

    /// Clears any state carried between calls.
    fn reset(&mut self) {}
}

/// Normalizer that seeds five sign-constrained clusters from the extremes
/// of the input and maps them to symbols by rank.
#[derive(Debug, Clone, Default)]
pub struct KMeansNormalizer {
    kmeans: KMeans,
}

impl KMeansNormalizer {
    pub fn new(kmeans: KMeans) -> Self {
        Self { kmeans }
    }

    /// Seeds in order: 1-unit mark, 3-unit mark, 1-unit gap, 3-unit gap,
    /// 7-unit gap.
    fn seeds(tokens: &[i32]) -> Result<[i32; 5], NormalizeError> {
        let marks = tokens.iter().copied().filter(|&t| t > 0);
        let gaps = tokens.iter().copied().filter(|&t| t < 0);

        let (min_mark, max_mark) = min_max(marks);
        let (min_gap, max_gap) = min_max(gaps);
        let zeros = tokens.iter().filter(|&&t| t == 0).count();

        match (min_mark.zip(max_mark), min_gap.zip(max_gap), zeros) {
            (Some((one_mark, three_mark)), Some((seven_gap, one_gap)), 0) => {
                let three_gap = (one_gap + seven_gap) / 2;
                Ok([one_mark, three_mark, one_gap, three_gap, seven_gap])
            }
            _ => Err(NormalizeError::InvalidInput {
                marks: tokens.iter().filter(|&&t| t > 0).count(),
                gaps: tokens.iter().filter(|&&t| t < 0).count(),
                zeros,
            }),
        }
    }
}

impl ArrayNormalizer for KMeansNormalizer {
    fn normalize(&mut self, tokens: &[i32]) -> Result<Vec<CanonicalSymbol>, NormalizeError> {
        tracing::debug!(?tokens, "normalizing run lengths");

        let seeds = Self::seeds(tokens)?;
        let clustering = self.kmeans.fit(&seeds, tokens);

        let mut centers: Vec<i32> = clustering.centroids.iter().map(|c| c.value()).collect();
        centers.sort_unstable();

        // Rank decides the symbol; on duplicate centers the lower rank wins.
        let mut table: Vec<(i32, CanonicalSymbol)> = Vec::with_capacity(centers.len());
        for (center, symbol) in centers.into_iter().zip(CanonicalSymbol::ALL) {
            if !table.iter().any(|(c, _)| *c == center) {
                table.push((center, symbol));
            }
        }

        let normalized: Vec<CanonicalSymbol> = clustering
            .elements
            .iter()
            .map(|element| {
                element
                    .center()
                    .and_then(|center| table.iter().find(|(c, _)| *c == center))
                    .map(|(_, symbol)| *symbol)
                    .unwrap_or(if element.value() >= 0 {
                        CanonicalSymbol::Dot
                    } else {
                        CanonicalSymbol::SymbolGap
                    })
            })
            .collect();

        tracing::debug!(
            table = ?table,
            symbols = normalized.len(),
            "normalized run lengths"
        );
        Ok(normalized)
    }
}

fn min_max(values: impl Iterator<Item = i32>) -> (Option<i32>, Option<i32>) {
    values.fold((None, None), |(min, max), v| {
        (
            Some(min.map_or(v, |m: i32| m.min(v))),
            Some(max.map_or(v, |m: i32| m.max(v))),
        )
    })
}
