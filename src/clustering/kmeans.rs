//! Sign-constrained one-dimensional k-means.
//!
//! Elements are only ever grouped with centroids of the same sign, so
//! mark lengths (positive) and gap lengths (negative) never mix.

/// Default number of clustering rounds.
pub const DEFAULT_ITERATIONS: usize = 100;

/// A cluster center and the elements currently assigned to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Centroid {
    value: i32,
    /// Indices into the element list.
    members: Vec<usize>,
}

impl Centroid {
    /// Creates a centroid seeded at `value`.
    pub fn new(value: i32) -> Self {
        Self {
            value,
            members: Vec::new(),
        }
    }

    /// Current center value.
    #[inline]
    pub fn value(&self) -> i32 {
        self.value
    }

    /// Indices of the elements assigned in the last round.
    #[inline]
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    /// Truncating integer mean of the members; unchanged when empty.
    fn mean(&self, elements: &[Element]) -> i32 {
        if self.members.is_empty() {
            return self.value;
        }
        let sum: i64 = self.members.iter().map(|&i| elements[i].value as i64).sum();
        (sum / self.members.len() as i64) as i32
    }
}

/// One clustered value plus the center it was last assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Element {
    value: i32,
    center: Option<i32>,
}

impl Element {
    /// Wraps an unassigned value.
    pub fn new(value: i32) -> Self {
        Self {
            value,
            center: None,
        }
    }

    /// The clustered value.
    #[inline]
    pub fn value(&self) -> i32 {
        self.value
    }

    /// Center value from the last round, `None` if no centroid of the
    /// same sign existed.
    #[inline]
    pub fn center(&self) -> Option<i32> {
        self.center
    }
}

/// Final state of a clustering run.
#[derive(Debug, Clone)]
pub struct Clustering {
    /// Centroids in seed order.
    pub centroids: Vec<Centroid>,
    /// Elements in input order.
    pub elements: Vec<Element>,
}

/// Fixed-iteration k-means runner.
#[derive(Debug, Clone, Copy)]
pub struct KMeans {
    iterations: usize,
}

impl KMeans {
    /// Creates a runner that always performs `iterations` rounds.
    pub fn new(iterations: usize) -> Self {
        Self { iterations }
    }

    /// Number of rounds performed by [`KMeans::fit`].
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Clusters `values` starting from `seeds`.
    ///
    /// There is no convergence check: every run performs the configured
    /// number of rounds.
    pub fn fit(&self, seeds: &[i32], values: &[i32]) -> Clustering {
        let mut centroids: Vec<Centroid> = seeds.iter().copied().map(Centroid::new).collect();
        let mut elements: Vec<Element> = values.iter().copied().map(Element::new).collect();

        for iteration in 0..self.iterations {
            for centroid in centroids.iter_mut() {
                centroid.members.clear();
            }

            for (index, element) in elements.iter_mut().enumerate() {
                element.center = nearest_same_sign(&centroids, element.value).map(|c| {
                    centroids[c].members.push(index);
                    centroids[c].value
                });
            }

            for centroid in centroids.iter_mut() {
                centroid.value = centroid.mean(&elements);
            }

            tracing::trace!(
                iteration,
                centers = ?centroids.iter().map(Centroid::value).collect::<Vec<_>>(),
                "k-means round finished"
            );
        }

        Clustering {
            centroids,
            elements,
        }
    }
}

impl Default for KMeans {
    fn default() -> Self {
        Self::new(DEFAULT_ITERATIONS)
    }
}

/// Index of the closest centroid sharing the sign of `value`.
///
/// Ties go to the earliest centroid. Zero has no sign and is never
/// assigned.
fn nearest_same_sign(centroids: &[Centroid], value: i32) -> Option<usize> {
    if value == 0 {
        return None;
    }
    let mut best: Option<(usize, i64)> = None;
    for (i, centroid) in centroids.iter().enumerate() {
        if centroid.value.signum() != value.signum() {
            continue;
        }
        let distance = (value as i64 - centroid.value as i64).abs();
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((i, distance));
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_separates_two_groups() {
        let result = KMeans::default().fit(&[1, 10], &[2, 3, 4, 11, 12, 13]);
        assert_eq!(result.centroids[0].value(), 3);
        assert_eq!(result.centroids[1].value(), 12);
        assert_eq!(result.centroids[0].members(), &[0, 1, 2]);
    }

    #[test]
    fn test_sign_blocks_closer_centroid() {
        // -1 is closer to +1 than to -50, but signs must match.
        let result = KMeans::new(1).fit(&[1, -50], &[-1, 2]);
        assert_eq!(result.elements[0].center(), Some(-50));
        assert_eq!(result.centroids[1].value(), -1);
    }

    #[test]
    fn test_unassigned_without_matching_sign() {
        let result = KMeans::default().fit(&[5], &[-3, 4]);
        assert_eq!(result.elements[0].center(), None);
        assert_eq!(result.elements[1].center(), Some(4));
        assert_eq!(result.centroids[0].value(), 4);
    }

    #[test]
    fn test_center_recorded_before_mean_update() {
        let result = KMeans::new(1).fit(&[5], &[-3, 4]);
        assert_eq!(result.elements[0].center(), None);
        assert_eq!(result.elements[1].center(), Some(5));
        assert_eq!(result.centroids[0].value(), 4);
    }

    #[test]
    fn test_empty_centroid_keeps_value() {
        let result = KMeans::default().fit(&[1, 100], &[1, 2]);
        assert_eq!(result.centroids[1].value(), 100);
        assert!(result.centroids[1].members().is_empty());
    }

    #[test]
    fn test_tie_goes_to_first_centroid() {
        let result = KMeans::new(1).fit(&[2, 4], &[3]);
        assert_eq!(result.elements[0].center(), Some(2));
    }

    #[test]
    fn test_truncating_mean() {
        let result = KMeans::new(1).fit(&[-1], &[-2, -3]);
        // -5 / 2 truncates toward zero
        assert_eq!(result.centroids[0].value(), -2);
    }

    #[test]
    fn test_zero_iterations_leaves_seeds() {
        let result = KMeans::new(0).fit(&[7], &[1, 2]);
        assert_eq!(result.centroids[0].value(), 7);
        assert_eq!(result.elements[0].center(), None);
    }

    proptest! {
        #[test]
        fn prop_assignment_preserves_sign(
            values in prop::collection::vec(
                (1i32..500).prop_flat_map(|v| prop_oneof![Just(v), Just(-v)]),
                1..60,
            ),
            pos_seeds in prop::collection::vec(1i32..500, 1..4),
            neg_seeds in prop::collection::vec(-500i32..0, 1..4),
            iterations in 1usize..20,
        ) {
            let seeds: Vec<i32> = pos_seeds.into_iter().chain(neg_seeds).collect();
            let result = KMeans::new(iterations).fit(&seeds, &values);
            for element in &result.elements {
                let center = element.center().expect("both signs seeded");
                prop_assert_eq!(center.signum(), element.value().signum());
            }
            for centroid in &result.centroids {
                for &m in centroid.members() {
                    prop_assert_eq!(result.elements[m].value().signum(), centroid.value().signum());
                }
            }
        }
    }
}
