//! Unsupervised clustering of run lengths.
//!
//! Adapts to unknown signalling speed by grouping observed run lengths
//! rather than assuming a fixed unit duration.

mod kmeans;

pub use kmeans::{Centroid, Clustering, Element, KMeans, DEFAULT_ITERATIONS};
