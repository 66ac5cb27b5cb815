//! Baseline removal, trimming and run-length encoding of contrast buffers.

/// Subtracts `baseline` from every sample, clamping at zero.
///
/// Returns `None` when nothing is left above the baseline.
pub fn apply_baseline(frames: &[u8], baseline: u8) -> Option<Vec<u8>> {
    let thresholded: Vec<u8> = frames.iter().map(|&v| v.saturating_sub(baseline)).collect();
    thresholded.iter().any(|&v| v != 0).then_some(thresholded)
}

/// Drops leading and trailing zero runs.
pub fn trim(frames: &[u8]) -> &[u8] {
    let start = match frames.iter().position(|&v| v != 0) {
        Some(i) => i,
        None => return &[],
    };
    // A non-zero sample exists, so rposition always finds one.
    let end = frames.iter().rposition(|&v| v != 0).unwrap_or(start);
    &frames[start..=end]
}

/// Collapses a buffer into signed run lengths.
///
/// Non-zero runs become positive tokens, zero runs negative tokens, so
/// consecutive tokens always alternate in sign.
pub fn run_length_encode(frames: &[u8]) -> Vec<i32> {
    let mut tokens = Vec::new();
    let mut iter = frames.iter().map(|&v| v != 0);
    let Some(mut current) = iter.next() else {
        return tokens;
    };
    let mut length: i32 = 1;

    for mark in iter {
        if mark == current {
            length += 1;
        } else {
            tokens.push(if current { length } else { -length });
            current = mark;
            length = 1;
        }
    }
    tokens.push(if current { length } else { -length });
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_baseline_clamps() {
        let out = apply_baseline(&[0, 5, 50, 10], 10).unwrap();
        assert_eq!(out, vec![0, 0, 40, 0]);
    }

    #[test]
    fn test_baseline_removes_everything() {
        assert!(apply_baseline(&[3, 9, 10, 0], 10).is_none());
        assert!(apply_baseline(&[], 0).is_none());
        assert!(apply_baseline(&[0, 0, 0], 0).is_none());
    }

    #[test]
    fn test_trim() {
        assert_eq!(trim(&[0, 0, 4, 0, 5, 0]), &[4, 0, 5]);
        assert_eq!(trim(&[7]), &[7]);
        assert!(trim(&[0, 0]).is_empty());
    }

    #[test]
    fn test_encode_alternates() {
        assert_eq!(run_length_encode(&[1, 1, 1, 0, 0, 2, 0, 3, 3]), vec![3, -2, 1, -1, 2]);
        assert_eq!(run_length_encode(&[0, 0, 5]), vec![-2, 1]);
        assert!(run_length_encode(&[]).is_empty());
    }

    #[test]
    fn test_example_buffer() {
        let frames = [0, 0, 50, 50, 50, 0, 0, 0, 0, 0, 0, 60, 60, 0, 0];
        let thresholded = apply_baseline(&frames, 10).unwrap();
        assert_eq!(thresholded, vec![0, 0, 40, 40, 40, 0, 0, 0, 0, 0, 0, 50, 50, 0, 0]);
        assert_eq!(run_length_encode(trim(&thresholded)), vec![3, -6, 2]);
    }

    proptest! {
        #[test]
        fn prop_trim_idempotent(
            frames in prop::collection::vec(prop_oneof![Just(0u8), 1u8..=255], 0..200),
        ) {
            let once = trim(&frames);
            prop_assert_eq!(trim(once), once);
        }

        #[test]
        fn prop_tokens_alternate_and_cover(
            frames in prop::collection::vec(prop_oneof![Just(0u8), 1u8..=255], 1..200),
        ) {
            let tokens = run_length_encode(&frames);
            for pair in tokens.windows(2) {
                prop_assert!(pair[0].signum() != pair[1].signum());
            }
            let covered: i32 = tokens.iter().map(|t| t.abs()).sum();
            prop_assert_eq!(covered as usize, frames.len());
        }

        #[test]
        fn prop_below_baseline_is_silent(frames in prop::collection::vec(0u8..=40, 0..200)) {
            prop_assert!(apply_baseline(&frames, 40).is_none());
        }
    }
}
