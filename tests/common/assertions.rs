use flatknn::{FlatKnnError, Result};

/// Assert two float slices match element-wise within `tolerance`.
pub fn assert_close(actual: &[f32], expected: &[f32], tolerance: f32) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "length mismatch: got {actual:?}, expected {expected:?}"
    );
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!(
            (a - e).abs() <= tolerance,
            "element {i}: got {a}, expected {e} (tolerance {tolerance})"
        );
    }
}

/// Assert knn output matches ground truth, allowing any order among exact ties.
pub fn assert_knn_matches(indices: &[i64], distances: &[f32], truth: &[(i64, f32)]) {
    assert_eq!(indices.len(), distances.len());
    for (slot, (&idx, &d2)) in indices.iter().zip(distances).enumerate() {
        let (truth_idx, truth_d2) = truth[slot];
        assert!(
            (d2 - truth_d2).abs() <= 1e-5,
            "slot {slot}: distance {d2}, expected {truth_d2}"
        );
        if idx != truth_idx {
            let tied = truth.iter().any(|&(i, d)| i == idx && d == truth_d2);
            assert!(
                tied,
                "slot {slot}: index {idx}, expected {truth_idx} (no exact tie)"
            );
        }
    }
}

pub fn assert_not_built<T: std::fmt::Debug>(result: &Result<T>) {
    match result {
        Err(FlatKnnError::NotBuilt) => {}
        other => panic!("expected NotBuilt error, got: {other:?}"),
    }
}

pub fn assert_dimension_mismatch<T: std::fmt::Debug>(
    result: &Result<T>,
    expected: usize,
    actual: usize,
) {
    match result {
        Err(FlatKnnError::DimensionMismatch {
            expected: e,
            actual: a,
        }) => {
            assert_eq!(*e, expected);
            assert_eq!(*a, actual);
        }
        other => panic!("expected DimensionMismatch, got: {other:?}"),
    }
}
