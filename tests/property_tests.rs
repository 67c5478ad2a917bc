mod common;

use proptest::prelude::*;

use common::points::brute_force;

use flatknn::{DenseMatrix, KnnIndex, RadiusResult};

/// `(dims, columns)` plus column-major values in [-100, 100].
fn matrix_strategy() -> impl Strategy<Value = DenseMatrix> {
    (1usize..6, 1usize..40).prop_flat_map(|(dims, n)| {
        prop::collection::vec(-100.0f64..100.0, dims * n)
            .prop_map(move |data| DenseMatrix::new(dims, n, data).unwrap())
    })
}

proptest! {
    #[test]
    fn prop_self_query_distance_is_zero(matrix in matrix_strategy(), pick in any::<prop::sample::Index>()) {
        let index = KnnIndex::from_matrix(&matrix).unwrap();
        let col = pick.index(matrix.cols());
        let query = matrix.column(col).to_vec();

        let mut indices = vec![0i64; 1];
        let mut distance2 = vec![0.0f32; 1];
        index.search_knn(&query, 1, &mut indices, &mut distance2).unwrap();

        prop_assert_eq!(distance2[0], 0.0);
        // Duplicate columns may win the tie; the winner must be an exact copy.
        let found = index.point(indices[0] as usize).unwrap();
        prop_assert_eq!(found, index.point(col).unwrap());
    }

    #[test]
    fn prop_knn_agrees_with_brute_force(matrix in matrix_strategy(), k in 0usize..50, seed in any::<u64>()) {
        let index = KnnIndex::from_matrix(&matrix).unwrap();
        let dims = matrix.rows();
        let query: Vec<f32> = (0..dims).map(|i| ((seed >> (i % 8)) % 200) as f32 - 100.0).collect();

        let effective = k.min(matrix.cols());
        let mut indices = vec![0i64; effective];
        let mut distance2 = vec![0.0f32; effective];
        let count = index.search_knn(&query, k, &mut indices, &mut distance2).unwrap();
        prop_assert_eq!(count, effective);

        let truth = brute_force(index.data(), dims, &query);
        let truth_idx: Vec<i64> = truth.iter().take(effective).map(|&(i, _)| i).collect();
        let truth_d2: Vec<f32> = truth.iter().take(effective).map(|&(_, d)| d).collect();
        prop_assert_eq!(indices, truth_idx);
        prop_assert_eq!(distance2, truth_d2);
    }

    #[test]
    fn prop_radius_agrees_with_brute_force(matrix in matrix_strategy(), radius in 0.0f32..150.0) {
        let index = KnnIndex::from_matrix(&matrix).unwrap();
        let dims = matrix.rows();
        let query = vec![0.0f32; dims];

        let mut result = RadiusResult::new();
        index.search_radius(&query, radius, &mut result).unwrap();

        let mut expected: Vec<i64> = brute_force(index.data(), dims, &query)
            .into_iter()
            .filter(|&(_, d2)| d2 <= radius * radius)
            .map(|(i, _)| i)
            .collect();
        expected.sort_unstable();
        let mut found = result.labels.clone();
        found.sort_unstable();
        prop_assert_eq!(found, expected);
    }

    #[test]
    fn prop_dimension_mismatch_always_fails(matrix in matrix_strategy(), extra in 1usize..4) {
        let index = KnnIndex::from_matrix(&matrix).unwrap();
        let query = vec![0.0f64; matrix.rows() + extra];
        let mut indices = vec![0i64; 1];
        let mut distance2 = vec![0.0f32; 1];
        prop_assert!(index.search_knn(&query, 1, &mut indices, &mut distance2).is_err());
    }
}
