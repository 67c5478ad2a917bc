use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use flatknn::{DenseMatrix, PointCloud};

/// Generate `n` points uniformly distributed in `[min, max]^3`.
pub fn random_points(n: usize, min: f64, max: f64, seed: u64) -> Vec<[f64; 3]> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            [
                rng.gen_range(min..max),
                rng.gen_range(min..max),
                rng.gen_range(min..max),
            ]
        })
        .collect()
}

/// Point cloud of 100 points in the `[0, 10]^3` cube.
pub fn unit_test_cloud() -> PointCloud {
    PointCloud::new(random_points(100, 0.0, 10.0, 0))
}

/// `dims x n` matrix with uniform values in [-1, 1].
pub fn random_matrix(dims: usize, n: usize, seed: u64) -> DenseMatrix {
    let mut rng = StdRng::seed_from_u64(seed);
    let data = (0..dims * n).map(|_| rng.gen_range(-1.0..1.0)).collect();
    DenseMatrix::new(dims, n, data).unwrap()
}

/// Brute-force ground truth: every point as `(index, squared distance)`,
/// sorted by distance then index, computed in f32 like the index.
pub fn brute_force(points: &[f32], dims: usize, query: &[f32]) -> Vec<(i64, f32)> {
    let mut all: Vec<(i64, f32)> = points
        .chunks_exact(dims)
        .enumerate()
        .map(|(i, p)| {
            let d2 = p
                .iter()
                .zip(query)
                .map(|(a, b)| (a - b) * (a - b))
                .sum::<f32>();
            (i as i64, d2)
        })
        .collect();
    all.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
    all
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_points_deterministic() {
        let a = random_points(10, 0.0, 1.0, 7);
        let b = random_points(10, 0.0, 1.0, 7);
        assert_eq!(a, b);
        assert!(a.iter().flatten().all(|&v| (0.0..1.0).contains(&v)));
    }

    #[test]
    fn test_brute_force_sorted() {
        let points = [3.0f32, 0.0, 1.0, 0.0];
        let truth = brute_force(&points, 2, &[0.0, 0.0]);
        assert_eq!(truth, vec![(1, 1.0), (0, 9.0)]);
    }
}
