//! Distance evaluation layer.
//!
//! Two interchangeable strategies behind one type: a precomputed symmetric
//! `n x n` matrix (amortizes repeated lookups, O(n^2) memory) and on-demand
//! Euclidean evaluation from the point pair (O(1) memory, preferred for
//! large instances). Callers must not depend on which one is active.

use crate::instance::{Point, TspInstance};

/// Default instance size above which the full matrix is no longer
/// precomputed (a 20k-node matrix is already 3.2 GB of f64).
pub const DEFAULT_MATRIX_THRESHOLD: usize = 20_000;

/// Pairwise Euclidean distance oracle for one instance.
///
/// `distance(i, j)` is nonnegative, symmetric and zero iff `i == j`,
/// for any `i, j` in `0..dimension`.
pub enum DistanceOracle {
    /// Full precomputed matrix, row-major `dimension * dimension`.
    Matrix {
        dimension: usize,
        matrix: Vec<f64>,
    },
    /// Distances computed from the coordinates on every call.
    OnDemand { points: Vec<Point> },
}

impl DistanceOracle {
    /// Precompute the full distance matrix.
    ///
    /// Fills `m[i][j]` and `m[j][i]` in one pass with the inner index
    /// starting at `i`, halving the work. `progress` is called once per
    /// completed outer row with the fraction of rows done; rendering that
    /// progress is the caller's concern.
    pub fn precomputed<F>(instance: &TspInstance, mut progress: F) -> Self
    where
        F: FnMut(f64),
    {
        let n = instance.dimension;
        let mut matrix = vec![0.0; n * n];

        for i in 0..n {
            for j in i..n {
                let d = instance.points[i].distance_to(&instance.points[j]);
                matrix[i * n + j] = d;
                matrix[j * n + i] = d;
            }
            progress((i + 1) as f64 / n as f64);
        }

        DistanceOracle::Matrix {
            dimension: n,
            matrix,
        }
    }

    /// On-demand oracle; keeps its own copy of the coordinates.
    pub fn on_demand(instance: &TspInstance) -> Self {
        DistanceOracle::OnDemand {
            points: instance.points.clone(),
        }
    }

    /// Pick a strategy for the instance size: matrix up to `threshold`
    /// nodes, on-demand beyond that.
    pub fn for_instance<F>(instance: &TspInstance, threshold: usize, progress: F) -> Self
    where
        F: FnMut(f64),
    {
        if instance.dimension <= threshold {
            Self::precomputed(instance, progress)
        } else {
            Self::on_demand(instance)
        }
    }

    /// Number of nodes this oracle covers.
    pub fn dimension(&self) -> usize {
        match self {
            DistanceOracle::Matrix { dimension, .. } => *dimension,
            DistanceOracle::OnDemand { points } => points.len(),
        }
    }

    /// Distance between nodes `i` and `j`.
    #[inline]
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        match self {
            DistanceOracle::Matrix { dimension, matrix } => matrix[i * dimension + j],
            DistanceOracle::OnDemand { points } => points[i].distance_to(&points[j]),
        }
    }

    /// Total cyclic cost of a tour: the sum of all consecutive edges plus
    /// the closing edge from the last node back to the first. O(n).
    ///
    /// This full summation is the ground truth against which incremental
    /// delta bookkeeping in the local searches is validated.
    pub fn tour_cost(&self, tour: &[usize]) -> f64 {
        if tour.len() < 2 {
            return 0.0;
        }

        let mut cost = 0.0;
        for k in 0..tour.len() - 1 {
            cost += self.distance(tour[k], tour[k + 1]);
        }
        cost += self.distance(tour[tour.len() - 1], tour[0]);

        cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::Point;

    fn unit_square() -> TspInstance {
        TspInstance::from_points(
            "square",
            vec![
                Point::new(0.0, 0.0, 0.0),
                Point::new(1.0, 0.0, 0.0),
                Point::new(1.0, 1.0, 0.0),
                Point::new(0.0, 1.0, 0.0),
            ],
        )
    }

    #[test]
    fn test_matrix_symmetry_and_zero_diagonal() {
        let instance = unit_square();
        let oracle = DistanceOracle::precomputed(&instance, |_| {});

        for i in 0..4 {
            assert_eq!(oracle.distance(i, i), 0.0);
            for j in 0..4 {
                assert_eq!(oracle.distance(i, j), oracle.distance(j, i));
                assert!(oracle.distance(i, j) >= 0.0);
            }
        }
    }

    #[test]
    fn test_strategies_are_interchangeable() {
        let instance = unit_square();
        let matrix = DistanceOracle::precomputed(&instance, |_| {});
        let on_demand = DistanceOracle::on_demand(&instance);

        for i in 0..4 {
            for j in 0..4 {
                let a = matrix.distance(i, j);
                let b = on_demand.distance(i, j);
                assert!((a - b).abs() <= 1e-4 * b.max(1.0));
            }
        }

        let tour = vec![0, 2, 1, 3];
        let a = matrix.tour_cost(&tour);
        let b = on_demand.tour_cost(&tour);
        assert!((a - b).abs() <= 1e-4 * b);
    }

    #[test]
    fn test_for_instance_respects_threshold() {
        let instance = unit_square();

        let small = DistanceOracle::for_instance(&instance, 10, |_| {});
        assert!(matches!(small, DistanceOracle::Matrix { .. }));

        let large = DistanceOracle::for_instance(&instance, 3, |_| {});
        assert!(matches!(large, DistanceOracle::OnDemand { .. }));

        assert_eq!(small.dimension(), large.dimension());
    }

    #[test]
    fn test_progress_reaches_one() {
        let instance = unit_square();
        let mut last = 0.0;
        let _ = DistanceOracle::precomputed(&instance, |f| last = f);
        assert_eq!(last, 1.0);
    }

    #[test]
    fn test_tour_cost_square() {
        let instance = unit_square();
        let oracle = DistanceOracle::precomputed(&instance, |_| {});
        assert!((oracle.tour_cost(&[0, 1, 2, 3]) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_node_tour_costs_zero() {
        let instance = TspInstance::from_points("one", vec![Point::new(5.0, 5.0, 5.0)]);
        let oracle = DistanceOracle::on_demand(&instance);
        assert_eq!(oracle.tour_cost(&[0]), 0.0);
    }
}
