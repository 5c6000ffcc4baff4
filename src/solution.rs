//! Tour representation and move primitives.
//!
//! A tour is a permutation of `0..dimension`, implicitly cyclic: the edge
//! from the last element back to the first is part of its cost. Local search
//! mutates a tour's contents in place but never its length or element set.

use crate::distance::DistanceOracle;
use serde::{Deserialize, Serialize};

/// A tour together with its cyclic cost and provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    /// The tour as a sequence of 0-based node indices
    pub tour: Vec<usize>,
    /// Total cyclic tour cost
    pub cost: f64,
    /// Algorithm that generated this solution
    pub algorithm: String,
    /// Computation time in seconds
    pub computation_time: f64,
    /// Number of iterations (if applicable)
    pub iterations: Option<usize>,
}

/// Reverse the tour segment `tour[from..=to]` in place, leaving every
/// position outside the span untouched.
pub fn reverse_segment(tour: &mut [usize], from: usize, to: usize) {
    tour[from..=to].reverse();
}

impl Solution {
    /// Create a solution from a tour, evaluating its cost in full.
    pub fn from_tour(oracle: &DistanceOracle, tour: Vec<usize>, algorithm: &str) -> Self {
        let cost = oracle.tour_cost(&tour);
        Solution {
            tour,
            cost,
            algorithm: algorithm.to_string(),
            computation_time: 0.0,
            iterations: None,
        }
    }

    /// Recompute the cost from scratch, discarding incremental bookkeeping.
    pub fn validate(&mut self, oracle: &DistanceOracle) {
        self.cost = oracle.tour_cost(&self.tour);
    }

    /// Check that the tour visits every node in `0..dimension` exactly once.
    pub fn is_permutation(&self, dimension: usize) -> bool {
        if self.tour.len() != dimension {
            return false;
        }
        let mut seen = vec![false; dimension];
        for &node in &self.tour {
            if node >= dimension || seen[node] {
                return false;
            }
            seen[node] = true;
        }
        true
    }

    /// Cost change of the 2-opt move that removes edges `(t[i], t[i+1])` and
    /// `(t[j], t[j+1])` and reconnects as `(t[i], t[j])`, `(t[i+1], t[j+1])`.
    /// Indices wrap at the tour boundary for the closing edge.
    #[inline]
    pub fn two_opt_delta(&self, oracle: &DistanceOracle, i: usize, j: usize) -> f64 {
        let n = self.tour.len();
        let a = self.tour[i];
        let b = self.tour[(i + 1) % n];
        let c = self.tour[j];
        let d = self.tour[(j + 1) % n];

        -oracle.distance(a, b) - oracle.distance(c, d)
            + oracle.distance(a, c)
            + oracle.distance(b, d)
    }

    /// Cost change of exchanging the positions of `t[i]` and `t[j]`,
    /// accounting for the four edges incident to each position.
    ///
    /// Requires non-adjacent positions with `1 <= i < j` (`i >= 1` keeps the
    /// lower neighbor index from wrapping below zero).
    #[inline]
    pub fn swap_delta(&self, oracle: &DistanceOracle, i: usize, j: usize) -> f64 {
        let n = self.tour.len();
        let t = &self.tour;

        let removed = oracle.distance(t[i], t[(i + 1) % n])
            + oracle.distance(t[i], t[i - 1])
            + oracle.distance(t[j], t[(j + 1) % n])
            + oracle.distance(t[j], t[j - 1]);
        let added = oracle.distance(t[i], t[(j + 1) % n])
            + oracle.distance(t[i], t[j - 1])
            + oracle.distance(t[j], t[(i + 1) % n])
            + oracle.distance(t[j], t[i - 1]);

        added - removed
    }

    /// Apply a 2-opt move: reverse the segment strictly between the removed
    /// edges, i.e. `tour[i+1..=j]`.
    pub fn apply_two_opt(&mut self, i: usize, j: usize) {
        reverse_segment(&mut self.tour, i + 1, j);
    }

    /// Apply a position swap.
    pub fn apply_swap(&mut self, i: usize, j: usize) {
        self.tour.swap(i, j);
    }
}
