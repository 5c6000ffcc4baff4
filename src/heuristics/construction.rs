//! Greedy-randomized tour construction (the GRASP construction phase).

use crate::distance::DistanceOracle;
use crate::solution::Solution;
use ordered_float::OrderedFloat;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Trait for construction heuristics. The RNG is passed in explicitly so
/// trials can run on independent, deterministically seeded streams.
pub trait ConstructionHeuristic {
    fn construct(&self, oracle: &DistanceOracle, rng: &mut ChaCha8Rng) -> Solution;
    fn name(&self) -> &str;
}

/// GRASP restricted-candidate-list construction.
///
/// Starting from node 0, repeatedly picks the next node uniformly at random
/// among the unvisited nodes whose distance from the current node is within
/// `min + alpha * (max - min)` of the nearest one. `alpha = 0` is pure
/// greedy nearest neighbor (lowest index among ties); `alpha = 1` is pure
/// random construction over the whole unvisited set.
pub struct GreedyRandomizedConstruction {
    /// Greediness/randomness trade-off, in `[0, 1]`
    pub alpha: f64,
}

impl GreedyRandomizedConstruction {
    pub fn new(alpha: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&alpha),
            "alpha must be in [0, 1], got {}",
            alpha
        );
        GreedyRandomizedConstruction { alpha }
    }

    /// Build the restricted candidate list for one construction step: all
    /// unvisited nodes whose distance from `current` is at most
    /// `min + alpha * (max - min)`. Min and max range only over unvisited
    /// nodes; placed nodes are never reconsidered.
    fn restricted_candidates(
        &self,
        oracle: &DistanceOracle,
        current: usize,
        visited: &[bool],
    ) -> Vec<usize> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for node in 0..visited.len() {
            if !visited[node] {
                let d = oracle.distance(current, node);
                min = min.min(d);
                max = max.max(d);
            }
        }

        let cutoff = min + self.alpha * (max - min);

        (0..visited.len())
            .filter(|&node| !visited[node] && oracle.distance(current, node) <= cutoff)
            .collect()
    }
}

impl ConstructionHeuristic for GreedyRandomizedConstruction {
    fn construct(&self, oracle: &DistanceOracle, rng: &mut ChaCha8Rng) -> Solution {
        let start = std::time::Instant::now();
        let n = oracle.dimension();

        // Start at node 0 by convention.
        let mut tour = Vec::with_capacity(n);
        let mut visited = vec![false; n];
        tour.push(0);
        visited[0] = true;
        let mut current = 0usize;

        for _ in 1..n {
            let next = if self.alpha == 0.0 {
                // Pure greedy: nearest unvisited node, lowest index on ties.
                (0..n)
                    .filter(|&node| !visited[node])
                    .min_by_key(|&node| OrderedFloat(oracle.distance(current, node)))
            } else {
                let rcl = self.restricted_candidates(oracle, current, &visited);
                assert!(
                    !rcl.is_empty(),
                    "empty restricted candidate list with unvisited nodes remaining"
                );
                Some(rcl[rng.gen_range(0..rcl.len())])
            };

            // The iterator is nonempty as long as unvisited nodes remain.
            let next = match next {
                Some(node) => node,
                None => panic!("no unvisited node found before the tour was complete"),
            };

            tour.push(next);
            visited[next] = true;
            current = next;
        }

        let mut solution = Solution::from_tour(oracle, tour, self.name());
        solution.computation_time = start.elapsed().as_secs_f64();
        solution
    }

    fn name(&self) -> &str {
        "GreedyRandomized"
    }
}
