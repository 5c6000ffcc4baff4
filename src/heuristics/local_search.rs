//! Local search improvement for cyclic tours.
//!
//! This module implements the 2-opt family of neighborhood searches:
//! - edge-reversal 2-opt (first and best improvement)
//! - node swap
//! - perturbation/shake around first-improvement 2-opt
//! - a temperature-gated acceptance variant
//!
//! All variants mutate the tour in place, keep the cost up to date through
//! incremental deltas, and stop at a local optimum: a state from which no
//! single move in the variant's neighborhood improves cost by more than a
//! small tolerance. A zero-tolerance comparison would let floating-point
//! noise oscillate forever.

use crate::distance::DistanceOracle;
use crate::solution::Solution;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Default improvement tolerance shared by the 2-opt variants.
pub const DEFAULT_EPSILON: f64 = 1e-5;

/// Trait for local search improvement methods.
///
/// `improve` runs the variant to a local optimum and returns whether the
/// cost decreased beyond tolerance. Deterministic variants ignore the RNG;
/// it is threaded through so stochastic variants stay reproducible per
/// trial.
pub trait LocalSearch {
    fn improve(
        &self,
        oracle: &DistanceOracle,
        solution: &mut Solution,
        rng: &mut ChaCha8Rng,
    ) -> bool;
    fn name(&self) -> &str;
}

/// The closed set of local-search variants selectable at configuration time.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum SearchVariant {
    TwoOptFirst,
    TwoOptBest,
    NodeSwap,
    Shake,
    TemperatureGated,
}

impl SearchVariant {
    /// Instantiate the variant with its default parameters.
    pub fn build(&self) -> Box<dyn LocalSearch + Send + Sync> {
        match self {
            SearchVariant::TwoOptFirst => Box::new(TwoOptSearch::first_improvement()),
            SearchVariant::TwoOptBest => Box::new(TwoOptSearch::best_improvement()),
            SearchVariant::NodeSwap => Box::new(NodeSwapSearch::new()),
            SearchVariant::Shake => Box::new(ShakingSearch::new()),
            SearchVariant::TemperatureGated => Box::new(TemperatureGatedSearch::new()),
        }
    }
}

// ==================== Edge-reversal 2-opt ====================

/// Edge-reversal 2-opt.
///
/// The neighborhood removes two tour edges `(t[i], t[i+1])` and
/// `(t[j], t[j+1])` and reconnects as `(t[i], t[j])`, `(t[i+1], t[j+1])`,
/// which reverses the segment strictly between the removed edges.
pub struct TwoOptSearch {
    /// Use first improvement instead of best improvement
    pub first_improvement: bool,
    /// Improvement tolerance
    pub epsilon: f64,
}

impl TwoOptSearch {
    pub fn first_improvement() -> Self {
        TwoOptSearch {
            first_improvement: true,
            epsilon: DEFAULT_EPSILON,
        }
    }

    pub fn best_improvement() -> Self {
        TwoOptSearch {
            first_improvement: false,
            epsilon: DEFAULT_EPSILON,
        }
    }

    fn improve_first(&self, oracle: &DistanceOracle, solution: &mut Solution) -> bool {
        let n = solution.tour.len();
        let mut total_improved = false;

        // Apply the first improving pair found, then restart the scan from
        // the top; a full pass without improvement is the local optimum.
        'pass: loop {
            for i in 0..n - 1 {
                for j in i + 1..n {
                    let delta = solution.two_opt_delta(oracle, i, j);
                    if delta < -self.epsilon {
                        solution.apply_two_opt(i, j);
                        solution.cost += delta;
                        total_improved = true;
                        continue 'pass;
                    }
                }
            }
            break;
        }

        total_improved
    }

    fn improve_best(&self, oracle: &DistanceOracle, solution: &mut Solution) -> bool {
        let n = solution.tour.len();
        let mut total_improved = false;

        loop {
            let mut best_delta = 0.0;
            let mut best_pair = None;

            for i in 0..n - 1 {
                for j in i + 1..n {
                    let delta = solution.two_opt_delta(oracle, i, j);
                    if delta < -self.epsilon && delta < best_delta {
                        best_delta = delta;
                        best_pair = Some((i, j));
                    }
                }
            }

            match best_pair {
                Some((i, j)) => {
                    solution.apply_two_opt(i, j);
                    solution.cost += best_delta;
                    total_improved = true;
                }
                None => break,
            }
        }

        total_improved
    }
}

impl LocalSearch for TwoOptSearch {
    fn improve(
        &self,
        oracle: &DistanceOracle,
        solution: &mut Solution,
        _rng: &mut ChaCha8Rng,
    ) -> bool {
        if solution.tour.len() < 3 {
            return false;
        }
        if self.first_improvement {
            self.improve_first(oracle, solution)
        } else {
            self.improve_best(oracle, solution)
        }
    }

    fn name(&self) -> &str {
        if self.first_improvement {
            "2-Opt-FI"
        } else {
            "2-Opt-BI"
        }
    }
}

// ==================== Node swap ====================

/// Node-swap search: exchange the positions of two non-adjacent nodes
/// (rather than reversing the segment between them), first improvement.
///
/// Positions start at 1 so the lower neighbor index never wraps below the
/// first element.
pub struct NodeSwapSearch {
    pub epsilon: f64,
}

impl NodeSwapSearch {
    pub fn new() -> Self {
        NodeSwapSearch {
            epsilon: DEFAULT_EPSILON,
        }
    }
}

impl Default for NodeSwapSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalSearch for NodeSwapSearch {
    fn improve(
        &self,
        oracle: &DistanceOracle,
        solution: &mut Solution,
        _rng: &mut ChaCha8Rng,
    ) -> bool {
        let n = solution.tour.len();
        if n < 4 {
            return false;
        }

        let mut total_improved = false;

        'pass: loop {
            for i in 1..n - 1 {
                for j in i + 2..n {
                    let delta = solution.swap_delta(oracle, i, j);
                    if delta < -self.epsilon {
                        solution.apply_swap(i, j);
                        solution.cost += delta;
                        total_improved = true;
                        continue 'pass;
                    }
                }
            }
            break;
        }

        total_improved
    }

    fn name(&self) -> &str {
        "NodeSwap"
    }
}

// ==================== Perturbation / shake ====================

/// Iterated local search around first-improvement 2-opt.
///
/// After reaching a local optimum, applies `intensity` random pairwise
/// element swaps (not reversals) to escape it, re-optimizes, and repeats for
/// `shake_rounds` rounds. Only the best tour seen across rounds is retained;
/// rounds that fail to improve on it are discarded.
pub struct ShakingSearch {
    /// Number of perturb-and-reoptimize rounds
    pub shake_rounds: usize,
    /// Random swaps applied per round
    pub intensity: usize,
    pub epsilon: f64,
}

impl ShakingSearch {
    pub fn new() -> Self {
        ShakingSearch {
            shake_rounds: 10,
            intensity: 3,
            epsilon: DEFAULT_EPSILON,
        }
    }

    pub fn with_params(shake_rounds: usize, intensity: usize) -> Self {
        ShakingSearch {
            shake_rounds,
            intensity,
            epsilon: DEFAULT_EPSILON,
        }
    }
}

impl ShakingSearch {
    fn perturb(&self, tour: &mut [usize], rng: &mut ChaCha8Rng) {
        let n = tour.len();
        for _ in 0..self.intensity {
            let i = rng.gen_range(0..n);
            let j = rng.gen_range(0..n);
            if i != j {
                tour.swap(i, j);
            }
        }
    }
}

impl Default for ShakingSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalSearch for ShakingSearch {
    fn improve(
        &self,
        oracle: &DistanceOracle,
        solution: &mut Solution,
        rng: &mut ChaCha8Rng,
    ) -> bool {
        if solution.tour.len() < 3 {
            return false;
        }

        let entry_cost = solution.cost;
        let two_opt = TwoOptSearch::first_improvement();
        two_opt.improve(oracle, solution, rng);

        let mut best_tour = solution.tour.clone();
        let mut best_cost = solution.cost;

        for _ in 0..self.shake_rounds {
            let mut candidate = Solution {
                tour: best_tour.clone(),
                cost: best_cost,
                algorithm: solution.algorithm.clone(),
                computation_time: 0.0,
                iterations: None,
            };

            self.perturb(&mut candidate.tour, rng);
            candidate.validate(oracle);
            two_opt.improve(oracle, &mut candidate, rng);

            if candidate.cost < best_cost - self.epsilon {
                best_cost = candidate.cost;
                best_tour = candidate.tour;
            }
        }

        solution.tour = best_tour;
        solution.cost = best_cost;
        solution.iterations = Some(self.shake_rounds);

        best_cost < entry_cost - self.epsilon
    }

    fn name(&self) -> &str {
        "Shake-ILS"
    }
}

// ==================== Temperature-gated acceptance ====================

/// 2-opt with temperature-gated acceptance of non-improving moves.
///
/// A move is applied if its delta is improving beyond tolerance OR if a
/// uniform integer draw in `[0, 1000)` falls below a temperature counter
/// that starts at 1000 and is multiplied by 0.95 once per outer pass. The
/// gate compares a raw counter against the draw rather than evaluating
/// `exp(-delta / T)`, so early passes accept almost any move and later ones
/// almost none; this is not a Boltzmann acceptance criterion. The best tour
/// seen is retained, so the gate can only help, never hurt, the result.
pub struct TemperatureGatedSearch {
    pub initial_temperature: f64,
    pub cooling_rate: f64,
    pub epsilon: f64,
}

impl TemperatureGatedSearch {
    pub fn new() -> Self {
        TemperatureGatedSearch {
            initial_temperature: 1000.0,
            cooling_rate: 0.95,
            epsilon: DEFAULT_EPSILON,
        }
    }
}

impl Default for TemperatureGatedSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalSearch for TemperatureGatedSearch {
    fn improve(
        &self,
        oracle: &DistanceOracle,
        solution: &mut Solution,
        rng: &mut ChaCha8Rng,
    ) -> bool {
        let n = solution.tour.len();
        if n < 3 {
            return false;
        }

        let entry_cost = solution.cost;
        let mut best_tour = solution.tour.clone();
        let mut best_cost = solution.cost;
        let mut temperature = self.initial_temperature;
        let mut passes = 0usize;

        loop {
            let mut improved = false;

            for i in 0..n - 1 {
                for j in i + 1..n {
                    let delta = solution.two_opt_delta(oracle, i, j);
                    let gated = temperature >= 1.0
                        && (rng.gen_range(0..1000) as f64) < temperature;

                    if delta < -self.epsilon || gated {
                        solution.apply_two_opt(i, j);
                        solution.cost += delta;
                        if delta < -self.epsilon {
                            improved = true;
                        }
                        if solution.cost < best_cost - self.epsilon {
                            best_cost = solution.cost;
                            best_tour = solution.tour.clone();
                        }
                    }
                }
            }

            temperature *= self.cooling_rate;
            passes += 1;

            // Once the gate has cooled off this is plain first-improvement
            // 2-opt; a pass without improvement is the local optimum.
            if temperature < 1.0 && !improved {
                break;
            }
        }

        solution.tour = best_tour;
        solution.cost = best_cost;
        solution.iterations = Some(passes);

        best_cost < entry_cost - self.epsilon
    }

    fn name(&self) -> &str {
        "TemperatureGated"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::{Point, TspInstance};
    use rand::SeedableRng;

    fn square_oracle() -> DistanceOracle {
        let instance = TspInstance::from_points(
            "square",
            vec![
                Point::new(0.0, 0.0, 0.0),
                Point::new(1.0, 0.0, 0.0),
                Point::new(1.0, 1.0, 0.0),
                Point::new(0.0, 1.0, 0.0),
            ],
        );
        DistanceOracle::precomputed(&instance, |_| {})
    }

    fn cloud_oracle() -> DistanceOracle {
        let instance = TspInstance::from_points(
            "cloud",
            vec![
                Point::new(0.0, 0.0, 0.0),
                Point::new(3.0, 1.0, 0.5),
                Point::new(1.0, 4.0, 2.0),
                Point::new(5.0, 5.0, 1.0),
                Point::new(2.0, 2.0, 3.0),
                Point::new(4.0, 0.5, 2.5),
                Point::new(0.5, 3.0, 1.5),
                Point::new(3.5, 4.5, 0.2),
            ],
        );
        DistanceOracle::precomputed(&instance, |_| {})
    }

    fn all_square_permutations() -> Vec<Vec<usize>> {
        // All tours over 4 nodes starting at 0 (cyclic rotations are
        // equivalent, so fixing the first node loses nothing).
        vec![
            vec![0, 1, 2, 3],
            vec![0, 1, 3, 2],
            vec![0, 2, 1, 3],
            vec![0, 2, 3, 1],
            vec![0, 3, 1, 2],
            vec![0, 3, 2, 1],
        ]
    }

    #[test]
    fn test_two_opt_reaches_square_optimum_from_any_permutation() {
        let oracle = square_oracle();

        for variant in [
            TwoOptSearch::first_improvement(),
            TwoOptSearch::best_improvement(),
        ] {
            for tour in all_square_permutations() {
                let mut rng = ChaCha8Rng::seed_from_u64(0);
                let mut solution = Solution::from_tour(&oracle, tour.clone(), "test");
                variant.improve(&oracle, &mut solution, &mut rng);

                assert!(
                    (solution.cost - 4.0).abs() < 1e-9,
                    "{} from {:?} ended at {}",
                    variant.name(),
                    tour,
                    solution.cost
                );
                assert!(solution.is_permutation(4));
            }
        }
    }

    #[test]
    fn test_first_improvement_is_idempotent_at_local_optimum() {
        let oracle = cloud_oracle();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut solution = Solution::from_tour(&oracle, vec![0, 3, 6, 1, 7, 4, 2, 5], "test");

        let two_opt = TwoOptSearch::first_improvement();
        two_opt.improve(&oracle, &mut solution, &mut rng);
        let converged_cost = solution.cost;

        let improved_again = two_opt.improve(&oracle, &mut solution, &mut rng);
        assert!(!improved_again);
        assert_eq!(solution.cost, converged_cost);
    }

    #[test]
    fn test_incremental_cost_matches_full_recomputation() {
        let oracle = cloud_oracle();

        for variant in SearchVariant::build_all() {
            let mut rng = ChaCha8Rng::seed_from_u64(11);
            let mut solution =
                Solution::from_tour(&oracle, vec![0, 5, 2, 7, 1, 6, 3, 4], "test");
            variant.improve(&oracle, &mut solution, &mut rng);

            let tracked = solution.cost;
            solution.validate(&oracle);
            let relative = (tracked - solution.cost).abs() / solution.cost.max(1.0);
            assert!(
                relative < 1e-4,
                "{}: tracked {} vs recomputed {}",
                variant.name(),
                tracked,
                solution.cost
            );
        }
    }

    #[test]
    fn test_all_variants_preserve_permutation() {
        let oracle = cloud_oracle();

        for variant in SearchVariant::build_all() {
            let mut rng = ChaCha8Rng::seed_from_u64(3);
            let mut solution =
                Solution::from_tour(&oracle, vec![0, 7, 5, 3, 1, 6, 4, 2], "test");
            variant.improve(&oracle, &mut solution, &mut rng);
            assert!(
                solution.is_permutation(8),
                "{} broke the permutation",
                variant.name()
            );
        }
    }

    #[test]
    fn test_variants_never_worsen_the_tour() {
        let oracle = cloud_oracle();

        for variant in SearchVariant::build_all() {
            let mut rng = ChaCha8Rng::seed_from_u64(17);
            let mut solution =
                Solution::from_tour(&oracle, vec![0, 4, 1, 5, 2, 6, 3, 7], "test");
            let entry_cost = solution.cost;
            variant.improve(&oracle, &mut solution, &mut rng);
            assert!(
                solution.cost <= entry_cost + 1e-9,
                "{} worsened the tour",
                variant.name()
            );
        }
    }

    #[test]
    fn test_degenerate_tours_short_circuit() {
        let instance = TspInstance::from_points("one", vec![Point::new(0.0, 0.0, 0.0)]);
        let oracle = DistanceOracle::on_demand(&instance);

        for variant in SearchVariant::build_all() {
            let mut rng = ChaCha8Rng::seed_from_u64(0);
            let mut solution = Solution::from_tour(&oracle, vec![0], "test");
            let improved = variant.improve(&oracle, &mut solution, &mut rng);
            assert!(!improved);
            assert_eq!(solution.tour, vec![0]);
            assert_eq!(solution.cost, 0.0);
        }
    }

    #[test]
    fn test_stochastic_variants_are_seed_deterministic() {
        let oracle = cloud_oracle();

        for variant in [SearchVariant::Shake, SearchVariant::TemperatureGated] {
            let search = variant.build();

            let mut run = |seed: u64| {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                let mut solution =
                    Solution::from_tour(&oracle, vec![0, 6, 2, 5, 1, 7, 3, 4], "test");
                search.improve(&oracle, &mut solution, &mut rng);
                (solution.tour, solution.cost)
            };

            assert_eq!(run(123), run(123));
        }
    }

    impl SearchVariant {
        fn build_all() -> Vec<Box<dyn LocalSearch + Send + Sync>> {
            [
                SearchVariant::TwoOptFirst,
                SearchVariant::TwoOptBest,
                SearchVariant::NodeSwap,
                SearchVariant::Shake,
                SearchVariant::TemperatureGated,
            ]
            .iter()
            .map(|v| v.build())
            .collect()
        }
    }
}
