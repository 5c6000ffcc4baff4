//! Multi-trial construct-then-improve driver.
//!
//! Each trial is statistically independent given its random stream: trial
//! `t` uses `ChaCha8Rng::seed_from_u64(seed + t)`, so sequential and
//! parallel execution find the same set of candidate tours. The oracle is
//! shared read-only; tour buffers are trial-local.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::distance::DistanceOracle;
use crate::heuristics::construction::{ConstructionHeuristic, GreedyRandomizedConstruction};
use crate::heuristics::local_search::SearchVariant;
use crate::solution::Solution;
use crate::tracker::SolutionTracker;

/// Configuration for one batch of trials.
#[derive(Debug, Clone, Copy)]
pub struct TrialConfig {
    /// GRASP construction parameter in `[0, 1]`
    pub alpha: f64,
    /// Local search variant applied after construction
    pub variant: SearchVariant,
    /// Number of construct-then-improve trials
    pub trials: usize,
    /// Base seed; trial `t` runs on `seed + t`
    pub seed: u64,
    /// Run trials on the rayon thread pool
    pub parallel: bool,
}

fn run_one(oracle: &DistanceOracle, config: &TrialConfig, trial: u64) -> Solution {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed.wrapping_add(trial));
    let constructor = GreedyRandomizedConstruction::new(config.alpha);
    let search = config.variant.build();

    let start = std::time::Instant::now();
    let mut solution = constructor.construct(oracle, &mut rng);
    search.improve(oracle, &mut solution, &mut rng);
    solution.computation_time = start.elapsed().as_secs_f64();
    solution.algorithm = format!("{}+{}", constructor.name(), search.name());

    log::debug!(
        "trial {}: cost {:.2} in {:.4}s",
        trial,
        solution.cost,
        solution.computation_time
    );

    solution
}

/// Run `config.trials` construct-then-improve trials and return the best
/// solution found. `on_trial` is called once per finished trial with the
/// trial index and its cost (progress reporting belongs to the caller).
///
/// Returns `None` only when `config.trials` is zero.
pub fn run_trials<F>(
    oracle: &DistanceOracle,
    config: &TrialConfig,
    on_trial: F,
) -> Option<Solution>
where
    F: Fn(u64, f64) + Sync,
{
    let mut tracker = SolutionTracker::new();

    if config.parallel {
        let solutions: Vec<Solution> = (0..config.trials as u64)
            .into_par_iter()
            .map(|t| {
                let solution = run_one(oracle, config, t);
                on_trial(t, solution.cost);
                solution
            })
            .collect();

        for solution in solutions {
            if tracker.observe(solution) {
                if let Some(best) = tracker.best() {
                    log::info!("new best: {:.2}", best.cost);
                }
            }
        }
    } else {
        for t in 0..config.trials as u64 {
            let solution = run_one(oracle, config, t);
            on_trial(t, solution.cost);
            if tracker.observe(solution) {
                if let Some(best) = tracker.best() {
                    log::info!("new best: {:.2}", best.cost);
                }
            }
        }
    }

    tracker.into_best()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::{Point, TspInstance};

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
            ],
        );
        DistanceOracle::precomputed(&instance, |_| {})
    }

    fn config(parallel: bool) -> TrialConfig {
        TrialConfig {
            alpha: 0.4,
            variant: SearchVariant::TwoOptFirst,
            trials: 16,
            seed: 42,
            parallel,
        }
    }

    #[test]
    fn test_sequential_and_parallel_find_same_best() {
        let oracle = cloud_oracle();

        let sequential = run_trials(&oracle, &config(false), |_, _| {}).unwrap();
        let parallel = run_trials(&oracle, &config(true), |_, _| {}).unwrap();

        assert_eq!(sequential.cost, parallel.cost);
        assert!(sequential.is_permutation(7));
        assert!(parallel.is_permutation(7));
    }

    #[test]
    fn test_zero_trials_returns_none() {
        let oracle = cloud_oracle();
        let mut cfg = config(false);
        cfg.trials = 0;
        assert!(run_trials(&oracle, &cfg, |_, _| {}).is_none());
    }

    #[test]
    fn test_on_trial_called_per_trial() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let oracle = cloud_oracle();
        let count = AtomicUsize::new(0);
        run_trials(&oracle, &config(false), |_, _| {
            count.fetch_add(1, Ordering::Relaxed);
        });
        assert_eq!(count.load(Ordering::Relaxed), 16);
    }
}
