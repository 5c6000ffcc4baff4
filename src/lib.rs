//! GRASP + 2-opt solver for the Euclidean TSP over 3D point sets.
//!
//! # Features
//!
//! - Greedy-randomized construction with a restricted candidate list
//! - Local search: 2-opt (first/best improvement), node swap,
//!   perturbation/shake, temperature-gated acceptance
//! - Distance evaluation via a precomputed matrix or on demand
//! - Multi-trial driver with deterministic per-trial seeding, sequential
//!   or parallel
//!
//! # Example
//!
//! ```no_run
//! use grasp_tsp::instance::TspInstance;
//! use grasp_tsp::distance::DistanceOracle;
//! use grasp_tsp::driver::{run_trials, TrialConfig};
//! use grasp_tsp::heuristics::local_search::SearchVariant;
//!
//! let instance = TspInstance::from_file("instance.tsp").unwrap();
//! let oracle = DistanceOracle::on_demand(&instance);
//!
//! let config = TrialConfig {
//!     alpha: 0.3,
//!     variant: SearchVariant::TwoOptFirst,
//!     trials: 100,
//!     seed: 42,
//!     parallel: true,
//! };
//! let best = run_trials(&oracle, &config, |_, _| {}).unwrap();
//!
//! println!("Best tour cost: {:.2}", best.cost);
//! ```

pub mod distance;
pub mod driver;
pub mod heuristics;
pub mod instance;
pub mod output;
pub mod solution;
pub mod tracker;

pub use instance::TspInstance;
pub use solution::Solution;
