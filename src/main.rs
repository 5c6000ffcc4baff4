//! GRASP TSP Solver - Command Line Interface

use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};

use grasp_tsp::distance::{DistanceOracle, DEFAULT_MATRIX_THRESHOLD};
use grasp_tsp::driver::{run_trials, TrialConfig};
use grasp_tsp::heuristics::local_search::SearchVariant;
use grasp_tsp::instance::TspInstance;
use grasp_tsp::output::{write_tour_file, RunLog};

use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "grasp-tsp")]
#[command(version = "1.0")]
#[command(about = "A GRASP + 2-opt solver for the Euclidean TSP over 3D points")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve an instance with repeated construct-then-improve trials
    Solve {
        /// Path to the TSPLIB instance file
        #[arg(short, long)]
        instance: PathBuf,

        /// GRASP alpha: 0 = pure greedy, 1 = pure random construction
        #[arg(short, long, default_value = "0.3")]
        alpha: f64,

        /// Local search variant
        #[arg(short, long, value_enum, default_value = "two-opt-first")]
        variant: Variant,

        /// Number of construct-then-improve trials
        #[arg(short, long, default_value = "100")]
        trials: usize,

        /// Random seed (trial t runs on seed + t)
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Run trials in parallel
        #[arg(short, long)]
        parallel: bool,

        /// Instance size up to which the distance matrix is precomputed
        #[arg(long, default_value_t = DEFAULT_MATRIX_THRESHOLD)]
        matrix_threshold: usize,

        /// Write the best tour to this file (TSPLIB TOUR format)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write the best solution to this file as JSON
        #[arg(long)]
        json: Option<PathBuf>,

        /// Verbose output
        #[arg(long)]
        verbose: bool,
    },

    /// Print statistics about an instance
    Analyze {
        /// Path to the TSPLIB instance file
        #[arg(short, long)]
        instance: PathBuf,
    },

    /// Compare alpha values over repeated runs, logging costs to CSV
    Compare {
        /// Path to the TSPLIB instance file
        #[arg(short, long)]
        instance: PathBuf,

        /// Alpha values to try
        #[arg(short, long, value_delimiter = ',', default_value = "0.0,0.1,0.3,0.5,0.7,1.0")]
        alphas: Vec<f64>,

        /// Number of runs per alpha
        #[arg(short, long, default_value = "5")]
        runs: usize,

        /// Trials per run
        #[arg(short, long, default_value = "20")]
        trials: usize,

        /// Local search variant
        #[arg(long, value_enum, default_value = "two-opt-first")]
        variant: Variant,

        /// Output CSV file
        #[arg(short, long, default_value = "runs.csv")]
        output: PathBuf,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum Variant {
    /// Edge-reversal 2-opt, first improvement
    TwoOptFirst,
    /// Edge-reversal 2-opt, best improvement
    TwoOptBest,
    /// Node position swap
    NodeSwap,
    /// Shake/perturbation around first-improvement 2-opt
    Shake,
    /// 2-opt with temperature-gated acceptance
    TemperatureGated,
}

impl From<Variant> for SearchVariant {
    fn from(v: Variant) -> Self {
        match v {
            Variant::TwoOptFirst => SearchVariant::TwoOptFirst,
            Variant::TwoOptBest => SearchVariant::TwoOptBest,
            Variant::NodeSwap => SearchVariant::NodeSwap,
            Variant::Shake => SearchVariant::Shake,
            Variant::TemperatureGated => SearchVariant::TemperatureGated,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            instance,
            alpha,
            variant,
            trials,
            seed,
            parallel,
            matrix_threshold,
            output,
            json,
            verbose,
        } => {
            solve_instance(
                &instance,
                alpha,
                variant,
                trials,
                seed,
                parallel,
                matrix_threshold,
                output,
                json,
                verbose,
            );
        }

        Commands::Analyze { instance } => {
            analyze_instance(&instance);
        }

        Commands::Compare {
            instance,
            alphas,
            runs,
            trials,
            variant,
            output,
        } => {
            compare_alphas(&instance, &alphas, runs, trials, variant, &output);
        }
    }
}

fn load_instance(path: &PathBuf) -> TspInstance {
    println!("Loading instance from {:?}...", path);
    match TspInstance::from_file(path) {
        Ok(inst) => inst,
        Err(e) => {
            eprintln!("Error loading instance: {}", e);
            std::process::exit(1);
        }
    }
}

fn build_oracle(instance: &TspInstance, matrix_threshold: usize) -> DistanceOracle {
    if instance.dimension <= matrix_threshold {
        println!("Precomputing distance matrix ({} nodes)...", instance.dimension);
        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::with_template("{bar:40} {percent}%").expect("valid template"),
        );
        let oracle = DistanceOracle::precomputed(instance, |fraction| {
            bar.set_position((fraction * 100.0) as u64);
        });
        bar.finish();
        oracle
    } else {
        println!(
            "Instance has {} nodes, computing distances on demand",
            instance.dimension
        );
        DistanceOracle::on_demand(instance)
    }
}

#[allow(clippy::too_many_arguments)]
fn solve_instance(
    path: &PathBuf,
    alpha: f64,
    variant: Variant,
    trials: usize,
    seed: u64,
    parallel: bool,
    matrix_threshold: usize,
    output: Option<PathBuf>,
    json: Option<PathBuf>,
    verbose: bool,
) {
    let instance = load_instance(path);

    if verbose {
        println!("{}", instance.statistics());
    }

    let oracle = build_oracle(&instance, matrix_threshold);

    println!(
        "Running {} trials (alpha = {}, variant = {:?})...",
        trials, alpha, variant
    );

    let config = TrialConfig {
        alpha,
        variant: variant.into(),
        trials,
        seed,
        parallel,
    };

    let bar = ProgressBar::new(trials as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} trials").expect("valid template"),
    );

    let start = Instant::now();
    let best = run_trials(&oracle, &config, |_, _| bar.inc(1));
    let elapsed = start.elapsed();
    bar.finish();

    let best = match best {
        Some(solution) => solution,
        None => {
            eprintln!("No trials were run");
            std::process::exit(1);
        }
    };

    println!("\n========== Results ==========");
    println!("Algorithm: {}", best.algorithm);
    println!("Cost: {:.2}", best.cost);
    println!("Time: {:.4}s", elapsed.as_secs_f64());

    if verbose {
        println!("\nTour: {:?}", best.tour);
    }

    if let Some(out_path) = output {
        match write_tour_file(&out_path, &instance.name, &best) {
            Ok(()) => println!("\nTour saved to {:?}", out_path),
            Err(e) => {
                eprintln!("Failed to write tour file: {}", e);
                std::process::exit(1);
            }
        }
    }

    if let Some(json_path) = json {
        let text = serde_json::to_string_pretty(&best).expect("solution serializes to JSON");
        match std::fs::write(&json_path, text) {
            Ok(()) => println!("Solution saved to {:?}", json_path),
            Err(e) => {
                eprintln!("Failed to write JSON solution: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn analyze_instance(path: &PathBuf) {
    let instance = load_instance(path);

    println!("========== Instance Analysis ==========\n");
    println!("{}", instance.statistics());
}

fn compare_alphas(
    path: &PathBuf,
    alphas: &[f64],
    runs: usize,
    trials: usize,
    variant: Variant,
    output: &PathBuf,
) {
    let instance = load_instance(path);
    let oracle = build_oracle(&instance, DEFAULT_MATRIX_THRESHOLD);

    println!(
        "Comparing alphas {:?} on {} (n = {}), {} runs x {} trials...\n",
        alphas, instance.name, instance.dimension, runs, trials
    );

    let mut log = RunLog::new(alphas.to_vec());

    for run in 0..runs {
        let mut costs = Vec::with_capacity(alphas.len());

        for &alpha in alphas {
            let config = TrialConfig {
                alpha,
                variant: variant.into(),
                trials,
                // Offset the base seed so runs differ but stay reproducible.
                seed: 42 + (run * trials) as u64,
                parallel: true,
            };

            match run_trials(&oracle, &config, |_, _| {}) {
                Some(best) => costs.push(best.cost),
                None => {
                    eprintln!("No trials were run");
                    std::process::exit(1);
                }
            }
        }

        let line: Vec<String> = alphas
            .iter()
            .zip(&costs)
            .map(|(a, c)| format!("alpha {} -> {:.2}", a, c))
            .collect();
        println!("run {}: {}", run + 1, line.join(", "));

        log.add_run(costs);
    }

    match log.export_csv(output) {
        Ok(()) => println!("\nRun log exported to {:?}", output),
        Err(e) => {
            eprintln!("Failed to write run log: {}", e);
            std::process::exit(1);
        }
    }
}
