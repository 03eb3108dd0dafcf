//! Random Walk entry point
//!
//! Loads a JSON configuration, runs the simulation set and optionally writes
//! the results files into the working directory.

#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;
#[cfg(not(target_arch = "wasm32"))]
use std::process::ExitCode;

#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;

/// Random Walker Simulator
///
/// The config file is a JSON object with the keys walker_type,
/// num_simulations, num_steps, save_results, plot_statistics, gates,
/// obstacles, biased_walker_increasing, biased_walker_direction and
/// restart_step. Use "" for any list you do not want to configure.
/// Set RUST_LOG=info (or debug) to see simulation progress.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser, Debug)]
#[command(name = "random-walk")]
#[command(version)]
#[command(about = "Monte Carlo random walk simulator with obstacles, gates and restarts")]
struct Args {
    /// Path to the JSON configuration file
    config: PathBuf,

    /// Seed for the random number generator (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Also write results.json with the seed, parameters and full report
    #[arg(long)]
    json: bool,
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> ExitCode {
    use random_walk::report::{self, RunRecord};
    use random_walk::sim::{Simulator, seeded_rng};
    use random_walk::SimulationConfig;

    env_logger::init();

    let args = Args::parse();

    let config = match SimulationConfig::load(&args.config) {
        Ok(config) => config,
        Err(err) => {
            for message in err.messages() {
                eprintln!("{message}");
            }
            return ExitCode::FAILURE;
        }
    };

    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("Random Walk starting with seed {seed}");

    let simulator = Simulator::new(config.params);
    let report = simulator.run(&mut seeded_rng(seed));

    let summary = report.statistics.time_to_leave_radius.summary;
    println!(
        "Average time to leave radius 10: {:.3} steps (average last distance {:.3})",
        summary.mean_time_to_leave, summary.mean_last_distance
    );
    if let Some((step, distance)) = report.statistics.average_distance_from_origin.last_key_value()
    {
        println!("Average distance from origin at step {step}: {distance:.3}");
    }

    if config.plot_statistics {
        for series in report.statistics.plot_series() {
            log::info!("Series {} ready ({} points)", series.name, series.points.len());
        }
        log::warn!("Plot rendering is not available in this build; use the results file");
    }

    if !config.save_results && !args.json {
        return ExitCode::SUCCESS;
    }

    let dir = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(err) => {
            eprintln!("cannot resolve working directory: {err}");
            return ExitCode::FAILURE;
        }
    };

    if config.save_results {
        match report::save_results(&report, &dir) {
            Ok(path) => println!("Results saved to {}", path.display()),
            Err(err) => {
                eprintln!("failed to write results: {err}");
                return ExitCode::FAILURE;
            }
        }
    }

    if args.json {
        let record = RunRecord {
            seed,
            params: simulator.params().clone(),
            report,
        };
        match report::save_record(&record, &dir) {
            Ok(path) => println!("Run record saved to {}", path.display()),
            Err(err) => {
                eprintln!("failed to write run record: {err}");
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulator is a native command-line tool
}
