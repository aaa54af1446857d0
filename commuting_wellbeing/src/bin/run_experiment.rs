//! Batch Experiment Runner
//!
//! Executes the simulation over a set of city data directories based on a
//! TOML configuration file and saves one results table + summary per city.
//!
//! Usage:
//!   cargo run --release --bin run_experiment -- experiments/national_2022.toml

use commuting_wellbeing::city::CityData;
use commuting_wellbeing::output::CityResults;
use commuting_wellbeing::population_simulator::PopulationSimulator;
use commuting_wellbeing::ModelConfig;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

/// Top-level experiment configuration
#[derive(Debug, Clone, Deserialize)]
struct ExperimentConfig {
    experiment: ExperimentMetadata,
    #[serde(default)]
    model: ModelConfig,
    output: OutputSettings,
    /// City data directories, one simulation each
    cities: Vec<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
struct ExperimentMetadata {
    name: String,
    description: String,
    base_seed: u64,
    /// Override of the model's residents-per-group, handy for smoke runs
    people_per_group: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
struct OutputSettings {
    save_residents: bool,
    save_summary: bool,
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <experiment_config.toml>", args[0]);
        eprintln!("Example: {} experiments/national_2022.toml", args[0]);
        process::exit(1);
    }

    let config_path = &args[1];
    println!("=== Rain-Commuting Well-Being Experiment Runner ===\n");
    println!("Loading experiment config: {config_path}\n");

    let config_str = fs::read_to_string(config_path).unwrap_or_else(|e| {
        eprintln!("Error reading config file: {e}");
        process::exit(1);
    });

    let exp_config: ExperimentConfig = toml::from_str(&config_str).unwrap_or_else(|e| {
        eprintln!("Error parsing TOML config: {e}");
        process::exit(1);
    });

    let mut model = exp_config.model.clone();
    if let Some(people) = exp_config.experiment.people_per_group {
        model.people_per_group = people;
    }
    if let Err(e) = model.validate() {
        eprintln!("Invalid model configuration: {e}");
        process::exit(1);
    }

    println!("Experiment: {}", exp_config.experiment.name);
    println!("Description: {}", exp_config.experiment.description);
    println!(
        "Configuration: {} cities × {} residents per group per workplace\n",
        exp_config.cities.len(),
        model.people_per_group
    );

    let output_base = PathBuf::from("results").join(&exp_config.experiment.name);
    fs::create_dir_all(&output_base).unwrap_or_else(|e| {
        eprintln!("Error creating output directory: {e}");
        process::exit(1);
    });

    let start_time = Instant::now();

    for (city_idx, city_dir) in exp_config.cities.iter().enumerate() {
        let seed = exp_config.experiment.base_seed + city_idx as u64;
        run_city(city_dir, &model, seed, &output_base, &exp_config.output);
    }

    let total_elapsed = start_time.elapsed();
    println!(
        "\n✓ Experiment complete in {:.1}s ({:.1}s per city)",
        total_elapsed.as_secs_f64(),
        total_elapsed.as_secs_f64() / exp_config.cities.len().max(1) as f64
    );
    println!("Results saved to: {}", output_base.display());
}

/// Load, simulate and save one city.
fn run_city(
    city_dir: &Path,
    model: &ModelConfig,
    seed: u64,
    output_base: &Path,
    settings: &OutputSettings,
) {
    let run_start = Instant::now();

    let city = CityData::load(city_dir).unwrap_or_else(|e| {
        eprintln!("Error loading city from {}: {e}", city_dir.display());
        process::exit(1);
    });

    print!("{} (seed={seed})... ", city.name);
    use std::io::Write;
    std::io::stdout().flush().ok();

    let simulator = PopulationSimulator::new(model, &city).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        process::exit(1);
    });
    let rows = simulator.run(seed).unwrap_or_else(|e| {
        eprintln!("Simulation failed for {}: {e}", city.name);
        process::exit(1);
    });

    let results = CityResults::new(&city, model, seed, rows);
    let summary = results.summary();

    let city_dir_out = output_base.join(&city.name);
    if settings.save_residents || settings.save_summary {
        fs::create_dir_all(&city_dir_out).unwrap_or_else(|e| {
            eprintln!("Error creating {}: {e}", city_dir_out.display());
            process::exit(1);
        });
    }
    if settings.save_residents {
        results
            .write_rows_csv(city_dir_out.join("residents.csv"))
            .unwrap_or_else(|e| {
                eprintln!("Error writing residents table: {e}");
                process::exit(1);
            });
    }
    if settings.save_summary {
        results
            .write_summary_json(city_dir_out.join("summary.json"))
            .unwrap_or_else(|e| {
                eprintln!("Error writing summary: {e}");
                process::exit(1);
            });
    }

    let elapsed = run_start.elapsed();
    println!(
        "✓ ({:.1}s) residents={} affected={} mean_loss={:.6}",
        elapsed.as_secs_f64(),
        results.rows.len(),
        summary.affected_residents,
        summary.mean_wellbeing_loss
    );
}
