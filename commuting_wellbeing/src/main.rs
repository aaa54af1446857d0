//! Rain-Commuting Well-Being Loss - Demo Simulation
//!
//! Runs the model on a synthetic city so the dynamics can be inspected
//! without real rainfall/routing exports: a seeded housing market around two
//! workplaces, a year of stochastic rain days, five income tiers.

use commuting_wellbeing::attenuation::SpeedAttenuationSeries;
use commuting_wellbeing::city::{CityData, WorkplaceData};
use commuting_wellbeing::economy::EconomicProfile;
use commuting_wellbeing::housing::RentalListing;
use commuting_wellbeing::output::CityResults;
use commuting_wellbeing::population_simulator::{PopulationSimulator, ResidentRow};
use commuting_wellbeing::ModelConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::process;

fn main() {
    env_logger::init();

    println!("=== Rain-Commuting Well-Being Loss Model ===");
    println!("Synthetic-city demonstration run\n");

    let mut config = ModelConfig::baseline();
    config.people_per_group = 200; // Keep the demo quick
    let seed = 42;

    println!("Configuration:");
    println!("  Residents per group per workplace: {}", config.people_per_group);
    println!("  Risk aversion (θ): {}", config.theta);
    println!("  Saving ratio: {}", config.saving_ratio);
    println!("  Wage floor: {}/h", config.wage_floor_hourly);
    println!(
        "  Selection weights: distance {} / time {} / rent {}",
        config.selection_weights.distance,
        config.selection_weights.time,
        config.selection_weights.rent
    );
    println!("  Seed: {seed}\n");

    let mut setup_rng = StdRng::seed_from_u64(seed);
    let city = synthetic_city(&mut setup_rng).unwrap_or_else(|e| {
        eprintln!("Error building synthetic city: {e}");
        process::exit(1);
    });

    let rainy_days = city
        .attenuation
        .values()
        .iter()
        .filter(|&&v| v < 1.0)
        .count();
    println!(
        "City '{}': {} workplaces, {} listings each, {}/{} rainy days",
        city.name,
        city.workplaces.len(),
        city.workplaces[0].listings.len(),
        rainy_days,
        city.attenuation.len()
    );

    let simulator = PopulationSimulator::new(&config, &city).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        process::exit(1);
    });

    println!("Running simulation...\n");
    let rows = simulator.run(seed).unwrap_or_else(|e| {
        eprintln!("Simulation failed: {e}");
        process::exit(1);
    });

    let results = CityResults::new(&city, &config, seed, rows);
    let summary = results.summary();

    println!("=== Results ===\n");
    println!("Residents simulated: {}", results.rows.len());
    println!(
        "Affected residents: {} ({:.1}%)",
        summary.affected_residents,
        100.0 * summary.affected_residents as f64 / results.rows.len().max(1) as f64
    );
    println!("Total asset loss: {:.2}", summary.total_asset_loss);
    println!("Mean asset loss: {:.2}", summary.mean_asset_loss);
    println!("Mean well-being loss: {:.6}", summary.mean_wellbeing_loss);
    println!(
        "Total extra travel: {:.0} minutes, {:.1} distance units\n",
        summary.total_time_added, summary.total_distance_added
    );

    println!("Per income group (across workplaces):");
    for g in 1..=city.profile.groups.len() {
        let group_rows: Vec<&ResidentRow> =
            results.rows.iter().filter(|r| r.income_group == g).collect();
        if group_rows.is_empty() {
            continue;
        }
        let n = group_rows.len() as f64;
        let mean_income = group_rows.iter().map(|r| r.income).sum::<f64>() / n;
        let mean_rent = group_rows
            .iter()
            .map(|r| r.listing.monthly_rent)
            .sum::<f64>()
            / n;
        let mean_asset_loss = group_rows.iter().map(|r| r.asset_loss).sum::<f64>() / n;
        let mean_wellbeing = group_rows.iter().map(|r| r.wellbeing_loss).sum::<f64>() / n;
        println!(
            "  Group {}: mean income {:.0}, mean rent {:.0}, \
             mean asset loss {:.2}, mean well-being loss {:.6}",
            g, mean_income, mean_rent, mean_asset_loss, mean_wellbeing
        );
    }

    println!("\n=== Simulation Complete ===");
}

/// Build a self-consistent synthetic city from a seeded RNG.
fn synthetic_city(rng: &mut StdRng) -> commuting_wellbeing::error::SimResult<CityData> {
    let profile = EconomicProfile::from_city_facts(42_000.0, 1_100.0, 0.25)?;

    // Roughly a rainy day in three; slowdowns between mild and severe.
    let attenuation: Vec<f64> = (0..365)
        .map(|_| {
            if rng.gen_bool(0.3) {
                rng.gen_range(0.35..0.95)
            } else {
                1.0
            }
        })
        .collect();

    let mut workplaces = Vec::new();
    for id in ["cbd", "techpark"] {
        let listings: Vec<RentalListing> = (0..60).map(|_| synthetic_listing(rng)).collect();
        workplaces.push(WorkplaceData {
            id: id.to_string(),
            listings,
        });
    }

    Ok(CityData {
        name: "demo_city".into(),
        profile,
        attenuation: SpeedAttenuationSeries::new(attenuation)?,
        workplaces,
    })
}

fn synthetic_listing(rng: &mut StdRng) -> RentalListing {
    let geo_distance = rng.gen_range(2.0..25.0);
    let driving_distance = geo_distance * rng.gen_range(1.1..1.4);
    // Door-to-door driving at 28-45 km/h average
    let driving_time = driving_distance / rng.gen_range(28.0..45.0) * 60.0;
    let transit_distance = driving_distance * rng.gen_range(0.9..1.2);
    let transit_time = driving_time * rng.gen_range(1.4..2.2);

    // Central (close) listings rent higher
    let monthly_rent = 500.0 + (25.0 - geo_distance) * 90.0 + rng.gen_range(0.0..400.0);

    RentalListing {
        monthly_rent,
        geo_distance,
        driving_distance,
        driving_time,
        driving_fare: 12.0 + 2.3 * driving_distance,
        transit_distance,
        transit_time,
        transit_fare: rng.gen_range(2.0..7.0),
    }
}
