//! Result serialization for downstream analysis
//!
//! One results table per city (CSV, one row per simulated resident) plus a
//! summary JSON carrying the run metadata and city-level aggregates.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::city::CityData;
use crate::error::SimResult;
use crate::population_simulator::ResidentRow;
use crate::ModelConfig;

/// Metadata for reproducibility
#[derive(Debug, Clone, Serialize)]
pub struct RunMetadata {
    pub city: String,
    pub seed: u64,
    pub num_days: usize,
    pub num_residents: usize,
    pub timestamp: String,
    pub config: ModelConfig,
}

/// City-level aggregates over the result rows
#[derive(Debug, Clone, Serialize)]
pub struct ResultsSummary {
    pub total_wellbeing_loss: f64,
    pub mean_wellbeing_loss: f64,
    pub total_asset_loss: f64,
    pub mean_asset_loss: f64,
    pub total_time_added: f64,
    pub total_distance_added: f64,
    /// Residents whose well-being loss is strictly positive
    pub affected_residents: usize,
}

/// Top-level container for one city's simulation output
#[derive(Debug, Clone)]
pub struct CityResults {
    pub metadata: RunMetadata,
    pub rows: Vec<ResidentRow>,
}

impl CityResults {
    pub fn new(city: &CityData, config: &ModelConfig, seed: u64, rows: Vec<ResidentRow>) -> Self {
        CityResults {
            metadata: RunMetadata {
                city: city.name.clone(),
                seed,
                num_days: city.attenuation.len(),
                num_residents: rows.len(),
                timestamp: chrono::Utc::now().to_rfc3339(),
                config: config.clone(),
            },
            rows,
        }
    }

    pub fn summary(&self) -> ResultsSummary {
        let n = self.rows.len().max(1) as f64;
        let total_wellbeing_loss: f64 = self.rows.iter().map(|r| r.wellbeing_loss).sum();
        let total_asset_loss: f64 = self.rows.iter().map(|r| r.asset_loss).sum();
        ResultsSummary {
            total_wellbeing_loss,
            mean_wellbeing_loss: total_wellbeing_loss / n,
            total_asset_loss,
            mean_asset_loss: total_asset_loss / n,
            total_time_added: self.rows.iter().map(|r| r.time_added).sum(),
            total_distance_added: self.rows.iter().map(|r| r.distance_added).sum(),
            affected_residents: self.rows.iter().filter(|r| r.wellbeing_loss > 0.0).count(),
        }
    }

    /// Write the per-resident results table to CSV.
    pub fn write_rows_csv<P: AsRef<Path>>(&self, path: P) -> SimResult<()> {
        let mut wtr = csv::Writer::from_path(path.as_ref())?;

        wtr.write_record([
            "workplace",
            "income_group",
            "resident",
            "income",
            "initial_savings",
            "individual_rent_price",
            "distance",
            "driving_distance",
            "driving_time",
            "driving_fare",
            "commuting_distance",
            "commuting_time",
            "transit_price",
            "well_being_loss",
            "asset_loss",
            "time_add",
            "distance_add",
        ])?;

        for row in &self.rows {
            wtr.write_record(&[
                row.workplace.clone(),
                row.income_group.to_string(),
                row.resident.to_string(),
                row.income.to_string(),
                row.initial_savings.to_string(),
                row.listing.monthly_rent.to_string(),
                row.listing.geo_distance.to_string(),
                row.listing.driving_distance.to_string(),
                row.listing.driving_time.to_string(),
                row.listing.driving_fare.to_string(),
                row.listing.transit_distance.to_string(),
                row.listing.transit_time.to_string(),
                row.listing.transit_fare.to_string(),
                row.wellbeing_loss.to_string(),
                row.asset_loss.to_string(),
                row.time_added.to_string(),
                row.distance_added.to_string(),
            ])?;
        }

        wtr.flush()?;
        Ok(())
    }

    /// Write metadata + aggregates as pretty JSON.
    pub fn write_summary_json<P: AsRef<Path>>(&self, path: P) -> SimResult<()> {
        #[derive(Serialize)]
        struct SummaryFile<'a> {
            metadata: &'a RunMetadata,
            summary: ResultsSummary,
        }
        let json = serde_json::to_string_pretty(&SummaryFile {
            metadata: &self.metadata,
            summary: self.summary(),
        })?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Write all outputs to a directory.
    ///
    /// Creates:
    /// - residents.csv
    /// - summary.json
    pub fn write_all<P: AsRef<Path>>(&self, dir: P) -> SimResult<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        self.write_rows_csv(dir.join("residents.csv"))?;
        self.write_summary_json(dir.join("summary.json"))?;
        Ok(())
    }
}
