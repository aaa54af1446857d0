//! City input data: economic facts, attenuation series, housing tables
//!
//! A city lives in one data directory:
//!
//! ```text
//! <city>/
//!   city.toml          name, average income, consumption floor, base ratio,
//!                      workplace ids
//!   attenuation.csv    one `velocity_change` row per day
//!   listings/<id>.csv  one rental/commute table per workplace
//! ```
//!
//! Parsers are generic over `io::Read` so tables can be validated from
//! in-memory fixtures as well as files.

use std::fs;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::attenuation::SpeedAttenuationSeries;
use crate::economy::EconomicProfile;
use crate::error::{SimError, SimResult};
use crate::housing::RentalListing;

/// Raw facts from `city.toml`; everything else is derived.
#[derive(Debug, Clone, Deserialize)]
pub struct CityFacts {
    pub name: String,
    /// Average annual income of the city
    pub average_income: f64,
    /// Minimum monthly consumption of a resident
    pub min_consumption_month: f64,
    /// City-wide base rent-income ratio; tiers fan out around it
    pub rent_income_ratio: f64,
    /// Workplace ids, one listing table each
    pub workplaces: Vec<String>,
}

/// One workplace and the rental listings reachable from it.
#[derive(Debug, Clone)]
pub struct WorkplaceData {
    pub id: String,
    pub listings: Vec<RentalListing>,
}

/// Everything the simulator needs to know about one city.
#[derive(Debug, Clone)]
pub struct CityData {
    pub name: String,
    pub profile: EconomicProfile,
    pub attenuation: SpeedAttenuationSeries,
    pub workplaces: Vec<WorkplaceData>,
}

impl CityData {
    /// Load a city from its data directory.
    pub fn load(dir: &Path) -> SimResult<Self> {
        let facts_path = dir.join("city.toml");
        let facts: CityFacts = toml::from_str(&fs::read_to_string(&facts_path)?)?;

        let profile = EconomicProfile::from_city_facts(
            facts.average_income,
            facts.min_consumption_month,
            facts.rent_income_ratio,
        )?;

        let attenuation = parse_attenuation(fs::File::open(dir.join("attenuation.csv"))?)?;

        let mut workplaces = Vec::with_capacity(facts.workplaces.len());
        for id in &facts.workplaces {
            let path = dir.join("listings").join(format!("{id}.csv"));
            let listings = parse_listings(fs::File::open(&path)?)?;
            log::debug!(
                "loaded {} listings for workplace {id} of {}",
                listings.len(),
                facts.name
            );
            workplaces.push(WorkplaceData {
                id: id.clone(),
                listings,
            });
        }

        let city = CityData {
            name: facts.name,
            profile,
            attenuation,
            workplaces,
        };
        city.validate()?;
        Ok(city)
    }

    pub fn validate(&self) -> SimResult<()> {
        self.profile.validate()?;
        if self.workplaces.is_empty() {
            return Err(SimError::Validation(format!(
                "city {} has no workplaces",
                self.name
            )));
        }
        for workplace in &self.workplaces {
            if workplace.listings.is_empty() {
                return Err(SimError::Validation(format!(
                    "workplace {} of {} has an empty listing table",
                    workplace.id, self.name
                )));
            }
        }
        Ok(())
    }
}

/// Parse and validate a rental listing table.
pub fn parse_listings<R: Read>(reader: R) -> SimResult<Vec<RentalListing>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut listings = Vec::new();
    for row in csv_reader.deserialize() {
        let listing: RentalListing = row?;
        listing.validate()?;
        listings.push(listing);
    }
    if listings.is_empty() {
        return Err(SimError::Validation("listing table has no rows".into()));
    }
    Ok(listings)
}

#[derive(Debug, Deserialize)]
struct AttenuationRow {
    velocity_change: f64,
}

/// Parse a per-day attenuation table (`velocity_change` column).
pub fn parse_attenuation<R: Read>(reader: R) -> SimResult<SpeedAttenuationSeries> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut values = Vec::new();
    for row in csv_reader.deserialize() {
        let record: AttenuationRow = row?;
        values.push(record.velocity_change);
    }
    SpeedAttenuationSeries::new(values)
}
