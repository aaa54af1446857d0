//! Rental listings and the housing selection draw
//!
//! A resident's rent window is their annual income times a rent-income ratio
//! window. Listings priced strictly inside the window (in monthly terms)
//! qualify; if none do, the window widens symmetrically by a fixed ratio step
//! and the search retries up to a configured cap. One qualifying listing is
//! then drawn with probability proportional to a weighted combination of the
//! normalized inverses of its driving distance, driving time and rent.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::{ModelConfig, SelectionWeights, MONTHS_PER_YEAR};

/// One rental listing tied to a city/workplace pair. Column names follow the
/// upstream routing-export contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalListing {
    /// Monthly rent per resident
    #[serde(rename = "individual_rent_price")]
    pub monthly_rent: f64,

    /// Straight-line distance to the workplace
    #[serde(rename = "distance")]
    pub geo_distance: f64,

    pub driving_distance: f64,
    /// Driving time in minutes
    pub driving_time: f64,
    pub driving_fare: f64,

    #[serde(rename = "commuting_distance")]
    pub transit_distance: f64,
    /// Transit time in minutes
    #[serde(rename = "commuting_time")]
    pub transit_time: f64,
    #[serde(rename = "transit_price")]
    pub transit_fare: f64,
}

impl RentalListing {
    /// Reject rows the selection draw or day loop cannot price. Rent and the
    /// driving leg are inverted for selection probabilities and must be
    /// strictly positive; the remaining columns only need to be finite and
    /// non-negative (a free transit leg is legal upstream).
    pub fn validate(&self) -> SimResult<()> {
        let positive = [
            (self.monthly_rent, "individual_rent_price"),
            (self.driving_distance, "driving_distance"),
            (self.driving_time, "driving_time"),
        ];
        for (value, column) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(SimError::Validation(format!(
                    "listing column {column} must be finite and positive, got {value}"
                )));
            }
        }
        let non_negative = [
            (self.geo_distance, "distance"),
            (self.driving_fare, "driving_fare"),
            (self.transit_distance, "commuting_distance"),
            (self.transit_time, "commuting_time"),
            (self.transit_fare, "transit_price"),
        ];
        for (value, column) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(SimError::Validation(format!(
                    "listing column {column} must be finite and non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Per-candidate selection probabilities: the weighted sum of each listing's
/// normalized inverse driving distance, driving time and rent. Closer, faster
/// and cheaper listings draw higher probabilities. The result sums to 1 when
/// the weights do.
pub fn selection_probabilities(
    candidates: &[&RentalListing],
    weights: &SelectionWeights,
) -> SimResult<Vec<f64>> {
    let distance = inverse_shares(candidates, |l| l.driving_distance, "driving_distance")?;
    let time = inverse_shares(candidates, |l| l.driving_time, "driving_time")?;
    let rent = inverse_shares(candidates, |l| l.monthly_rent, "individual_rent_price")?;

    Ok((0..candidates.len())
        .map(|i| distance[i] * weights.distance + time[i] * weights.time + rent[i] * weights.rent)
        .collect())
}

/// Normalized inverses of one listing column across the candidate set.
fn inverse_shares<F>(
    candidates: &[&RentalListing],
    column: F,
    name: &str,
) -> SimResult<Vec<f64>>
where
    F: Fn(&RentalListing) -> f64,
{
    let mut inverses = Vec::with_capacity(candidates.len());
    for &listing in candidates {
        let value = column(listing);
        if !value.is_finite() || value <= 0.0 {
            return Err(SimError::Validation(format!(
                "cannot normalize {name}: non-positive value {value}"
            )));
        }
        inverses.push(1.0 / value);
    }
    let total: f64 = inverses.iter().sum();
    Ok(inverses.into_iter().map(|x| x / total).collect())
}

/// Draws one listing for a resident given their income and ratio window.
pub struct HousingSelector<'a> {
    listings: &'a [RentalListing],
    weights: SelectionWeights,
    widen_step: f64,
    max_widen_rounds: usize,
}

impl<'a> HousingSelector<'a> {
    pub fn new(listings: &'a [RentalListing], config: &ModelConfig) -> Self {
        HousingSelector {
            listings,
            weights: config.selection_weights,
            widen_step: config.widen_step,
            max_widen_rounds: config.max_widen_rounds,
        }
    }

    /// Select a listing for a resident earning `annual_income` whose rent
    /// target is `annual_income × ratio_window`. Returns the index into the
    /// listing table, or `NoEligibleHousing` once the widening cap is hit.
    pub fn select<R: Rng>(
        &self,
        rng: &mut R,
        annual_income: f64,
        ratio_window: [f64; 2],
    ) -> SimResult<usize> {
        let mut window = ratio_window;
        for _ in 0..=self.max_widen_rounds {
            let low = annual_income * window[0] / MONTHS_PER_YEAR;
            let high = annual_income * window[1] / MONTHS_PER_YEAR;

            let candidates: Vec<usize> = self
                .listings
                .iter()
                .enumerate()
                .filter(|(_, l)| l.monthly_rent > low && l.monthly_rent < high)
                .map(|(i, _)| i)
                .collect();

            if candidates.is_empty() {
                window[0] -= self.widen_step;
                window[1] += self.widen_step;
                continue;
            }

            let refs: Vec<&RentalListing> =
                candidates.iter().map(|&i| &self.listings[i]).collect();
            let probabilities = selection_probabilities(&refs, &self.weights)?;
            let draw = WeightedIndex::new(&probabilities)
                .map_err(|e| SimError::Validation(format!("selection weights degenerate: {e}")))?;
            return Ok(candidates[draw.sample(rng)]);
        }

        Err(SimError::NoEligibleHousing {
            income: annual_income,
            rounds: self.max_widen_rounds,
        })
    }
}
