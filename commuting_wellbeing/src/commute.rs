//! Daily commute-mode decision under rain
//!
//! On a rainy workday the resident compares the extra fare of switching to
//! driving against the earnings forfeited by sitting in slowed transit, and
//! takes whichever mode costs less that day. Fare and time losses are priced
//! in the same currency through an hourly wage floored at the minimum wage.

use crate::housing::RentalListing;

const MINUTES_PER_HOUR: f64 = 60.0;

/// Incremental cost of one day's commute relative to a dry day.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DayOutcome {
    /// Extra money spent on the chosen mode
    pub cost_added: f64,
    /// Earnings forfeited to extra travel time
    pub income_lost: f64,
    /// Extra minutes travelled
    pub time_added: f64,
    /// Extra distance travelled
    pub distance_added: f64,
}

impl DayOutcome {
    /// Monetary loss the day adds to the resident's asset track.
    pub fn asset_loss(&self) -> f64 {
        self.cost_added + self.income_lost
    }
}

/// Decide the commute for one resident on one day.
///
/// Rest days and days whose attenuation reaches 1 (traffic at full speed)
/// contribute nothing. On a rain-slowed workday the resident switches to
/// driving exactly when the slowdown-inflated fare difference undercuts the
/// income that slowed transit would forfeit. Deterministic in its inputs.
pub fn decide(
    attenuation: f64,
    workday: bool,
    listing: &RentalListing,
    hourly_income: f64,
    wage_floor: f64,
) -> DayOutcome {
    if !workday || attenuation >= 1.0 {
        return DayOutcome::default();
    }

    let wage = hourly_income.max(wage_floor);
    let fare_added = (listing.driving_fare - listing.transit_fare) / attenuation;
    let transit_income_loss = (1.0 / attenuation) * wage
        * (listing.transit_time - listing.driving_time)
        / MINUTES_PER_HOUR;

    if fare_added <= transit_income_loss {
        // Drive: pay the inflated fare difference; time only counts against
        // the resident when slowed driving still exceeds the usual transit trip.
        DayOutcome {
            cost_added: fare_added,
            income_lost: (listing.driving_time / attenuation - listing.transit_time).max(0.0)
                / MINUTES_PER_HOUR
                * wage,
            time_added: listing.driving_time / attenuation - listing.transit_time,
            distance_added: listing.driving_distance - listing.transit_distance,
        }
    } else {
        // Stay on transit, slowed by rain.
        DayOutcome {
            cost_added: 0.0,
            income_lost: listing.transit_time / (MINUTES_PER_HOUR * attenuation) * wage,
            time_added: listing.transit_time * (1.0 / attenuation - 1.0),
            distance_added: 0.0,
        }
    }
}
