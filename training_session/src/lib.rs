//! # Training session
//!
//! Heart rate zone analysis of a single workout export: load the tracker
//! CSV, pick the athlete (typed in or from the roster) and build the zone
//! report with its charts.

use heart_rate_zones::{ZoneBoundaries, ZoneError, check_age, compute_f_max, compute_zones};

mod analysis;
#[cfg(feature = "charts")]
pub mod chart;
mod dashboard;
mod export;
mod roster;
mod summary;

pub use heart_rate_zones;

pub use self::analysis::*;
pub use self::dashboard::*;
pub use self::export::*;
pub use self::roster::*;
pub use self::summary::*;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Athlete {
    name: String,
    age: u8,
}

impl Athlete {
    /// # Params
    /// - `name` - display name, may be empty
    /// - `age` - age in years, `0 < age < 220`
    pub fn new(name: impl Into<String>, age: u8) -> Result<Self, ZoneError> {
        Ok(Self {
            name: name.into(),
            age: check_age(age)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn age(&self) -> u8 {
        self.age
    }

    pub const fn f_max(&self) -> u8 {
        compute_f_max(self.age)
    }

    pub fn zones(&self) -> ZoneBoundaries {
        compute_zones(self.f_max())
    }
}
