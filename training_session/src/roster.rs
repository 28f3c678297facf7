//! Athletes known to the coach, keyed by identifier.

use std::{
    collections::BTreeMap,
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};

use time::{Date, macros::format_description};

use crate::Athlete;

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("failed to open roster {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read roster: {0}")]
    Csv(#[from] csv::Error),
    #[error("athlete `{id}` has invalid birthdate `{value}`")]
    InvalidBirthdate { id: String, value: String },
    #[error("athlete `{0}` is not in the roster")]
    UnknownAthlete(String),
    #[error("athlete `{id}`: {source}")]
    InvalidAge {
        id: String,
        #[source]
        source: heart_rate_zones::ZoneError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub name: String,
    pub birthdate: Date,
}

/// Source of the roster, e.g. a spreadsheet export or a database.
pub trait AthleteSource {
    fn list_athletes(&self) -> Result<BTreeMap<String, RosterEntry>, RosterError>;
}

#[derive(Debug, serde::Deserialize)]
struct RosterRow {
    id: String,
    name: String,
    birthdate: String,
}

/// Roster kept in a CSV file with `id,name,birthdate` columns.
///
/// Birthdates are `YYYY-MM-DD` or `DD/MM/YYYY`. The file is read again on
/// every call.
#[derive(Debug, Clone)]
pub struct CsvRoster {
    path: PathBuf,
}

impl CsvRoster {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AthleteSource for CsvRoster {
    fn list_athletes(&self) -> Result<BTreeMap<String, RosterEntry>, RosterError> {
        let file = File::open(&self.path).map_err(|source| RosterError::Open {
            path: self.path.clone(),
            source,
        })?;

        let athletes = parse_roster(file)?;

        tracing::debug!(
            path = %self.path.display(),
            athletes = athletes.len(),
            "roster loaded"
        );

        Ok(athletes)
    }
}

/// Roster held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticRoster(BTreeMap<String, RosterEntry>);

impl From<BTreeMap<String, RosterEntry>> for StaticRoster {
    fn from(value: BTreeMap<String, RosterEntry>) -> Self {
        Self(value)
    }
}

impl FromIterator<(String, RosterEntry)> for StaticRoster {
    fn from_iter<T: IntoIterator<Item = (String, RosterEntry)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl AthleteSource for StaticRoster {
    fn list_athletes(&self) -> Result<BTreeMap<String, RosterEntry>, RosterError> {
        Ok(self.0.clone())
    }
}

/// Parse roster rows. Later rows win on duplicate identifiers.
pub fn parse_roster(reader: impl Read) -> Result<BTreeMap<String, RosterEntry>, RosterError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut athletes = BTreeMap::new();

    for row in rdr.deserialize::<RosterRow>() {
        let RosterRow {
            id,
            name,
            birthdate,
        } = row?;

        let Some(birthdate) = parse_birthdate(&birthdate) else {
            return Err(RosterError::InvalidBirthdate {
                id,
                value: birthdate,
            });
        };

        athletes.insert(id, RosterEntry { name, birthdate });
    }

    Ok(athletes)
}

/// Parse `YYYY-MM-DD` or `DD/MM/YYYY`.
pub fn parse_birthdate(value: &str) -> Option<Date> {
    Date::parse(value, format_description!("[year]-[month]-[day]"))
        .or_else(|_| Date::parse(value, format_description!("[day]/[month]/[year]")))
        .ok()
}

/// Age in full years at `today`.
///
/// One year less than the difference of years while the birthday of the
/// current year is still ahead.
pub fn age_on(birthdate: Date, today: Date) -> u8 {
    let birthday_ahead =
        (u8::from(today.month()), today.day()) < (u8::from(birthdate.month()), birthdate.day());

    let years = today.year() - birthdate.year() - i32::from(birthday_ahead);

    u8::try_from(years.max(0)).unwrap_or(u8::MAX)
}

/// Find athlete by identifier and derive the age at `today`.
pub fn lookup_athlete(
    source: &impl AthleteSource,
    id: &str,
    today: Date,
) -> Result<Athlete, RosterError> {
    let athletes = source.list_athletes()?;

    let Some(RosterEntry { name, birthdate }) = athletes.get(id) else {
        return Err(RosterError::UnknownAthlete(id.to_owned()));
    };

    Athlete::new(name.clone(), age_on(*birthdate, today)).map_err(|source| {
        RosterError::InvalidAge {
            id: id.to_owned(),
            source,
        }
    })
}
