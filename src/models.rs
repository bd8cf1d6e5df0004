use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use thiserror::Error;

/// Number of characters in a VIN
pub const VIN_LENGTH: usize = 17;

/// Client-side validation failures. None of these ever reach the network.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("All fields are required")]
    RequiredFields,

    #[error("VIN must be 17 characters")]
    VinLength(usize),

    #[error("Year must be a number")]
    InvalidYear(String),
}

/// Reject any VIN that is not exactly 17 characters long
pub fn validate_vin(vin: &str) -> Result<(), ValidationError> {
    let len = vin.chars().count();
    if len != VIN_LENGTH {
        return Err(ValidationError::VinLength(len));
    }
    Ok(())
}

fn parse_year(year: &str) -> Result<i32, ValidationError> {
    year.trim()
        .parse()
        .map_err(|_| ValidationError::InvalidYear(year.to_string()))
}

/// Opaque record identifier assigned by the database service.
///
/// The service may hand back integers or strings (uuids); the original JSON
/// form is kept so the value can be sent back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl RecordId {
    /// Interpret user input: all-digit input becomes a number, anything else text
    pub fn parse(value: &str) -> Self {
        match value.parse::<i64>() {
            Ok(n) => RecordId::Number(n),
            Err(_) => RecordId::Text(value.to_string()),
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{}", n),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    pub id: RecordId,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

impl Owner {
    /// "First Last", skipping whichever half is missing
    pub fn display_name(&self) -> String {
        let first = self.first_name.as_deref().unwrap_or("");
        let last = self.last_name.as_deref().unwrap_or("");
        format!("{} {}", first, last).trim().to_string()
    }
}

/// Insert payload for the `cars` table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCar {
    pub year: i32,
    pub make: String,
    pub model: String,
    pub vin: String,
    pub owner_id: RecordId,
}

impl NewCar {
    /// Validate raw form values and build the insert payload.
    ///
    /// Presence is checked first so a form with any empty field always reports
    /// `RequiredFields`, regardless of what else is wrong with it.
    pub fn from_form(
        year: &str,
        make: &str,
        model: &str,
        vin: &str,
        owner: Option<&RecordId>,
    ) -> Result<Self, ValidationError> {
        let owner_id = match owner {
            Some(id) if !year.is_empty() && !make.is_empty() && !model.is_empty() && !vin.is_empty() => {
                id.clone()
            }
            _ => return Err(ValidationError::RequiredFields),
        };

        validate_vin(vin)?;
        let year = parse_year(year)?;

        Ok(Self {
            year,
            make: make.to_string(),
            model: model.to_string(),
            vin: vin.to_string(),
            owner_id,
        })
    }
}

/// A row from `cars`, with the owning record embedded when the join resolves
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CarRecord {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub make: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub vin: Option<String>,
    #[serde(default)]
    pub owner_id: Option<RecordId>,
    #[serde(default, rename = "owners")]
    pub owner: Option<Owner>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<NaiveDateTime>,
}

impl CarRecord {
    /// "2015 Honda Civic"
    pub fn headline(&self) -> String {
        let year = self.year.map(|y| y.to_string()).unwrap_or_default();
        format!(
            "{} {} {}",
            year,
            self.make.as_deref().unwrap_or(""),
            self.model.as_deref().unwrap_or("")
        )
        .trim()
        .to_string()
    }

    pub fn owner_name(&self) -> String {
        self.owner.as_ref().map(Owner::display_name).unwrap_or_default()
    }

    /// Creation time as "2024-05-01 12:34", when the row carries one
    pub fn added_on(&self) -> Option<String> {
        self.created_at.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
    }

    pub fn owner_field<'a>(&'a self, field: fn(&'a Owner) -> &'a Option<String>) -> &'a str {
        self.owner
            .as_ref()
            .and_then(|o| field(o).as_deref())
            .unwrap_or("")
    }
}

/// Accept either an RFC 3339 timestamp or a bare `timestamp` column; anything
/// else is dropped rather than failing the whole row.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.naive_utc())
            .or_else(|_| NaiveDateTime::parse_from_str(&s, "%Y-%m-%dT%H:%M:%S%.f"))
            .ok()
    }))
}

/// Filters for the car search. `None` imposes no constraint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarSearch {
    /// Case-insensitive substring of `make`
    pub make: Option<String>,
    /// Case-insensitive substring of `model`
    pub model: Option<String>,
    /// Exact model year
    pub year: Option<i32>,
}

impl CarSearch {
    /// Build a search from raw form values; empty strings mean "any"
    pub fn from_filters(make: &str, model: &str, year: &str) -> Result<Self, ValidationError> {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        let year = if year.is_empty() { None } else { Some(parse_year(year)?) };

        Ok(Self {
            make: non_empty(make),
            model: non_empty(model),
            year,
        })
    }

    pub fn is_unfiltered(&self) -> bool {
        self.make.is_none() && self.model.is_none() && self.year.is_none()
    }
}
