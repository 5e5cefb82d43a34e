use serde::{ser::SerializeMap, Deserialize, Serialize, Serializer};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::{Predicate, TemperatureAggregate};

/// One row of the `measurement` table
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Measurement {
    pub station: String,
    /// ISO `YYYY-MM-DD`
    pub date: String,
    pub prcp: Option<f64>,
    pub tobs: f64,
}

/// One row of the `station` table, only the identifier is read
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Station {
    pub station: String,
}

/// Serialized as a single-key object: `{"2017-08-23": 0.08}`
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct PrecipitationReading {
    pub date: String,
    pub prcp: Option<f64>,
}

impl Serialize for PrecipitationReading {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.date, &self.prcp)?;
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, ToSchema)]
pub struct TemperatureObservation {
    #[schema(example = "2017-08-23")]
    pub date: String,
    pub tobs: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TemperatureStats {
    #[serde(rename = "TMIN")]
    pub tmin: f64,
    #[serde(rename = "TMAX")]
    pub tmax: f64,
    #[serde(rename = "TAVG")]
    pub tavg: f64,
}

impl TemperatureStats {
    /// `None` when the aggregate covered no rows
    pub fn from_aggregate(aggregate: TemperatureAggregate) -> Option<Self> {
        match aggregate {
            TemperatureAggregate {
                tmin: Some(tmin),
                tmax: Some(tmax),
                tavg: Some(tavg),
            } => Some(Self { tmin, tmax, tavg }),
            _ => None,
        }
    }
}

/// Dates of a temperature summary request, `end` is inclusive when present
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub start: String,
    pub end: Option<String>,
}

impl DateRange {
    pub fn starting(start: String) -> Self {
        Self { start, end: None }
    }

    pub fn between(start: String, end: String) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    pub fn predicates(&self) -> Vec<Predicate> {
        match &self.end {
            Some(end) => vec![Predicate::DateBetween(self.start.clone(), end.clone())],
            None => vec![Predicate::DateFrom(self.start.clone())],
        }
    }
}
