//! Data types produced by the aggregation pipeline.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Average wait for one hour-of-day of a single ride.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlySummary {
    pub hour: u32,
    pub label: String,
    pub avg_wait: u32,
}

/// Display-ready summary of one ride across the whole upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RideSummary {
    pub name: String,
    pub available: bool,
    /// Observed hours only, strictly ascending.
    #[serde(rename = "hourlyData")]
    pub hourly: Vec<HourlySummary>,
    /// Position in `hourly` of the aggregation-time hour. Serialized as `-1`
    /// when no bucket matches.
    #[serde(
        serialize_with = "serialize_index",
        deserialize_with = "deserialize_index"
    )]
    pub current_hour_index: Option<usize>,
}

impl RideSummary {
    /// The hourly entry the current-hour pointer refers to.
    pub fn current_hour(&self) -> Option<&HourlySummary> {
        self.current_hour_index.and_then(|i| self.hourly.get(i))
    }
}

fn serialize_index<S: Serializer>(index: &Option<usize>, s: S) -> Result<S::Ok, S::Error> {
    match index {
        Some(i) => s.serialize_i64(*i as i64),
        None => s.serialize_i64(-1),
    }
}

fn deserialize_index<'de, D: Deserializer<'de>>(d: D) -> Result<Option<usize>, D::Error> {
    let raw = i64::deserialize(d)?;
    Ok(usize::try_from(raw).ok())
}
