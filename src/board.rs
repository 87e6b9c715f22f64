//! Display-side state: the latest summaries plus manual availability overrides.
//!
//! Overrides sit on top of the aggregated output and are merged in when the
//! board is displayed. The aggregator never sees them and the stored
//! summaries are never mutated.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::aggregator::{RideSummary, aggregate};
use crate::parser::RawRow;

/// Ride name → forced availability.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailabilityOverrides {
    forced: HashMap<String, bool>,
}

impl AvailabilityOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, ride: &str, available: bool) {
        self.forced.insert(ride.to_string(), available);
    }

    pub fn get(&self, ride: &str) -> Option<bool> {
        self.forced.get(ride).copied()
    }

    pub fn clear(&mut self) {
        self.forced.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.forced.is_empty()
    }

    /// Copies of `rides` with forced availability applied. Hourly data is
    /// carried over untouched.
    pub fn apply(&self, rides: &[RideSummary]) -> Vec<RideSummary> {
        rides
            .iter()
            .map(|ride| match self.get(&ride.name) {
                Some(available) => RideSummary {
                    available,
                    ..ride.clone()
                },
                None => ride.clone(),
            })
            .collect()
    }
}

/// Parses a `NAME=BOOL` override argument.
pub fn parse_override(arg: &str) -> Result<(String, bool), String> {
    let (name, value) = arg
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=BOOL, got '{arg}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing ride name in '{arg}'"));
    }
    let available = match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "open" | "yes" => true,
        "false" | "0" | "closed" | "no" => false,
        other => return Err(format!("invalid availability '{other}' for '{name}'")),
    };
    Ok((name.to_string(), available))
}

/// Summaries of the most recent dataset together with the overrides
/// applied to them.
#[derive(Debug, Default)]
pub struct RideBoard {
    rides: Vec<RideSummary>,
    overrides: AvailabilityOverrides,
    loaded: bool,
}

impl RideBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the board with a fresh aggregation of `rows` and drops every
    /// override.
    pub fn load(&mut self, rows: &[RawRow], now: u32) {
        self.rides = aggregate(rows, now);
        self.overrides.clear();
        self.loaded = true;
        info!(rides = self.rides.len(), "Board loaded");
    }

    pub fn set_override(&mut self, ride: &str, available: bool) {
        debug!(ride, available, "Availability override set");
        self.overrides.set(ride, available);
    }

    pub fn overrides(&self) -> &AvailabilityOverrides {
        &self.overrides
    }

    /// Aggregated summaries without overrides.
    pub fn rides(&self) -> &[RideSummary] {
        &self.rides
    }

    /// Summaries as they should be shown, overrides applied.
    pub fn display(&self) -> Vec<RideSummary> {
        self.overrides.apply(&self.rides)
    }

    /// Whether any dataset has been loaded, even an empty one.
    pub fn has_data(&self) -> bool {
        self.loaded
    }
}
