use crate::aggregator::label::hour_label;
use crate::aggregator::timestamp::{current_hour, hour_of_day};
use crate::aggregator::types::{HourlySummary, RideSummary};
use crate::aggregator::utility::{coerce_wait, collation_key, is_available, mean, round_minutes};
use crate::parser::RawRow;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Running state for one ride while rows are folded in.
#[derive(Default)]
struct RideAccumulator {
    available: bool,
    /// Wait samples per hour-of-day; unavailable observations contribute 0.
    buckets: BTreeMap<u32, Vec<f64>>,
}

impl RideAccumulator {
    fn push(&mut self, hour: u32, wait: f64, available: bool) {
        self.available |= available;
        self.buckets
            .entry(hour)
            .or_default()
            .push(if available { wait } else { 0.0 });
    }

    fn finish(self, name: String, now: u32) -> RideSummary {
        let hourly: Vec<HourlySummary> = self
            .buckets
            .into_iter()
            .map(|(hour, samples)| HourlySummary {
                hour,
                label: hour_label(hour),
                avg_wait: round_minutes(mean(&samples)),
            })
            .collect();

        let current_hour_index = hourly.iter().position(|h| h.hour == now);

        RideSummary {
            name,
            available: self.available,
            hourly,
            current_hour_index,
        }
    }
}

/// Reduces raw observations into one [`RideSummary`] per ride, sorted by name
/// ignoring case and accents, with byte order breaking ties.
///
/// Rows with a blank ride name or an unparseable timestamp are dropped.
/// A ride is available if any of its rows is. Every kept row adds one sample
/// to its hour bucket: the wait time when available, otherwise 0. Bucket
/// means are rounded half up. `now` is the hour-of-day the current-hour
/// pointer is resolved against.
pub fn aggregate(rows: &[RawRow], now: u32) -> Vec<RideSummary> {
    let mut rides: HashMap<String, RideAccumulator> = HashMap::new();
    let mut dropped = 0usize;

    for row in rows {
        let name = row.ride_name.trim();
        if name.is_empty() {
            dropped += 1;
            continue;
        }

        let wait = coerce_wait(&row.wait_time);
        let available = is_available(&row.availability);

        let Some(hour) = hour_of_day(&row.timestamp) else {
            dropped += 1;
            continue;
        };

        rides
            .entry(name.to_string())
            .or_default()
            .push(hour, wait, available);
    }

    debug!(
        rows = rows.len(),
        dropped,
        rides = rides.len(),
        now,
        "Aggregated ride observations"
    );

    let mut summaries: Vec<RideSummary> = rides
        .into_iter()
        .map(|(name, acc)| acc.finish(name, now))
        .collect();
    summaries.sort_by_cached_key(|r| (collation_key(&r.name), r.name.clone()));
    summaries
}

/// [`aggregate`] against the current local hour.
pub fn aggregate_now(rows: &[RawRow]) -> Vec<RideSummary> {
    aggregate(rows, current_hour())
}
