//! Caller-owned collection of daily tracks.
//!
//! A [`TrackJournal`] holds the filter configuration together with one
//! [`DailyTrack`] per local calendar day. Incoming samples are routed to their day
//! and run through the ingestion filter there; the persistence of the journal is
//! up to the owner.

use std::collections::BTreeMap;

use chrono::{DateTime, Days, FixedOffset, NaiveDate};
use log::{debug, info, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::track::{DailyTrack, FilterDecision, TrackConfig};
use crate::TrackPoint;

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrackJournal {
    config: TrackConfig,
    days: BTreeMap<NaiveDate, DailyTrack>,
}

impl TrackJournal {
    pub fn new(config: TrackConfig) -> Self {
        Self {
            config,
            days: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> &TrackConfig {
        &self.config
    }

    /// Replace the filter configuration. Already accepted points are kept.
    pub fn set_config(&mut self, config: TrackConfig) {
        self.config = config;
    }

    /// Local calendar date of a sample for the given UTC offset.
    pub fn local_date(point: &TrackPoint, offset: FixedOffset) -> Option<NaiveDate> {
        DateTime::from_timestamp_millis(point.epoch_millis)
            .map(|utc| utc.with_timezone(&offset).date_naive())
    }

    /// Route a sample to its local day and run it through that day's filter.
    ///
    /// Fails only when the timestamp is outside the range chrono can place on a
    /// calendar day.
    pub fn record(&mut self, point: TrackPoint, offset: FixedOffset) -> Result<FilterDecision> {
        let date = Self::local_date(&point, offset).ok_or_else(|| {
            warn!("[Journal] dropping point with unrepresentable timestamp {}", point.epoch_millis);
            Error::InvalidTimestamp(point.epoch_millis)
        })?;

        let config = self.config;
        let decision = self
            .days
            .entry(date)
            .or_insert_with(|| {
                debug!("[Journal] starting track for {}", date);
                DailyTrack::new(date)
            })
            .append(point, &config);

        Ok(decision)
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DailyTrack> {
        self.days.get(&date)
    }

    /// All days, oldest first.
    pub fn days(&self) -> impl Iterator<Item = &DailyTrack> {
        self.days.values()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Filtered distance summed over every stored day.
    pub fn total_distance_m(&self) -> f64 {
        self.days.values().fold(0.0, |total, d| total + d.distance_m())
    }

    /// Remove days older than `auto_cleanup_days` before `today`.
    ///
    /// A day exactly `auto_cleanup_days` old is kept. Returns the number of days
    /// removed.
    pub fn cleanup(&mut self, today: NaiveDate) -> usize {
        let retention = Days::new(u64::from(self.config.auto_cleanup_days));
        let Some(cutoff) = today.checked_sub_days(retention) else {
            return 0;
        };

        let before = self.days.len();
        self.days = self.days.split_off(&cutoff);
        let removed = before - self.days.len();

        if removed > 0 {
            info!("[Journal] removed {} day(s) older than {}", removed, cutoff);
        }
        removed
    }
}
