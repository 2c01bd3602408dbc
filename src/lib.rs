//! # FieldTrack Core
//!
//! Billing/overtime computation and GPS track filtering for field-service tracking.
//!
//! This library provides:
//! - A billing engine that turns categorized work minutes into payable minutes
//! - Daily overtime classification and `"HH:MM"` time parsing feeding it
//! - A GPS ingestion filter and quality-aware travelled distance
//! - A caller-owned journal of daily tracks with retention cleanup
//!
//! Everything is synchronous and side-effect free apart from the values the
//! caller owns. Persistence, sensors and UI live in the host app.
//!
//! ## Features
//!
//! - **`serde`** - Serialize/deserialize configs, buckets and tracks; partial JSON
//!   merges with defaults
//! - **`ffi`** - Enable FFI bindings for mobile platforms (iOS/Android)
//! - **`full`** - Enable all features
//!
//! ## Quick Start
//!
//! ```rust
//! use fieldtrack::{
//!     compute_billing_totals, format_hm, DailyTrack, RateTable, TrackConfig, TrackPoint,
//! };
//! use fieldtrack::overtime::{classify_day, DayKind, OvertimePolicy};
//! use chrono::NaiveDate;
//!
//! // Billing: a 10 hour weekday
//! let buckets = classify_day(600, DayKind::Weekday, &OvertimePolicy::default());
//! let totals = compute_billing_totals(&buckets, &RateTable::default(), None);
//! println!("Payable: {}", format_hm(totals.payable_min));
//!
//! // Tracking: feed samples through the filter
//! let config = TrackConfig::default();
//! let mut track = DailyTrack::new(NaiveDate::from_ymd_opt(2024, 5, 6).unwrap());
//! track.append(TrackPoint::new(46.0500, 14.5000, 0), &config);
//! track.append(TrackPoint::new(46.0520, 14.5000, 60_000), &config);
//! println!("Driven: {:.0}m", track.distance_m());
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{Error, Result};

pub mod geo_utils;

// Billing engine and its inputs
pub mod billing;
pub use billing::{
    compute_billing_totals, format_hm, format_hm_dec, format_hm_dec_default,
    BillingTotals, Category, CategoryResult, RateTable, WorkBuckets,
};

pub mod clock;
pub mod overtime;

// Track filter and daily tracks
pub mod track;
pub use track::{
    distance_meters, evaluate_candidate, DailyTrack, FilterDecision, RejectReason, TrackConfig,
};

pub mod journal;
pub use journal::TrackJournal;

#[cfg(feature = "ffi")]
uniffi::setup_scaffolding!();

/// Initialize logging for Android (only used in FFI)
#[cfg(all(feature = "ffi", target_os = "android"))]
fn init_logging() {
    use android_logger::Config;
    use log::LevelFilter;

    android_logger::init_once(
        Config::default()
            .with_max_level(LevelFilter::Debug)
            .with_tag("FieldTrackRust")
    );
}

#[cfg(all(feature = "ffi", not(target_os = "android")))]
fn init_logging() {
    // No-op on non-Android platforms
}

// ============================================================================
// Core Types
// ============================================================================

/// A geographic position in WGS84 degrees.
///
/// # Example
/// ```
/// use fieldtrack::GeoPoint;
/// let point = GeoPoint::new(46.0569, 14.5058); // Ljubljana
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Check if the point has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl From<GeoPoint> for geo::Point<f64> {
    fn from(p: GeoPoint) -> Self {
        geo::Point::new(p.longitude, p.latitude)
    }
}

/// A location sample as delivered by the device.
///
/// Immutable once created; `accuracy_meters` is `None` when the sensor did not
/// report one, and such samples pass every accuracy check.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TrackPoint {
    pub latitude: f64,
    pub longitude: f64,
    /// Unix time in milliseconds
    pub epoch_millis: i64,
    /// Horizontal accuracy radius in meters
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub accuracy_meters: Option<f64>,
}

impl TrackPoint {
    pub fn new(latitude: f64, longitude: f64, epoch_millis: i64) -> Self {
        Self {
            latitude,
            longitude,
            epoch_millis,
            accuracy_meters: None,
        }
    }

    pub fn with_accuracy(mut self, accuracy_meters: f64) -> Self {
        self.accuracy_meters = Some(accuracy_meters);
        self
    }

    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// Bounding box of a track.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl Bounds {
    /// Get the center point of the bounds.
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lng + self.max_lng) / 2.0,
        )
    }
}

/// Great-circle distance in meters between two positions.
///
/// Shorthand for [`geo_utils::haversine`].
pub fn haversine(a: &GeoPoint, b: &GeoPoint) -> f64 {
    geo_utils::haversine(a, b)
}

// ============================================================================
// FFI Exports (only when feature enabled)
// ============================================================================

#[cfg(feature = "ffi")]
mod ffi {
    use super::*;
    use log::{debug, info};

    /// Compute billing totals from buckets and rates.
    #[uniffi::export]
    pub fn ffi_compute_billing_totals(
        buckets: WorkBuckets,
        rates: RateTable,
        rounding_step_min: Option<u32>,
    ) -> BillingTotals {
        init_logging();
        let totals = compute_billing_totals(&buckets, &rates, rounding_step_min);
        info!(
            "[FieldTrackRust] billing: base={} premium={} payable={}",
            totals.base_min, totals.premium_min, totals.payable_min
        );
        totals
    }

    #[uniffi::export]
    pub fn ffi_format_hm(minutes: i64) -> String {
        format_hm(minutes)
    }

    #[uniffi::export]
    pub fn ffi_format_hm_dec(minutes: i64, decimals: u32) -> String {
        format_hm_dec(minutes, decimals as usize)
    }

    /// Filtered travelled distance over accepted points.
    #[uniffi::export]
    pub fn ffi_distance_meters(points: Vec<TrackPoint>) -> f64 {
        init_logging();
        let distance = distance_meters(&points);
        debug!("[FieldTrackRust] distance over {} points: {:.0}m", points.len(), distance);
        distance
    }

    #[uniffi::export]
    pub fn ffi_haversine(a: GeoPoint, b: GeoPoint) -> f64 {
        haversine(&a, &b)
    }

    /// Ingestion decision for a new sample against the last accepted one.
    #[uniffi::export]
    pub fn ffi_evaluate_candidate(
        candidate: TrackPoint,
        last_accepted: Option<TrackPoint>,
        config: TrackConfig,
    ) -> FilterDecision {
        init_logging();
        let decision = evaluate_candidate(&candidate, last_accepted.as_ref(), &config);
        debug!("[FieldTrackRust] candidate at {}: {:?}", candidate.epoch_millis, decision);
        decision
    }

    /// Bounds of a track for map fitting, if it has any points.
    #[uniffi::export]
    pub fn ffi_track_bounds(points: Vec<TrackPoint>) -> Option<Bounds> {
        geo_utils::track_bounds(&points)
    }

    #[uniffi::export]
    pub fn ffi_parse_hhmm(value: String) -> std::result::Result<u32, Error> {
        clock::parse_hhmm(&value)
    }

    #[uniffi::export]
    pub fn ffi_span_minutes(start: String, end: String) -> std::result::Result<u32, Error> {
        clock::span_minutes(&start, &end)
    }

    #[uniffi::export]
    pub fn ffi_classify_day(
        worked_min: u32,
        kind: overtime::DayKind,
        policy: overtime::OvertimePolicy,
    ) -> WorkBuckets {
        overtime::classify_day(worked_min, kind, &policy)
    }

    /// Get default track filter configuration.
    #[uniffi::export]
    pub fn default_track_config() -> TrackConfig {
        init_logging();
        info!("[FieldTrackRust] default_track_config called - Rust is active!");
        TrackConfig::default()
    }

    #[uniffi::export]
    pub fn default_rate_table() -> RateTable {
        RateTable::default()
    }

    #[uniffi::export]
    pub fn default_overtime_policy() -> overtime::OvertimePolicy {
        overtime::OvertimePolicy::default()
    }
}

// ============================================================================
// Tests
// ============================================================================
