//! # Track Filter
//!
//! Quality filtering for GPS samples and the distance travelled along a day's track.
//!
//! Two filters live here and they are deliberately different:
//!
//! - [`evaluate_candidate`] runs at ingestion and decides whether a new sample is
//!   kept at all. Its thresholds come from [`TrackConfig`].
//! - [`distance_meters`] runs over already accepted points and uses fixed
//!   thresholds (accuracy 50 m, noise 5 m, speed 50 m/s) when summing segments.
//!
//! ## Example
//!
//! ```rust
//! use fieldtrack::{DailyTrack, TrackConfig, TrackPoint};
//! use chrono::NaiveDate;
//!
//! let config = TrackConfig::default();
//! let mut track = DailyTrack::new(NaiveDate::from_ymd_opt(2024, 5, 6).unwrap());
//!
//! track.append(TrackPoint::new(46.0500, 14.5000, 0).with_accuracy(8.0), &config);
//! track.append(TrackPoint::new(46.0510, 14.5000, 30_000).with_accuracy(8.0), &config);
//!
//! assert_eq!(track.points().len(), 2);
//! assert!(track.distance_m() > 100.0);
//! ```

use chrono::NaiveDate;
use log::{debug, trace};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geo_utils::haversine;
use crate::TrackPoint;

/// Samples less accurate than this never contribute distance.
const DISTANCE_MAX_ACCURACY_M: f64 = 50.0;
/// Segments shorter than this are treated as GPS jitter.
const DISTANCE_MIN_SEGMENT_M: f64 = 5.0;
/// ~180 km/h; anything faster is a position jump.
const DISTANCE_MAX_SPEED_MS: f64 = 50.0;

// =============================================================================
// Configuration
// =============================================================================

/// Thresholds for accepting a new sample into a track.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct TrackConfig {
    /// Samples closer in time than this are dropped if they are also within
    /// `min_distance_m`. Default: 10000 ms
    pub min_interval_ms: i64,
    /// Default: 25.0 meters
    pub min_distance_m: f64,
    /// Samples with a worse reported accuracy are dropped. Default: 50.0 meters
    pub max_accuracy_m: f64,
    /// Segments shorter than this count as the same location. Default: 5.0 meters
    pub min_segment_m: f64,
    /// Segments implying a higher speed are outliers. Default: 50.0 m/s
    pub max_speed_ms: f64,
    /// Daily tracks older than this many days are removed by
    /// [`crate::TrackJournal::cleanup`]. Default: 60
    pub auto_cleanup_days: u32,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: 10_000,
            min_distance_m: 25.0,
            max_accuracy_m: 50.0,
            min_segment_m: 5.0,
            max_speed_ms: 50.0,
            auto_cleanup_days: 60,
        }
    }
}

impl TrackConfig {
    /// Reject NaN and negative thresholds.
    pub fn validate(&self) -> Result<()> {
        if self.min_interval_ms < 0 {
            return Err(Error::InvalidConfig(format!(
                "minIntervalMs must be >= 0, got {}",
                self.min_interval_ms
            )));
        }

        let thresholds = [
            ("minDistanceM", self.min_distance_m),
            ("maxAccuracyM", self.max_accuracy_m),
            ("minSegmentM", self.min_segment_m),
            ("maxSpeedMs", self.max_speed_ms),
        ];
        for (name, value) in thresholds {
            if value.is_nan() || value < 0.0 {
                return Err(Error::InvalidConfig(format!("{name} must be >= 0, got {value}")));
            }
        }

        Ok(())
    }

    /// Parse a (possibly partial) JSON config and validate it.
    ///
    /// Missing keys keep their defaults.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self> {
        let config: TrackConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

// =============================================================================
// Ingestion Filter
// =============================================================================

/// Why a sample was not added to a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Enum))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RejectReason {
    /// Latitude/longitude not finite or outside WGS84 range
    InvalidCoordinates,
    /// Within `min_interval_ms` and within `min_distance_m` of the last point
    TooSoonAndTooClose,
    /// Reported accuracy worse than `max_accuracy_m`
    PoorAccuracy,
    /// Closer than `min_segment_m` to the last point
    SameLocation,
    /// Implied speed above `max_speed_ms`
    SpeedOutlier,
}

/// Outcome of running a sample through the ingestion filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Enum))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FilterDecision {
    Accept,
    Reject { reason: RejectReason },
}

impl FilterDecision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, FilterDecision::Accept)
    }
}

/// Decide whether `candidate` may follow `last_accepted` in a track.
///
/// `last_accepted` must be the last point that was *kept*, not the last raw sample.
/// The checks, in order:
///
/// 1. NaN or out-of-range coordinates → [`RejectReason::InvalidCoordinates`]
/// 2. too soon **and** too close → [`RejectReason::TooSoonAndTooClose`]
/// 3. accuracy worse than allowed → [`RejectReason::PoorAccuracy`]
/// 4. same location → [`RejectReason::SameLocation`]
/// 5. implausible speed → [`RejectReason::SpeedOutlier`]
///
/// With no previous point only the coordinate and accuracy checks apply.
///
/// # Example
///
/// ```rust
/// use fieldtrack::{evaluate_candidate, FilterDecision, RejectReason, TrackConfig, TrackPoint};
///
/// let config = TrackConfig::default();
/// let last = TrackPoint::new(46.0500, 14.5000, 0);
/// // 11 m away, 3 s later
/// let next = TrackPoint::new(46.0501, 14.5000, 3_000);
///
/// assert_eq!(
///     evaluate_candidate(&next, Some(&last), &config),
///     FilterDecision::Reject { reason: RejectReason::TooSoonAndTooClose }
/// );
/// ```
pub fn evaluate_candidate(
    candidate: &TrackPoint,
    last_accepted: Option<&TrackPoint>,
    config: &TrackConfig,
) -> FilterDecision {
    if !candidate.position().is_valid() {
        return FilterDecision::Reject { reason: RejectReason::InvalidCoordinates };
    }

    let segment = last_accepted.map(|last| {
        let time_delta_ms = candidate.epoch_millis - last.epoch_millis;
        let distance = haversine(&last.position(), &candidate.position());
        let dt_seconds = (time_delta_ms as f64 / 1000.0).max(1.0);
        (time_delta_ms, distance, distance / dt_seconds)
    });

    if let Some((time_delta_ms, distance, _)) = segment {
        if time_delta_ms < config.min_interval_ms && distance < config.min_distance_m {
            return FilterDecision::Reject { reason: RejectReason::TooSoonAndTooClose };
        }
    }

    if candidate
        .accuracy_meters
        .is_some_and(|acc| acc > config.max_accuracy_m)
    {
        return FilterDecision::Reject { reason: RejectReason::PoorAccuracy };
    }

    if let Some((_, distance, speed)) = segment {
        if distance < config.min_segment_m {
            return FilterDecision::Reject { reason: RejectReason::SameLocation };
        }
        if speed > config.max_speed_ms {
            return FilterDecision::Reject { reason: RejectReason::SpeedOutlier };
        }
    }

    FilterDecision::Accept
}

// =============================================================================
// Distance
// =============================================================================

/// Distance travelled along a sequence of points, in meters.
///
/// For every consecutive pair the segment is skipped when the later point's
/// accuracy is worse than 50 m, when the segment is shorter than 5 m, or when it
/// implies more than 50 m/s (elapsed time is floored at one second). Points must
/// be in time order; they are not sorted here.
///
/// Empty or single-point input returns 0.0.
pub fn distance_meters(points: &[TrackPoint]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }

    points
        .windows(2)
        .map(|w| segment_distance(&w[0], &w[1]))
        .sum()
}

/// Contribution of one segment to [`distance_meters`].
fn segment_distance(prev: &TrackPoint, curr: &TrackPoint) -> f64 {
    if curr
        .accuracy_meters
        .is_some_and(|acc| acc > DISTANCE_MAX_ACCURACY_M)
    {
        return 0.0;
    }

    let distance = haversine(&prev.position(), &curr.position());
    if distance < DISTANCE_MIN_SEGMENT_M {
        return 0.0;
    }

    let elapsed_s = ((curr.epoch_millis - prev.epoch_millis) as f64 / 1000.0).max(1.0);
    if distance / elapsed_s > DISTANCE_MAX_SPEED_MS {
        return 0.0;
    }

    distance
}

// =============================================================================
// Daily Track
// =============================================================================

/// Accepted points for one local calendar day plus their filtered distance.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct DailyTrack {
    date: NaiveDate,
    points: Vec<TrackPoint>,
    distance_m: f64,
}

impl DailyTrack {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            points: Vec::new(),
            distance_m: 0.0,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn points(&self) -> &[TrackPoint] {
        &self.points
    }

    pub fn last_point(&self) -> Option<&TrackPoint> {
        self.points.last()
    }

    /// Cached result of [`distance_meters`] over all accepted points.
    pub fn distance_m(&self) -> f64 {
        self.distance_m
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Run `candidate` through the ingestion filter and keep it if accepted.
    ///
    /// On acceptance the cumulative distance is recomputed over the whole track.
    /// A rejected point leaves the track untouched.
    pub fn append(&mut self, candidate: TrackPoint, config: &TrackConfig) -> FilterDecision {
        let decision = evaluate_candidate(&candidate, self.points.last(), config);

        match decision {
            FilterDecision::Accept => {
                self.points.push(candidate);
                self.distance_m = distance_meters(&self.points);
                trace!(
                    "[Track] {} accepted point #{} ({:.0}m total)",
                    self.date,
                    self.points.len(),
                    self.distance_m
                );
            }
            FilterDecision::Reject { reason } => {
                debug!("[Track] {} rejected point at {}: {:?}", self.date, candidate.epoch_millis, reason);
            }
        }

        decision
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ~0.0001 degrees of latitude is ~11.1 m
    const LAT_STEP_11M: f64 = 0.0001;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 6).unwrap()
    }

    fn point(lat_steps: f64, t_ms: i64) -> TrackPoint {
        TrackPoint::new(46.05 + lat_steps * LAT_STEP_11M, 14.50, t_ms)
    }

    #[test]
    fn test_distance_empty_and_single() {
        assert_eq!(distance_meters(&[]), 0.0);
        assert_eq!(distance_meters(&[point(0.0, 0)]), 0.0);
        // Positive zero, so "{:.0}" never renders "-0"
        assert!(distance_meters(&[]).is_sign_positive());
        assert_eq!(format!("{:.0}", distance_meters(&[point(0.0, 0)])), "0");
        assert_eq!(format!("{:.0}", DailyTrack::new(day()).distance_m()), "0");
    }

    #[test]
    fn test_distance_sums_valid_segments() {
        let track = vec![point(0.0, 0), point(10.0, 20_000), point(20.0, 40_000)];
        let d = distance_meters(&track);
        assert!((d - 222.4).abs() < 1.0, "got {d}");
    }

    #[test]
    fn test_distance_skips_inaccurate_point() {
        let track = vec![
            point(0.0, 0),
            point(10.0, 20_000).with_accuracy(80.0),
            point(20.0, 40_000).with_accuracy(10.0),
        ];
        // Only the second segment counts
        let d = distance_meters(&track);
        assert!((d - 111.2).abs() < 1.0, "got {d}");
    }

    #[test]
    fn test_distance_skips_micro_movement() {
        let track = vec![point(0.0, 0), point(0.3, 10_000)];
        assert_eq!(distance_meters(&track), 0.0);
    }

    #[test]
    fn test_distance_skips_speed_outlier() {
        // ~1.1 km in 2 s
        let track = vec![point(0.0, 0), point(100.0, 2_000), point(110.0, 30_000)];
        let d = distance_meters(&track);
        assert!((d - 111.2).abs() < 1.0, "got {d}");
    }

    #[test]
    fn test_distance_elapsed_floored_at_one_second() {
        // 40 m with identical timestamps: 40 m/s over the 1 s floor, still plausible
        let track = vec![point(0.0, 5_000), point(3.6, 5_000)];
        assert!(distance_meters(&track) > 39.0);
    }

    #[test]
    fn test_first_point_always_accepted_if_accurate() {
        let config = TrackConfig::default();
        assert_eq!(evaluate_candidate(&point(0.0, 0), None, &config), FilterDecision::Accept);
        assert_eq!(
            evaluate_candidate(&point(0.0, 0).with_accuracy(120.0), None, &config),
            FilterDecision::Reject { reason: RejectReason::PoorAccuracy }
        );
    }

    #[test]
    fn test_rejects_invalid_coordinates() {
        let config = TrackConfig::default();
        let last = point(0.0, 0);
        let invalid = [
            TrackPoint::new(f64::NAN, 14.5, 60_000),
            TrackPoint::new(46.05, f64::INFINITY, 60_000),
            TrackPoint::new(91.0, 14.5, 60_000),
            TrackPoint::new(46.05, -181.0, 60_000),
        ];
        for candidate in invalid {
            assert_eq!(
                evaluate_candidate(&candidate, Some(&last), &config),
                FilterDecision::Reject { reason: RejectReason::InvalidCoordinates }
            );
            assert_eq!(
                evaluate_candidate(&candidate, None, &config),
                FilterDecision::Reject { reason: RejectReason::InvalidCoordinates }
            );
        }

        let mut track = DailyTrack::new(day());
        track.append(last, &config);
        track.append(TrackPoint::new(f64::NAN, 14.5, 60_000), &config);
        assert_eq!(track.points().len(), 1);
    }

    #[test]
    fn test_rejects_near_duplicate() {
        let config = TrackConfig::default();
        let decision = evaluate_candidate(&point(1.0, 3_000), Some(&point(0.0, 0)), &config);
        assert_eq!(decision, FilterDecision::Reject { reason: RejectReason::TooSoonAndTooClose });
    }

    #[test]
    fn test_soon_but_far_is_not_near_duplicate() {
        let config = TrackConfig::default();
        // 33 m in 3 s
        let decision = evaluate_candidate(&point(3.0, 3_000), Some(&point(0.0, 0)), &config);
        assert_eq!(decision, FilterDecision::Accept);
    }

    #[test]
    fn test_rejects_same_location_after_interval() {
        let config = TrackConfig::default();
        // ~2 m after a minute
        let decision = evaluate_candidate(&point(0.2, 60_000), Some(&point(0.0, 0)), &config);
        assert_eq!(decision, FilterDecision::Reject { reason: RejectReason::SameLocation });
    }

    #[test]
    fn test_rejects_speed_outlier() {
        let config = TrackConfig::default();
        // ~1.1 km in 11 s, ~100 m/s
        let decision = evaluate_candidate(&point(100.0, 11_000), Some(&point(0.0, 0)), &config);
        assert_eq!(decision, FilterDecision::Reject { reason: RejectReason::SpeedOutlier });
    }

    #[test]
    fn test_rejected_point_is_not_new_reference() {
        let config = TrackConfig::default();
        let mut track = DailyTrack::new(day());

        assert!(track.append(point(0.0, 0), &config).is_accepted());
        // Jump away and back: the jump is rejected
        assert!(!track.append(point(100.0, 11_000), &config).is_accepted());
        // Judged against the first point, not the rejected jump
        assert!(track.append(point(10.0, 30_000), &config).is_accepted());

        assert_eq!(track.points().len(), 2);
        assert_eq!(track.last_point().unwrap().epoch_millis, 30_000);
    }

    #[test]
    fn test_rejection_leaves_track_unchanged() {
        let config = TrackConfig::default();
        let mut track = DailyTrack::new(day());
        track.append(point(0.0, 0), &config);
        track.append(point(10.0, 20_000), &config);
        let before = track.clone();

        track.append(point(10.5, 21_000), &config);
        assert_eq!(track, before);
    }

    #[test]
    fn test_distance_non_decreasing_on_append() {
        let config = TrackConfig::default();
        let mut track = DailyTrack::new(day());
        let mut last = 0.0;

        for i in 0..20 {
            track.append(point(i as f64 * 5.0, i * 15_000), &config);
            assert!(track.distance_m() >= last);
            last = track.distance_m();
        }
        assert_eq!(track.points().len(), 20);
        assert!((track.distance_m() - distance_meters(track.points())).abs() < 1e-9);
    }

    #[test]
    fn test_validate_config() {
        assert!(TrackConfig::default().validate().is_ok());

        let bad = TrackConfig { max_speed_ms: -1.0, ..TrackConfig::default() };
        assert!(matches!(bad.validate(), Err(Error::InvalidConfig(_))));

        let nan = TrackConfig { min_segment_m: f64::NAN, ..TrackConfig::default() };
        assert!(nan.validate().is_err());

        let negative_interval = TrackConfig { min_interval_ms: -5, ..TrackConfig::default() };
        assert!(negative_interval.validate().is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_from_partial_json() {
        let config = TrackConfig::from_json(r#"{"maxSpeedMs": 30.0, "autoCleanupDays": 14}"#).unwrap();
        assert_eq!(config.max_speed_ms, 30.0);
        assert_eq!(config.auto_cleanup_days, 14);
        assert_eq!(config.min_interval_ms, 10_000);

        assert!(TrackConfig::from_json(r#"{"minDistanceM": -3}"#).is_err());
        assert!(TrackConfig::from_json("not json").is_err());
    }
}
