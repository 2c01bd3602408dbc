//! # Geographic Utilities
//!
//! Geometric helpers for GPS tracks. None of these filter samples; see
//! [`crate::track`] for the quality-aware distance.
//!
//! | Function | Description |
//! |----------|-------------|
//! | [`haversine`] | Great-circle distance between two points |
//! | [`path_length`] | Raw length of a point sequence, no filtering |
//! | [`track_bounds`] | Bounding box of a track (for map fitting) |
//! | [`track_center`] | Centroid of a track |
//!
//! ## Example
//!
//! ```rust
//! use fieldtrack::{GeoPoint, geo_utils};
//!
//! let depot = GeoPoint::new(46.0569, 14.5058);
//! let site = GeoPoint::new(46.0600, 14.5100);
//!
//! let dist = geo_utils::haversine(&depot, &site);
//! println!("Depot to site: {:.0}m", dist);
//! ```
//!
//! ## Algorithm Notes
//!
//! Distances use the haversine formula on a sphere of radius 6,371,000 m.
//! Coordinates are WGS84 degrees.

use geo::{BoundingRect, Coord, LineString};

use crate::{Bounds, GeoPoint, TrackPoint};

/// Mean Earth radius used for all distances, in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

// =============================================================================
// Distance Functions
// =============================================================================

/// Great-circle distance between two points in meters.
///
/// Pure geometry: no accuracy, speed or noise filtering.
///
/// # Example
///
/// ```rust
/// use fieldtrack::{GeoPoint, geo_utils};
///
/// let a = GeoPoint::new(45.0, 14.0);
/// let b = GeoPoint::new(46.0, 14.0);
///
/// let d = geo_utils::haversine(&a, &b);
/// assert!((d - 111_195.0).abs() < 100.0); // one degree of latitude
/// ```
#[inline]
pub fn haversine(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lng = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

/// Raw length of a point sequence in meters.
///
/// Sums the haversine distance between consecutive points without dropping any
/// pair. Empty or single-point input returns 0.0.
pub fn path_length(points: &[TrackPoint]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }

    points
        .windows(2)
        .map(|w| haversine(&w[0].position(), &w[1].position()))
        .sum()
}

// =============================================================================
// Bounding Box / Center
// =============================================================================

/// Bounding box of a track, or `None` for an empty track.
///
/// ```rust
/// use fieldtrack::{TrackPoint, geo_utils};
///
/// let track = vec![
///     TrackPoint::new(46.05, 14.50, 0),
///     TrackPoint::new(46.06, 14.49, 60_000),
/// ];
///
/// let bounds = geo_utils::track_bounds(&track).unwrap();
/// assert_eq!(bounds.min_lat, 46.05);
/// assert_eq!(bounds.max_lng, 14.50);
/// ```
pub fn track_bounds(points: &[TrackPoint]) -> Option<Bounds> {
    let line: LineString<f64> = points
        .iter()
        .map(|p| Coord { x: p.longitude, y: p.latitude })
        .collect();

    let rect = line.bounding_rect()?;
    Some(Bounds {
        min_lat: rect.min().y,
        max_lat: rect.max().y,
        min_lng: rect.min().x,
        max_lng: rect.max().x,
    })
}

/// Arithmetic mean of all positions. Returns `None` for an empty track.
///
/// Simple averaging; fine for the few kilometers a working day covers.
pub fn track_center(points: &[TrackPoint]) -> Option<GeoPoint> {
    if points.is_empty() {
        return None;
    }

    let n = points.len() as f64;
    let sum_lat: f64 = points.iter().map(|p| p.latitude).sum();
    let sum_lng: f64 = points.iter().map(|p| p.longitude).sum();

    Some(GeoPoint::new(sum_lat / n, sum_lng / n))
}

// =============================================================================
// Unit Tests
// =============================================================================
