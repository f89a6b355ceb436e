//! Geofence evaluator: classify location samples against the active
//! geofence area, filter poor-accuracy fixes, and run the teleportation
//! heuristic over the rolling sample history.
//!
//! The spoofing check is best-effort anti-cheating, not a security
//! boundary: all inputs are client-reported.

use crate::models::geofence::GeofenceArea;
use crate::models::location::{LocationHistory, LocationSample};

/// Mean Earth radius, meters. Spherical model, no ellipsoidal correction.
pub const MEAN_EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two (lat, lon) points via the standard
/// haversine formula.
pub fn haversine_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);

    2.0 * MEAN_EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Distance from the sample to the area center, in meters.
pub fn distance_from_area(sample: &LocationSample, area: &GeofenceArea) -> f64 {
    haversine_m(
        sample.latitude,
        sample.longitude,
        area.latitude,
        area.longitude,
    )
}

/// Same distance, rounded to the nearest meter for display.
pub fn distance_from_area_rounded(sample: &LocationSample, area: &GeofenceArea) -> f64 {
    distance_from_area(sample, area).round()
}

/// Inside iff distance ≤ radius (boundary counts as inside).
pub fn is_within(sample: &LocationSample, area: &GeofenceArea) -> bool {
    distance_from_area(sample, area) <= area.radius_m
}

/// Accuracy gate: the reported accuracy radius must be present and no
/// larger than `max_m`. Missing accuracy fails closed.
pub fn accuracy_ok(sample: &LocationSample, max_m: f64) -> bool {
    match sample.accuracy_m {
        Some(acc) => acc <= max_m,
        None => false,
    }
}

/// Teleportation heuristic over the rolling history: flag when any
/// consecutive pair of samples implies a speed above `max_speed_mps`.
/// Zero or negative elapsed time counts as infinite speed.
pub fn detect_spoofing(history: &LocationHistory, max_speed_mps: f64) -> bool {
    let samples: Vec<&LocationSample> = history.samples().collect();

    for w in samples.windows(2) {
        let (a, b) = (w[0], w[1]);

        let elapsed_s = (b.timestamp_ms - a.timestamp_ms) as f64 / 1000.0;
        if elapsed_s <= 0.0 {
            return true;
        }

        let dist_m = haversine_m(a.latitude, a.longitude, b.latitude, b.longitude);
        if dist_m / elapsed_s > max_speed_mps {
            return true;
        }
    }

    false
}
