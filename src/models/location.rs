//! Location samples and the bounded rolling history used for
//! spoofing detection.

use serde::Serialize;
use std::collections::VecDeque;

/// How many samples the rolling history retains.
pub const HISTORY_CAPACITY: usize = 10;

/// A single position fix as reported by the platform.
/// Accuracy is advisory and may be missing; missing accuracy fails the
/// accuracy check (fail closed).
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct LocationSample {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy_m: Option<f64>,
    pub timestamp_ms: i64,
}

impl LocationSample {
    pub fn new(latitude: f64, longitude: f64, accuracy_m: Option<f64>, timestamp_ms: i64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy_m,
            timestamp_ms,
        }
    }
}

/// Bounded ring buffer of the most recent samples, oldest first.
#[derive(Debug, Clone, Default)]
pub struct LocationHistory {
    samples: VecDeque<LocationSample>,
}

impl LocationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sample, dropping the oldest one past capacity.
    pub fn push(&mut self, sample: LocationSample) {
        if self.samples.len() == HISTORY_CAPACITY {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn samples(&self) -> impl Iterator<Item = &LocationSample> {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
