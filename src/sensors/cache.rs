use serde::{Deserialize, Serialize};

use super::types::{GeoSample, MotionSample, OrientationSample};

/// Last-known readings. Each sensor source owns its own fields, so updates
/// from different sources never overwrite each other. `None` means no sample
/// of that kind has arrived yet (or the cache was cleared).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Telemetry {
    pub motion: Option<MotionSample>,
    /// Force magnitude of `motion`, for the live gauge.
    pub impact_magnitude: Option<f64>,
    pub orientation: Option<OrientationSample>,
    pub geo: Option<GeoSample>,
}

#[derive(Debug, Default)]
pub struct TelemetryCache {
    latest: Telemetry,
}

impl TelemetryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_motion(&mut self, sample: MotionSample) {
        self.latest.impact_magnitude = Some(sample.magnitude());
        self.latest.motion = Some(sample);
    }

    pub fn update_orientation(&mut self, sample: OrientationSample) {
        self.latest.orientation = Some(sample);
    }

    pub fn update_geo(&mut self, sample: GeoSample) {
        self.latest.geo = Some(sample);
    }

    pub fn read(&self) -> Telemetry {
        self.latest
    }

    pub fn geo(&self) -> Option<&GeoSample> {
        self.latest.geo.as_ref()
    }

    /// Forget the geo fix, used when the location watch is torn down.
    pub fn clear_geo(&mut self) {
        self.latest.geo = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_before_first_sample() {
        let cache = TelemetryCache::new();
        assert_eq!(cache.read(), Telemetry::default());
        assert!(cache.geo().is_none());
    }

    #[test]
    fn last_write_wins_per_field() {
        let mut cache = TelemetryCache::new();
        cache.update_geo(GeoSample {
            lat: 1.0,
            long: 2.0,
            speed_kmh: 3.0,
        });
        cache.update_motion(MotionSample::new(3.0, 4.0, 0.0));
        cache.update_geo(GeoSample {
            lat: 5.0,
            long: 6.0,
            speed_kmh: 7.0,
        });

        let t = cache.read();
        assert_eq!(t.geo.map(|g| g.lat), Some(5.0));
        assert_eq!(t.impact_magnitude, Some(5.0));
        assert!(t.orientation.is_none());
    }
}
