use super::raw::{RawGeo, RawMotion, RawOrientation};
use super::types::{GeoSample, MotionSample, OrientationSample};

const MPS_TO_KMH: f64 = 3.6;

/// Missing or non-finite axis values count as zero.
fn axis(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Returns `None` when the callback carried no acceleration block at all.
/// Such a callback is skipped rather than turned into an at-rest sample.
pub fn normalize_motion(raw: &RawMotion) -> Option<MotionSample> {
    let v = raw.acceleration_including_gravity?;
    Some(MotionSample {
        x: axis(v.x),
        y: axis(v.y),
        z: axis(v.z),
    })
}

pub fn normalize_orientation(raw: &RawOrientation) -> OrientationSample {
    OrientationSample {
        alpha: axis(raw.alpha),
        beta: axis(raw.beta),
        gamma: axis(raw.gamma),
    }
}

/// Converts speed to km/h. When the platform reports no usable speed the
/// previously cached speed is carried forward (zero if nothing is cached).
pub fn normalize_geo(raw: &RawGeo, prior: Option<&GeoSample>) -> GeoSample {
    let speed_kmh = match raw.speed_mps.filter(|s| s.is_finite()) {
        Some(mps) => mps * MPS_TO_KMH,
        None => prior.map(|p| p.speed_kmh).unwrap_or(0.0),
    };

    GeoSample {
        lat: raw.latitude,
        long: raw.longitude,
        speed_kmh,
    }
}
