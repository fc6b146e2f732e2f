//! Shapes of the readings as platform callbacks deliver them. Any field may
//! be missing; the normalizer decides what that means.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RawVector {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RawMotion {
    /// `None` when the platform fired the callback without acceleration data.
    pub acceleration_including_gravity: Option<RawVector>,
}

impl RawMotion {
    pub fn axes(x: f64, y: f64, z: f64) -> Self {
        Self {
            acceleration_including_gravity: Some(RawVector {
                x: Some(x),
                y: Some(y),
                z: Some(z),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RawOrientation {
    pub alpha: Option<f64>,
    pub beta: Option<f64>,
    pub gamma: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RawGeo {
    pub latitude: f64,
    pub longitude: f64,
    /// Metres per second, when the platform knows it.
    pub speed_mps: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SensorReading {
    Motion(RawMotion),
    Orientation(RawOrientation),
    Geo(RawGeo),
}
