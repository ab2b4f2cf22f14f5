//! Geoid undulation seam and elevation composition.
//!
//! The undulation model itself lives outside this crate; callers hand in
//! anything that implements [`GeoidModel`].

/// Separation between the reference ellipsoid and the geoid, in metres.
pub trait GeoidModel {
    fn undulation(&self, latitude: f64, longitude: f64) -> f64;
}

impl<F> GeoidModel for F
where
    F: Fn(f64, f64) -> f64,
{
    fn undulation(&self, latitude: f64, longitude: f64) -> f64 {
        self(latitude, longitude)
    }
}

/// Same undulation everywhere. Useful when no geoid model is available.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConstantUndulation(pub f64);

impl GeoidModel for ConstantUndulation {
    fn undulation(&self, _latitude: f64, _longitude: f64) -> f64 {
        self.0
    }
}

/// Absolute elevation of the water surface.
pub fn compose(sea_level_m: f64, undulation: f64) -> f64 {
    undulation + sea_level_m
}
