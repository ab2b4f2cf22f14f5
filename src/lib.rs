//! Projected coastal sea-level change per city and decade.
//!
//! Load a dataset once with [`SeaLevelEngine::open`], then query it:
//! interpolate a city's sea level at a continuous year, lift it onto the
//! geoid for the scene's water plane, or rank cities for a decade.

pub mod charts;
pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod geoid;
pub mod state;

pub use config::Config;
pub use engine::{ElevationReading, SeaLevelEngine};
pub use error::{Result, SeaLevelError};
pub use geoid::{ConstantUndulation, GeoidModel};
