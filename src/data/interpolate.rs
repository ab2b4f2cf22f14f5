use super::model::CityTimeSeriesStore;
use crate::error::{Result, SeaLevelError};

// ---------------------------------------------------------------------------
// Year bounds
// ---------------------------------------------------------------------------

/// Decade grid shared by loading and querying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub min_year: i32,
    pub max_year: i32,
    pub decade_width: i32,
}

impl Default for YearRange {
    fn default() -> Self {
        YearRange {
            min_year: 2020,
            max_year: 2150,
            decade_width: 10,
        }
    }
}

/// Result of interpolating one city at a continuous year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interpolation {
    pub floor_year: i32,
    pub ceil_year: i32,
    /// Interpolated sea-level change in metres.
    pub sea_level_m: f64,
}

// ---------------------------------------------------------------------------
// Decade bracketing
// ---------------------------------------------------------------------------

/// Bracket `continuous_year` between two decade samples.
///
/// Years below `min_year` are treated as `min_year`. When the upper bracket
/// would pass `max_year`, both ends collapse onto `max_year`.
pub fn decade_bounds(continuous_year: f64, range: &YearRange) -> Result<(i32, i32)> {
    let year = clamp_year(continuous_year, range)?;
    Ok(bracket(year, range))
}

fn clamp_year(continuous_year: f64, range: &YearRange) -> Result<f64> {
    if continuous_year.is_nan() {
        return Err(SeaLevelError::NonFiniteYear(continuous_year));
    }
    // Upper bound is handled by the bracket collapse.
    Ok(continuous_year.max(range.min_year as f64))
}

fn bracket(year: f64, range: &YearRange) -> (i32, i32) {
    let width = range.decade_width as f64;
    let steps = ((year - range.min_year as f64) / width).floor();
    let floor = range.min_year as f64 + steps * width;
    let ceil = floor + width;

    if ceil > range.max_year as f64 {
        (range.max_year, range.max_year)
    } else {
        (floor as i32, ceil as i32)
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

// ---------------------------------------------------------------------------
// Interpolation
// ---------------------------------------------------------------------------

/// Interpolate the sea level of `city` at `continuous_year`.
///
/// Fails with `UnknownCity` for a city not in the store and with
/// `NoDataForYear` when the floor decade has no sample. A missing ceiling
/// sample falls back to the floor value.
pub fn interpolate(
    store: &CityTimeSeriesStore,
    city: &str,
    continuous_year: f64,
    range: &YearRange,
) -> Result<Interpolation> {
    let entry = store.get(city)?;
    let year = clamp_year(continuous_year, range)?;
    let (floor_year, ceil_year) = bracket(year, range);

    let floor_value = entry
        .value_at(floor_year)
        .ok_or_else(|| SeaLevelError::NoDataForYear {
            city: city.to_string(),
            year: floor_year,
        })?;

    let sea_level_m = if floor_year == ceil_year {
        floor_value
    } else {
        let ceil_value = entry.value_at(ceil_year).unwrap_or(floor_value);
        let t = ((year - floor_year as f64) / range.decade_width as f64).clamp(0.0, 1.0);
        lerp(floor_value, ceil_value, t)
    };

    log::debug!("{city} @ {continuous_year}: [{floor_year}, {ceil_year}] -> {sea_level_m} m");

    Ok(Interpolation {
        floor_year,
        ceil_year,
        sea_level_m,
    })
}
