use crate::data::model::CityTimeSeriesStore;
use crate::data::rank;
use crate::error::Result;

// ---------------------------------------------------------------------------
// Chart inputs
// ---------------------------------------------------------------------------
//
// Data handed to the chart widgets. Drawing happens elsewhere; these only
// decide what is shown and in which order.

/// Per-city history for the line chart.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSeries {
    pub title: String,
    /// `(year, sea level mm)` in ascending year order.
    pub points: Vec<(i32, f64)>,
}

/// One dot on the world scatter plot (x = longitude, y = latitude).
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub selected: bool,
}

/// Horizontal bar chart of the highest sea levels in one decade.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub year: i32,
    /// `(city, sea level mm)`, smallest first so the largest bar is drawn on top.
    pub bars: Vec<(String, f64)>,
}

pub fn line_series(store: &CityTimeSeriesStore, city: &str) -> Result<LineSeries> {
    let entry = store.get(city)?;
    Ok(LineSeries {
        title: format!("Median sea level change (mm) over the years in {city}"),
        points: entry.series().map(|p| (p.year, p.sea_level_mm())).collect(),
    })
}

/// All cities, with `selected` set on the highlighted one.
pub fn scatter_points(store: &CityTimeSeriesStore, selected: Option<&str>) -> Vec<ScatterPoint> {
    store
        .iter()
        .map(|city| ScatterPoint {
            name: city.name().to_string(),
            x: city.longitude(),
            y: city.latitude(),
            selected: selected == Some(city.name()),
        })
        .collect()
}

pub fn bar_chart(store: &CityTimeSeriesStore, year: i32, n: usize) -> BarChart {
    let bars = rank::top_n(store, year, n)
        .into_iter()
        .rev()
        .map(|r| (r.city.to_string(), r.sea_level_mm()))
        .collect();

    BarChart {
        title: format!("Top {n} cities - Sea Level Change (mm) in {year}"),
        year,
        bars,
    }
}
