use std::collections::BTreeMap;

use crate::charts::{self, BarChart, LineSeries, ScatterPoint};
use crate::data::interpolate::decade_bounds;
use crate::engine::{ElevationReading, SeaLevelEngine};
use crate::error::{Result, SeaLevelError};
use crate::geoid::GeoidModel;

// ---------------------------------------------------------------------------
// Scene context
// ---------------------------------------------------------------------------

/// The city the scene is currently placed at.
#[derive(Debug, Clone, PartialEq)]
pub struct CityContext {
    pub name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Sea level in metres for every sample year of the city.
    pub sea_levels: BTreeMap<i32, f64>,
    /// Continuous year rounded to the nearest whole year.
    pub year: i32,
}

/// Where the scene should put things after a jump to a city.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// New world origin.
    pub latitude: f64,
    pub longitude: f64,
    /// Height of the water plane.
    pub water_plane_y: f64,
    /// Height of the player above the geoid.
    pub player_y: f64,
    pub reading: ElevationReading,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Menu and scene state, independent of rendering.
///
/// Slider and button events are plain method calls; results are returned
/// for the caller to apply to the scene.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Year slider position in `0..=1`.
    pub year_fraction: f64,

    /// City the scene is placed at (None until the first jump).
    pub current: Option<CityContext>,

    /// Status / error message shown in the menu.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn continuous_year(&self, engine: &SeaLevelEngine) -> f64 {
        engine.config().continuous_year(self.year_fraction)
    }

    /// Dropdown entries, `NAME (COUNTRY)`, in store order.
    pub fn dropdown_labels(engine: &SeaLevelEngine) -> Vec<String> {
        engine.store().iter().map(|c| c.label()).collect()
    }

    /// Year slider moved: returns the ranking chart for the floor decade.
    pub fn set_year_fraction(&mut self, engine: &SeaLevelEngine, fraction: f64) -> Result<BarChart> {
        self.year_fraction = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };
        let (floor_year, _) = decade_bounds(self.continuous_year(engine), &engine.config().year_range())?;
        log::info!("Year changed to {floor_year}");
        Ok(charts::bar_chart(engine.store(), floor_year, engine.config().top_n))
    }

    /// "Go" pressed: move the scene to `selection` (a city name or a
    /// dropdown label) at the current slider year.
    ///
    /// On failure the previous context is kept and the error is recorded in
    /// `status_message`.
    pub fn go_to_city<G>(&mut self, engine: &SeaLevelEngine, selection: &str, geoid: &G) -> Result<Placement>
    where
        G: GeoidModel + ?Sized,
    {
        match self.try_go_to_city(engine, selection, geoid) {
            Ok(placement) => {
                self.status_message = None;
                Ok(placement)
            }
            Err(e) => {
                log::error!("Cannot move to {selection}: {e}");
                self.status_message = Some(format!("Error: {e}"));
                Err(e)
            }
        }
    }

    fn try_go_to_city<G>(&mut self, engine: &SeaLevelEngine, selection: &str, geoid: &G) -> Result<Placement>
    where
        G: GeoidModel + ?Sized,
    {
        let store = engine.store();
        let name = resolve_selection(engine, selection)?;
        let city = store.get(name)?;
        let continuous_year = self.continuous_year(engine);
        let reading = engine.interpolated_elevation(name, continuous_year, geoid)?;

        log::info!(
            "Teleport → {name} ({continuous_year}) : lat {}, lon {}, sea {} m",
            city.latitude(),
            city.longitude(),
            reading.sea_level_m
        );

        self.current = Some(CityContext {
            name: name.to_string(),
            country: city.country().to_string(),
            latitude: city.latitude(),
            longitude: city.longitude(),
            sea_levels: city.series().map(|p| (p.year, p.sea_level_m)).collect(),
            year: continuous_year.round() as i32,
        });

        Ok(Placement {
            latitude: city.latitude(),
            longitude: city.longitude(),
            water_plane_y: reading.absolute_elevation,
            player_y: reading.undulation + engine.config().spawn_height_m,
            reading,
        })
    }

    /// History of the current city for the line chart.
    pub fn line_series(&self, engine: &SeaLevelEngine) -> Option<Result<LineSeries>> {
        self.current
            .as_ref()
            .map(|ctx| charts::line_series(engine.store(), &ctx.name))
    }

    /// Scatter plot with the current city highlighted.
    pub fn scatter_points(&self, engine: &SeaLevelEngine) -> Vec<ScatterPoint> {
        charts::scatter_points(engine.store(), self.current.as_ref().map(|c| c.name.as_str()))
    }
}

/// Accept either a plain city name or a `NAME (COUNTRY)` dropdown label.
fn resolve_selection<'a>(engine: &SeaLevelEngine, selection: &'a str) -> Result<&'a str> {
    let store = engine.store();
    if store.contains(selection) {
        return Ok(selection);
    }
    selection
        .rsplit_once(" (")
        .filter(|(_, rest)| rest.ends_with(')'))
        .map(|(name, _)| name)
        .filter(|name| store.contains(name))
        .ok_or_else(|| SeaLevelError::UnknownCity(selection.to_string()))
}
