use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Config;
use crate::data::interpolate::{self, Interpolation};
use crate::data::loader::load_file;
use crate::data::model::CityTimeSeriesStore;
use crate::data::rank;
use crate::error::Result;
use crate::geoid::{self, GeoidModel};

// ---------------------------------------------------------------------------
// Query facade
// ---------------------------------------------------------------------------

/// Everything the scene needs to place the water surface for one city.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElevationReading {
    pub floor_year: i32,
    pub ceil_year: i32,
    pub sea_level_m: f64,
    pub undulation: f64,
    pub absolute_elevation: f64,
}

/// Ready-to-query handle over the current dataset.
///
/// The store is shared behind an `Arc`; a reload builds the replacement in
/// full before swapping it in, so a failed reload leaves the current store
/// untouched and snapshots taken earlier stay valid.
#[derive(Debug, Clone)]
pub struct SeaLevelEngine {
    config: Config,
    store: Arc<CityTimeSeriesStore>,
    source: Option<PathBuf>,
}

impl SeaLevelEngine {
    /// Validate `config` and load the dataset at `source`.
    pub fn open(config: Config, source: &Path) -> Result<Self> {
        config.validate()?;
        let store = load_file(source)?;
        Ok(SeaLevelEngine {
            config,
            store: Arc::new(store),
            source: Some(source.to_path_buf()),
        })
    }

    /// Wrap an already built store.
    pub fn from_store(config: Config, store: CityTimeSeriesStore) -> Result<Self> {
        config.validate()?;
        Ok(SeaLevelEngine {
            config,
            store: Arc::new(store),
            source: None,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Path of the dataset currently loaded, if it came from a file.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Shared handle on the current store.
    pub fn snapshot(&self) -> Arc<CityTimeSeriesStore> {
        Arc::clone(&self.store)
    }

    pub fn store(&self) -> &CityTimeSeriesStore {
        &self.store
    }

    pub fn list_cities(&self) -> Vec<String> {
        self.store.cities().map(str::to_string).collect()
    }

    pub fn interpolate(&self, city: &str, continuous_year: f64) -> Result<Interpolation> {
        interpolate::interpolate(&self.store, city, continuous_year, &self.config.year_range())
    }

    /// Interpolated sea level for `city`, lifted onto the geoid at the
    /// city's coordinates.
    pub fn interpolated_elevation<G>(&self, city: &str, continuous_year: f64, geoid: &G) -> Result<ElevationReading>
    where
        G: GeoidModel + ?Sized,
    {
        let entry = self.store.get(city)?;
        let interpolation = self.interpolate(city, continuous_year)?;
        let undulation = geoid.undulation(entry.latitude(), entry.longitude());

        Ok(ElevationReading {
            floor_year: interpolation.floor_year,
            ceil_year: interpolation.ceil_year,
            sea_level_m: interpolation.sea_level_m,
            undulation,
            absolute_elevation: geoid::compose(interpolation.sea_level_m, undulation),
        })
    }

    /// Top `n` cities at exactly `year`, values in millimetres.
    pub fn top_n(&self, year: i32, n: usize) -> Vec<(String, f64)> {
        rank::top_n(&self.store, year, n)
            .into_iter()
            .map(|r| (r.city.to_string(), r.sea_level_mm()))
            .collect()
    }

    /// Replace the dataset with the one at `source`.
    ///
    /// On error the previous store remains in place.
    pub fn reload_dataset(&mut self, source: &Path) -> Result<()> {
        match load_file(source) {
            Ok(store) => {
                log::info!(
                    "Reloaded dataset from {} ({} cities)",
                    source.display(),
                    store.len()
                );
                self.store = Arc::new(store);
                self.source = Some(source.to_path_buf());
                Ok(())
            }
            Err(e) => {
                log::error!("Reload from {} failed, keeping previous dataset: {e}", source.display());
                Err(e)
            }
        }
    }
}
