use std::collections::{BTreeMap, HashMap};

use crate::error::{Result, SeaLevelError};

// ---------------------------------------------------------------------------
// SeriesPoint – one decade sample
// ---------------------------------------------------------------------------

/// A single projected sea-level sample for one city and decade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub year: i32,
    /// Sea-level change in metres (the dataset stores millimetres).
    pub sea_level_m: f64,
}

impl SeriesPoint {
    pub fn from_millimetres(year: i32, sea_level_mm: f64) -> Self {
        SeriesPoint {
            year,
            sea_level_m: sea_level_mm / 1000.0,
        }
    }

    pub fn sea_level_mm(&self) -> f64 {
        self.sea_level_m * 1000.0
    }
}

// ---------------------------------------------------------------------------
// DatasetRow – one parsed source row
// ---------------------------------------------------------------------------

/// One structurally valid row of the source dataset, before it is folded
/// into a [`City`].
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetRow {
    pub name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub year: i32,
    pub sea_level_mm: f64,
}

// ---------------------------------------------------------------------------
// City – a named location and its decade series
// ---------------------------------------------------------------------------

/// A city and its decade-indexed projection. Immutable once the owning
/// store is built.
#[derive(Debug, Clone, PartialEq)]
pub struct City {
    name: String,
    country: String,
    latitude: f64,
    longitude: f64,
    series: BTreeMap<i32, SeriesPoint>,
}

impl City {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Samples in ascending year order.
    pub fn series(&self) -> impl Iterator<Item = &SeriesPoint> {
        self.series.values()
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.series.keys().copied()
    }

    pub fn point_at(&self, year: i32) -> Option<&SeriesPoint> {
        self.series.get(&year)
    }

    /// Sea level in metres at an exact sample year.
    pub fn value_at(&self, year: i32) -> Option<f64> {
        self.series.get(&year).map(|p| p.sea_level_m)
    }

    /// Dropdown label, e.g. `NEW_YORK (USA)`. The country is the one on
    /// the city's first row.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.country)
    }
}

// ---------------------------------------------------------------------------
// CityTimeSeriesStore – the complete loaded dataset
// ---------------------------------------------------------------------------

/// Read-only mapping from city name to [`City`].
///
/// Cities are kept in first-seen order; that order is what the menus show
/// and what breaks ranking ties. The only way to change the contents is to
/// build a new store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CityTimeSeriesStore {
    cities: Vec<City>,
    index: HashMap<String, usize>,
}

impl CityTimeSeriesStore {
    /// City names in store order.
    pub fn cities(&self) -> impl Iterator<Item = &str> {
        self.cities.iter().map(|c| c.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &City> {
        self.cities.iter()
    }

    pub fn get(&self, city: &str) -> Result<&City> {
        self.index
            .get(city)
            .map(|&i| &self.cities[i])
            .ok_or_else(|| SeaLevelError::UnknownCity(city.to_string()))
    }

    pub fn get_at_year(&self, city: &str, year: i32) -> Result<&SeriesPoint> {
        self.get(city)?
            .point_at(year)
            .ok_or_else(|| SeaLevelError::NoDataForYear {
                city: city.to_string(),
                year,
            })
    }

    pub fn contains(&self, city: &str) -> bool {
        self.index.contains_key(city)
    }

    /// Number of cities.
    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}

// ---------------------------------------------------------------------------
// StoreBuilder – mutable staging area used by the loader
// ---------------------------------------------------------------------------

/// Accumulates rows and produces an immutable [`CityTimeSeriesStore`].
#[derive(Debug, Default)]
pub struct StoreBuilder {
    cities: Vec<City>,
    index: HashMap<String, usize>,
    rows: usize,
}

impl StoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the `(city, year)` entry for `row`.
    ///
    /// Coordinates follow the most recent row for the city; the country
    /// stays the one from its first row.
    pub fn insert(&mut self, row: DatasetRow) {
        self.rows += 1;
        let point = SeriesPoint::from_millimetres(row.year, row.sea_level_mm);

        let idx = match self.index.get(&row.name) {
            Some(&i) => i,
            None => {
                let i = self.cities.len();
                self.index.insert(row.name.clone(), i);
                self.cities.push(City {
                    name: row.name.clone(),
                    country: row.country.clone(),
                    latitude: 0.0,
                    longitude: 0.0,
                    series: BTreeMap::new(),
                });
                i
            }
        };

        let city = &mut self.cities[idx];
        city.latitude = row.latitude;
        city.longitude = row.longitude;
        if let Some(previous) = city.series.insert(row.year, point) {
            log::warn!(
                "duplicate row for {} in {}: {} mm replaced by {} mm",
                city.name,
                row.year,
                previous.sea_level_mm(),
                row.sea_level_mm
            );
        }
    }

    /// Rows inserted so far, duplicates included.
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn build(self) -> CityTimeSeriesStore {
        CityTimeSeriesStore {
            cities: self.cities,
            index: self.index,
        }
    }
}

impl FromIterator<DatasetRow> for CityTimeSeriesStore {
    fn from_iter<I: IntoIterator<Item = DatasetRow>>(iter: I) -> Self {
        let mut builder = StoreBuilder::new();
        for row in iter {
            builder.insert(row);
        }
        builder.build()
    }
}

#[cfg(test)]
pub(crate) fn row(name: &str, year: i32, sea_level_mm: f64) -> DatasetRow {
    DatasetRow {
        name: name.to_string(),
        country: "USA".to_string(),
        latitude: 40.7,
        longitude: -74.0,
        year,
        sea_level_mm,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_first_seen_city_order() {
        let store: CityTimeSeriesStore = vec![
            row("MIAMI", 2020, 90.0),
            row("BOSTON", 2020, 80.0),
            row("MIAMI", 2030, 110.0),
            row("ALEXANDRIA", 2020, 70.0),
        ]
        .into_iter()
        .collect();

        let names: Vec<&str> = store.cities().collect();
        assert_eq!(names, ["MIAMI", "BOSTON", "ALEXANDRIA"]);
        let years: Vec<i32> = store.get("MIAMI").unwrap().years().collect();
        assert_eq!(years, [2020, 2030]);
    }

    #[test]
    fn converts_millimetres_to_metres() {
        let store: CityTimeSeriesStore = std::iter::once(row("NEW_YORK", 2020, 100.0)).collect();
        let point = store.get_at_year("NEW_YORK", 2020).unwrap();
        assert!((point.sea_level_m - 0.1).abs() < 1e-12);
        assert!((point.sea_level_mm() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn duplicate_year_last_write_wins() {
        let mut later = row("NEW_YORK", 2020, 150.0);
        later.latitude = 41.0;
        let mut builder = StoreBuilder::new();
        builder.insert(row("NEW_YORK", 2020, 100.0));
        builder.insert(later);
        assert_eq!(builder.rows(), 2);
        let store = builder.build();

        let city = store.get("NEW_YORK").unwrap();
        assert_eq!(city.years().count(), 1);
        assert_eq!(city.value_at(2020), Some(0.15));
        assert_eq!(city.latitude(), 41.0);
    }

    #[test]
    fn unknown_city_and_missing_year() {
        let store: CityTimeSeriesStore = std::iter::once(row("NEW_YORK", 2020, 100.0)).collect();
        assert!(matches!(
            store.get("ATLANTIS"),
            Err(SeaLevelError::UnknownCity(name)) if name == "ATLANTIS"
        ));
        assert!(matches!(
            store.get_at_year("NEW_YORK", 2030),
            Err(SeaLevelError::NoDataForYear { year: 2030, .. })
        ));
    }

    #[test]
    fn label_keeps_first_country() {
        let mut renamed = row("NEW_YORK", 2030, 120.0);
        renamed.country = "US".to_string();
        let store: CityTimeSeriesStore = vec![row("NEW_YORK", 2020, 100.0), renamed]
            .into_iter()
            .collect();
        let city = store.get("NEW_YORK").unwrap();
        assert_eq!(city.country(), "USA");
        assert_eq!(city.label(), "NEW_YORK (USA)");
    }

    #[test]
    fn label_includes_country() {
        let store: CityTimeSeriesStore = std::iter::once(row("NEW_YORK", 2020, 100.0)).collect();
        assert_eq!(store.get("NEW_YORK").unwrap().label(), "NEW_YORK (USA)");
    }
}
