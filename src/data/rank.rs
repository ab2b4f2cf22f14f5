use super::model::CityTimeSeriesStore;

/// One entry of a top-N ranking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ranked<'a> {
    pub city: &'a str,
    /// Sea-level change in metres at the ranked year.
    pub sea_level_m: f64,
}

impl Ranked<'_> {
    pub fn sea_level_mm(&self) -> f64 {
        self.sea_level_m * 1000.0
    }
}

/// Return up to `n` cities with the highest sea level at exactly `year`.
///
/// Cities without a sample at `year` are skipped, not interpolated. Ties
/// keep store order.
pub fn top_n(store: &CityTimeSeriesStore, year: i32, n: usize) -> Vec<Ranked<'_>> {
    let mut ranked: Vec<Ranked<'_>> = store
        .iter()
        .filter_map(|city| {
            city.value_at(year).map(|sea_level_m| Ranked {
                city: city.name(),
                sea_level_m,
            })
        })
        .collect();

    // Stable sort, so equal values stay in first-seen order.
    ranked.sort_by(|a, b| b.sea_level_m.total_cmp(&a.sea_level_m));
    ranked.truncate(n);
    ranked
}
