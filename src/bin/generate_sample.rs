use std::sync::Arc;

use arrow::array::{Float64Array, Int32Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Row {
    name: String,
    country: String,
    latitude: f64,
    longitude: f64,
    year: i32,
    sea_level_mm: f64,
}

/// Deterministic measurement noise (splitmix64 uniforms, Irwin–Hall normal).
struct Noise {
    state: u64,
}

impl Noise {
    fn new(seed: u64) -> Self {
        Noise { state: seed }
    }

    fn uniform(&mut self) -> f64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^= z >> 31;
        (z >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Approximately normal: sum of twelve uniforms, recentred.
    fn gauss(&mut self, std_dev: f64) -> f64 {
        let sum: f64 = (0..12).map(|_| self.uniform()).sum();
        (sum - 6.0) * std_dev
    }
}

/// Quadratic rise from `base` mm in 2020 with a city-specific acceleration.
fn projected_mm(year: i32, base: f64, rate: f64, accel: f64) -> f64 {
    let t = (year - 2020) as f64;
    base + rate * t + accel * t * t
}

fn main() {
    let mut noise = Noise::new(42);

    // name, country, lat, lon, base mm, mm/yr, mm/yr²
    let cities = [
        ("NEW_YORK", "USA", 40.71, -74.01, 100.0, 4.0, 0.030),
        ("MIAMI", "USA", 25.76, -80.19, 110.0, 4.5, 0.035),
        ("LAGOS", "NGA", 6.52, 3.38, 95.0, 3.8, 0.028),
        ("MUMBAI", "IND", 19.08, 72.88, 90.0, 3.6, 0.027),
        ("SHANGHAI", "CHN", 31.23, 121.47, 120.0, 4.2, 0.032),
        ("ROTTERDAM", "NLD", 51.92, 4.48, 85.0, 3.9, 0.029),
        ("JAKARTA", "IDN", -6.21, 106.85, 140.0, 5.1, 0.040),
        ("ALEXANDRIA", "EGY", 31.20, 29.92, 80.0, 3.5, 0.026),
    ];

    let mut rows = Vec::new();
    for &(name, country, lat, lon, base, rate, accel) in &cities {
        for year in (2020..=2150).step_by(10) {
            let mm = projected_mm(year, base, rate, accel) + noise.gauss(5.0);
            rows.push(Row {
                name: name.to_string(),
                country: country.to_string(),
                latitude: lat,
                longitude: lon,
                year,
                sea_level_mm: (mm * 10.0).round() / 10.0,
            });
        }
    }

    // Write CSV
    let csv_path = "sample_sea_level.csv";
    let mut writer = csv::Writer::from_path(csv_path).expect("Failed to create CSV file");
    for row in &rows {
        writer.serialize(row).expect("Failed to write CSV row");
    }
    writer.flush().expect("Failed to flush CSV file");

    // Build Arrow arrays
    let schema = Arc::new(Schema::new(vec![
        Field::new("name", DataType::Utf8, false),
        Field::new("country", DataType::Utf8, false),
        Field::new("latitude", DataType::Float64, false),
        Field::new("longitude", DataType::Float64, false),
        Field::new("year", DataType::Int32, false),
        Field::new("sea_level_mm", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.name.as_str()))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.country.as_str()))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.latitude))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.longitude))),
            Arc::new(Int32Array::from_iter_values(rows.iter().map(|r| r.year))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.sea_level_mm))),
        ],
    )
    .expect("Failed to create RecordBatch");

    // Write Parquet
    let parquet_path = "sample_sea_level.parquet";
    let file = std::fs::File::create(parquet_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    println!(
        "Wrote {} rows for {} cities to {csv_path} and {parquet_path}",
        rows.len(),
        cities.len()
    );
}
