//! Seeded synthetic dataset used by tests.
//!
//! Follows the distributions of the simulated Xylella data: six Apulian
//! provinces, one row per day, infection 5-20% of the orchard, replanting
//! 5-15%, yield 2000 l/ha reduced by the replanted share.

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use super::record::HistoricalRecord;

pub const PROVINCES: [&str; 6] = ["Lecce", "Brindisi", "Taranto", "Bari", "BAT", "Foggia"];

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `days` rows starting at 2024-01-01
pub fn synthetic_records(days: usize, seed: u64) -> Vec<HistoricalRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let temperature = Normal::new(20.0, 5.0).unwrap();
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

    (0..days)
        .map(|day| {
            let trees_total: u32 = rng.gen_range(1000..5000);
            let trees_infected = (f64::from(trees_total) * rng.gen_range(0.05..0.20)) as u32;
            let trees_replanted = (f64::from(trees_total) * rng.gen_range(0.05..0.15)) as u32;
            let loss = f64::from(trees_replanted) / f64::from(trees_total) * rng.gen_range(0.2..0.4);

            HistoricalRecord {
                date: start + Duration::days(day as i64),
                region_id: PROVINCES[rng.gen_range(0..PROVINCES.len())].to_string(),
                temperature: round2(temperature.sample(&mut rng)),
                humidity: rng.gen_range(40.0..90.0),
                precipitation: round2(rng.gen_range(0.0..30.0)),
                trees_total,
                trees_infected,
                trees_replanted,
                oil_yield: round2(2000.0 * (1.0 - loss)),
            }
        })
        .collect()
}

/// Minimal record for aggregation tests
pub fn record(region_id: &str, trees_infected: u32) -> HistoricalRecord {
    HistoricalRecord {
        date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        region_id: region_id.to_string(),
        temperature: 20.0,
        humidity: 60.0,
        precipitation: 10.0,
        trees_total: trees_infected.max(1000),
        trees_infected,
        trees_replanted: 100,
        oil_yield: 1900.0,
    }
}

/// Serialize records with the canonical header
pub fn to_csv(records: &[HistoricalRecord]) -> String {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for r in records {
        writer.serialize(r).unwrap();
    }
    String::from_utf8(writer.into_inner().unwrap()).unwrap()
}
