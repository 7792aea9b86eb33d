use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::logic::features::{FeatureVector, FeatureVectorBuilder};

/// One day of observations for one province.
///
/// Italian column names from the dashboard export are accepted as
/// aliases so old CSV files load unchanged.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HistoricalRecord {
    #[serde(alias = "Data", deserialize_with = "deserialize_date")]
    pub date: NaiveDate,

    #[serde(alias = "Provincia")]
    pub region_id: String,

    // ✅ Weather (°C, %, mm)
    #[serde(alias = "Temperatura (°C)")]
    pub temperature: f64,
    #[serde(alias = "Umidità (%)")]
    pub humidity: f64,
    #[serde(alias = "Precipitazioni (mm)")]
    pub precipitation: f64,

    // ✅ Orchard counts
    #[serde(alias = "Alberi_Totali")]
    pub trees_total: u32,
    #[serde(alias = "Alberi_Infetti")]
    pub trees_infected: u32,
    #[serde(alias = "Alberi_Ripiantati")]
    pub trees_replanted: u32,

    // ✅ Target (litres/hectare)
    #[serde(alias = "Produzione_Olio")]
    pub oil_yield: f64,
}

impl HistoricalRecord {
    /// Training-side view of the record, built by name through the schema
    pub fn feature_vector(&self) -> FeatureVector {
        FeatureVectorBuilder::new()
            .temperature(self.temperature)
            .humidity(self.humidity)
            .precipitation(self.precipitation)
            .trees_replanted(f64::from(self.trees_replanted))
            .trees_infected(f64::from(self.trees_infected))
            .build()
    }

    /// Regression target
    pub fn target(&self) -> f64 {
        self.oil_yield
    }

    /// Check the value invariants a CSV row cannot express on its own
    pub fn check(&self) -> Result<(), String> {
        if self.region_id.trim().is_empty() {
            return Err("empty region_id".to_string());
        }
        for (name, value) in [
            ("temperature", self.temperature),
            ("humidity", self.humidity),
            ("precipitation", self.precipitation),
        ] {
            if !value.is_finite() {
                return Err(format!("{} is not finite", name));
            }
        }
        if self.trees_infected > self.trees_total {
            return Err(format!(
                "trees_infected ({}) exceeds trees_total ({})",
                self.trees_infected, self.trees_total
            ));
        }
        if !self.oil_yield.is_finite() || self.oil_yield < 0.0 {
            return Err(format!("oil_yield must be a non-negative number, got {}", self.oil_yield));
        }
        Ok(())
    }
}

/// Accepts `2024-01-01` and the pandas export form `2024-01-01 00:00:00`
fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).map_err(serde::de::Error::custom)
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| {
            NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date())
        })
        .map_err(|_| format!("invalid date '{}'", trimmed))
}
