//! Regional Aggregation
//!
//! Per-region arithmetic mean of `trees_infected` over every record of the
//! region. Not weighted by `trees_total` and not bucketed per day.

use std::collections::BTreeMap;

use super::types::{RegionStat, SeriesPoint};
use crate::logic::dataset::HistoricalRecord;

/// Group by region and average the infected counts.
///
/// Output is sorted by region id; the result does not depend on record order.
pub fn aggregate(records: &[HistoricalRecord]) -> Vec<RegionStat> {
    let mut groups: BTreeMap<&str, (u64, usize)> = BTreeMap::new();

    for record in records {
        let entry = groups.entry(record.region_id.as_str()).or_insert((0, 0));
        entry.0 += u64::from(record.trees_infected);
        entry.1 += 1;
    }

    groups
        .into_iter()
        .map(|(region_id, (sum, count))| RegionStat {
            region_id: region_id.to_string(),
            mean_infected: sum as f64 / count as f64,
            record_count: count,
        })
        .collect()
}

/// Stat for a single region, if it has any records
pub fn region_stat(records: &[HistoricalRecord], region_id: &str) -> Option<RegionStat> {
    let (sum, count) = records
        .iter()
        .filter(|r| r.region_id == region_id)
        .fold((0u64, 0usize), |(sum, count), r| (sum + u64::from(r.trees_infected), count + 1));

    (count > 0).then(|| RegionStat {
        region_id: region_id.to_string(),
        mean_infected: sum as f64 / count as f64,
        record_count: count,
    })
}

/// Chart series of one region, sorted by date
pub fn region_series(records: &[HistoricalRecord], region_id: &str) -> Vec<SeriesPoint> {
    let mut points: Vec<SeriesPoint> = records
        .iter()
        .filter(|r| r.region_id == region_id)
        .map(|r| SeriesPoint {
            date: r.date,
            temperature: r.temperature,
            humidity: r.humidity,
            trees_infected: r.trees_infected,
        })
        .collect();
    points.sort_by_key(|p| p.date);
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::dataset::fixtures::{record, synthetic_records};
    use crate::logic::region::classifier::classify;
    use crate::logic::region::types::RiskBand;
    use chrono::NaiveDate;

    #[test]
    fn test_lecce_mean_is_low() {
        let records = vec![record("Lecce", 10), record("Lecce", 20), record("Lecce", 90)];
        let stats = aggregate(&records);

        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].region_id, "Lecce");
        assert_eq!(stats[0].mean_infected, 40.0);
        assert_eq!(stats[0].record_count, 3);
        assert_eq!(classify(&stats[0]), RiskBand::Low);
    }

    #[test]
    fn test_mean_is_not_weighted_by_orchard_size() {
        let mut small = record("Bari", 10);
        small.trees_total = 10;
        let mut large = record("Bari", 110);
        large.trees_total = 100_000;

        let stats = aggregate(&[small, large]);
        assert_eq!(stats[0].mean_infected, 60.0);
        assert_eq!(classify(&stats[0]), RiskBand::High);
    }

    #[test]
    fn test_zero_infection_region_is_not_above_infected_region() {
        let mut records = Vec::new();
        for infected in [0, 0, 0] {
            records.push(record("Foggia", infected));
        }
        for infected in [1, 5, 30] {
            records.push(record("Taranto", infected));
        }

        let stats = aggregate(&records);
        let foggia = stats.iter().find(|s| s.region_id == "Foggia").unwrap();
        let taranto = stats.iter().find(|s| s.region_id == "Taranto").unwrap();
        assert_eq!(foggia.mean_infected, 0.0);
        assert!(foggia.mean_infected <= taranto.mean_infected);
    }

    #[test]
    fn test_order_independent() {
        let records = synthetic_records(200, 11);
        let mut reversed = records.clone();
        reversed.reverse();

        assert_eq!(aggregate(&records), aggregate(&reversed));
        let ids: Vec<_> = aggregate(&records).into_iter().map(|s| s.region_id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn test_empty_records_give_no_stats() {
        assert!(aggregate(&[]).is_empty());
        assert_eq!(region_stat(&[], "Lecce"), None);
    }

    #[test]
    fn test_region_stat_matches_aggregate() {
        let records = synthetic_records(100, 4);
        for stat in aggregate(&records) {
            assert_eq!(region_stat(&records, &stat.region_id), Some(stat));
        }
    }

    #[test]
    fn test_series_is_sorted_by_date() {
        let mut late = record("Lecce", 5);
        late.date = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let early = record("Lecce", 7);
        let other = record("Bari", 9);

        let series = region_series(&[late, other, early], "Lecce");
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].trees_infected, 7);
        assert_eq!(series[1].trees_infected, 5);
    }
}
