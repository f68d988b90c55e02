use std::collections::BTreeMap;
use chrono::{Datelike, TimeZone, Weekday};
use log::debug;
use crate::models::observation::{Dataset, PRECIPITATION};

/// Counts weekends with any precipitation.
///
/// Saturday and Sunday records are grouped by ISO year and ISO week so a weekend straddling
/// new year stays one weekend. A weekend is rainy if its precipitation sum, with nulls
/// counted as zero, is above zero. Returns 0 if the dataset has no precipitation field.
///
/// # Arguments
///
/// * 'data' - the dataset to count rainy weekends in
pub fn count_rainy_weekends<Tz: TimeZone>(data: &Dataset<Tz>) -> usize {
    if !data.has_field(PRECIPITATION) {
        return 0;
    }

    let mut weekends: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    for record in data.records() {
        if matches!(record.timestamp.weekday(), Weekday::Sat | Weekday::Sun) {
            let week = record.timestamp.iso_week();
            *weekends.entry((week.year(), week.week())).or_insert(0.0) += record.value(PRECIPITATION).unwrap_or(0.0);
        }
    }

    let rainy = weekends.values().filter(|&&sum| sum > 0.0).count();
    debug!("{} weekends found, {} rainy", weekends.len(), rainy);

    rainy
}
