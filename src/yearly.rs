use chrono::{TimeZone, Timelike};
use log::debug;
use crate::models::observation::{Dataset, AIR_TEMPERATURE, RELATIVE_HUMIDITY};
use crate::models::statistics::{Statistic, StatisticsResult};

/// First local hour counted as day
const DAY_START_HOUR: u32 = 8;

/// Last local hour counted as day, 21:00 is the first night hour
const DAY_END_HOUR: u32 = 20;

/// Calculates yearly statistics over a dataset.
///
/// Temperature and humidity averages are only reported if the respective field exists
/// somewhere in the dataset. Day and night averages follow the temperature field and split
/// records on local hour, day being 08-20 inclusive and night everything else.
/// A statistic whose field exists but holds no values is reported as None.
///
/// # Arguments
///
/// * 'data' - the dataset to calculate statistics for
pub fn calculate_yearly_statistics<Tz: TimeZone>(data: &Dataset<Tz>) -> StatisticsResult {
    let mut stats = StatisticsResult::new();

    if data.has_field(AIR_TEMPERATURE) {
        let temps = data.records()
            .iter()
            .filter_map(|r| r.value(AIR_TEMPERATURE).map(|v| (r.timestamp.hour(), v)));

        let mut all = Mean::default();
        let mut day = Mean::default();
        let mut night = Mean::default();
        for (hour, temp) in temps {
            all.add(temp);
            if is_day_hour(hour) {
                day.add(temp);
            } else {
                night.add(temp);
            }
        }
        debug!("temperature values: {} total, {} day, {} night", all.count, day.count, night.count);

        stats.insert(Statistic::AvgTemperature, all.mean());
        stats.insert(Statistic::AvgDayTemperature, day.mean());
        stats.insert(Statistic::AvgNightTemperature, night.mean());
    }

    if data.has_field(RELATIVE_HUMIDITY) {
        let mut humidity = Mean::default();
        data.records()
            .iter()
            .filter_map(|r| r.value(RELATIVE_HUMIDITY))
            .for_each(|v| humidity.add(v));

        stats.insert(Statistic::AvgHumidity, humidity.mean());
    }

    stats
}

/// Returns true if the local hour belongs to the day bucket
pub fn is_day_hour(hour: u32) -> bool {
    (DAY_START_HOUR..=DAY_END_HOUR).contains(&hour)
}

/// Running arithmetic mean
#[derive(Default)]
struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset};
    use crate::models::observation::{TimestampedRecord, PRECIPITATION};

    /// Vilnius summer time, the engine must split on local and not UTC hours
    fn local(day: u32, hour: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(3 * 3600).unwrap()
            .with_ymd_and_hms(2024, 7, day, hour, 0, 0).unwrap()
    }

    fn temps(points: &[(u32, Option<f64>)]) -> Dataset<FixedOffset> {
        let records = points
            .iter()
            .map(|(h, v)| TimestampedRecord::new(local(1, *h)).with(AIR_TEMPERATURE, *v))
            .collect();
        Dataset::new(records).unwrap()
    }

    #[test]
    fn averages_skip_nulls() {
        let data = Dataset::new(vec![
            TimestampedRecord::new(local(1, 1)).with(AIR_TEMPERATURE, Some(10.0)).with(RELATIVE_HUMIDITY, Some(80.0)),
            TimestampedRecord::new(local(1, 2)).with(AIR_TEMPERATURE, None).with(RELATIVE_HUMIDITY, Some(70.0)),
            TimestampedRecord::new(local(1, 3)).with(AIR_TEMPERATURE, Some(20.0)),
        ]).unwrap();

        let stats = calculate_yearly_statistics(&data);
        assert_eq!(stats.value(Statistic::AvgTemperature), Some(15.0));
        assert_eq!(stats.value(Statistic::AvgHumidity), Some(75.0));
    }

    #[test]
    fn day_night_boundaries() {
        let data = temps(&[(7, Some(1.0)), (8, Some(10.0)), (20, Some(20.0)), (21, Some(3.0))]);

        let stats = calculate_yearly_statistics(&data);
        assert_eq!(stats.value(Statistic::AvgDayTemperature), Some(15.0));
        assert_eq!(stats.value(Statistic::AvgNightTemperature), Some(2.0));
        assert_eq!(stats.value(Statistic::AvgTemperature), Some(8.5));
    }

    #[test]
    fn hour_20_is_day_and_21_is_night() {
        assert!(!is_day_hour(7));
        assert!(is_day_hour(8));
        assert!(is_day_hour(20));
        assert!(!is_day_hour(21));
        assert!(!is_day_hour(0));
        assert!(!is_day_hour(23));
    }

    #[test]
    fn missing_temperature_field_omits_all_temperature_keys() {
        let data = Dataset::new(vec![
            TimestampedRecord::new(local(1, 12)).with(RELATIVE_HUMIDITY, Some(50.0)).with(PRECIPITATION, Some(1.0)),
        ]).unwrap();

        let stats = calculate_yearly_statistics(&data);
        assert!(!stats.contains(Statistic::AvgTemperature));
        assert!(!stats.contains(Statistic::AvgDayTemperature));
        assert!(!stats.contains(Statistic::AvgNightTemperature));
        assert_eq!(stats.get(Statistic::AvgHumidity), Some(Some(50.0)));
    }

    #[test]
    fn all_null_temperature_gives_none_not_zero() {
        let data = temps(&[(3, None), (12, None)]);

        let stats = calculate_yearly_statistics(&data);
        assert_eq!(stats.get(Statistic::AvgTemperature), Some(None));
        assert_eq!(stats.get(Statistic::AvgDayTemperature), Some(None));
        assert_eq!(stats.get(Statistic::AvgNightTemperature), Some(None));
        assert!(!stats.contains(Statistic::AvgHumidity));
    }

    #[test]
    fn empty_bucket_is_none() {
        let data = temps(&[(9, Some(12.0)), (15, Some(18.0))]);

        let stats = calculate_yearly_statistics(&data);
        assert_eq!(stats.value(Statistic::AvgDayTemperature), Some(15.0));
        assert_eq!(stats.get(Statistic::AvgNightTemperature), Some(None));
    }

    #[test]
    fn empty_dataset_has_no_keys() {
        let data: Dataset<FixedOffset> = Dataset::empty();
        assert!(calculate_yearly_statistics(&data).is_empty());
    }

    #[test]
    fn utc_hour_does_not_decide_bucket() {
        // 17:30 UTC is 20:30 local, still day
        let ts = chrono::Utc.with_ymd_and_hms(2024, 7, 1, 17, 30, 0).unwrap()
            .with_timezone(&FixedOffset::east_opt(3 * 3600).unwrap());
        let data = Dataset::new(vec![TimestampedRecord::new(ts).with(AIR_TEMPERATURE, Some(5.0))]).unwrap();

        let stats = calculate_yearly_statistics(&data);
        assert_eq!(stats.value(Statistic::AvgDayTemperature), Some(5.0));
        assert_eq!(stats.get(Statistic::AvgNightTemperature), Some(None));
    }
}
