use std::fmt;
use std::fmt::Formatter;
use std::fs;
use std::path::Path;
use chrono::{TimeDelta, TimeZone};
use log::info;
use serde::Serialize;
use crate::errors::ReportError;
use crate::interpolation::interpolate_temperature_data;
use crate::models::observation::{Dataset, AIR_TEMPERATURE};
use crate::models::statistics::{Statistic, StatisticsResult};
use crate::models::temperature_series::TemperatureSeries;

/// File name for the exported comparison
pub const COMPARISON_FILE: &str = "temperature_comparison.json";

const NO_DATA: &str = "no data";

/// Yearly statistics block for console output
pub struct StatisticsReport<'a> {
    pub stats: &'a StatisticsResult,
    pub rainy_weekends: usize,
}

/// Implementation of the Display Trait for pretty print
impl fmt::Display for StatisticsReport<'_> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let rule = "=".repeat(50);

        writeln!(f, "{}", rule)?;
        writeln!(f, "{:^50}", "YEARLY STATISTICS")?;
        writeln!(f, "{}\n", rule)?;
        writeln!(f, "Average temperature: {}", with_unit(self.stats.value(Statistic::AvgTemperature), "°C"))?;
        writeln!(f, "Average humidity: {}\n", with_unit(self.stats.value(Statistic::AvgHumidity), "%"))?;
        writeln!(f, "DAY AND NIGHT TEMPERATURES (local time):")?;
        writeln!(f, "   (Day: 08:00-20:59, Night: 21:00-07:59)")?;
        writeln!(f, "   - Average day temperature: {}", with_unit(self.stats.value(Statistic::AvgDayTemperature), "°C"))?;
        writeln!(f, "   - Average night temperature: {}\n", with_unit(self.stats.value(Statistic::AvgNightTemperature), "°C"))?;
        writeln!(f, "Rainy weekends during the period: {}\n", self.rainy_weekends)?;
        writeln!(f, "{}", rule)
    }
}

/// Prints yearly statistics to stdout
///
/// # Arguments
///
/// * 'stats' - yearly statistics
/// * 'rainy_weekends' - number of rainy weekends
pub fn display_statistics(stats: &StatisticsResult, rainy_weekends: usize) {
    print!("{}", StatisticsReport { stats, rainy_weekends });
}

fn with_unit(value: Option<f64>, unit: &str) -> String {
    value.map_or(NO_DATA.to_string(), |v| format!("{:.1}{}", v, unit))
}

/// Measured and forecasted temperatures prepared for plotting
#[derive(Serialize)]
#[serde(bound = "Tz::Offset: std::fmt::Display")]
pub struct TemperatureComparison<Tz: TimeZone>
where
    Tz::Offset: std::fmt::Display,
{
    pub historical: TemperatureSeries<Tz>,
    pub historical_smooth: TemperatureSeries<Tz>,
    pub forecast: TemperatureSeries<Tz>,
    pub forecast_smooth: TemperatureSeries<Tz>,
}

impl<Tz: TimeZone> TemperatureComparison<Tz>
where
    Tz::Offset: std::fmt::Display,
{
    /// Builds the comparison from the last days of history and the forecast.
    /// Raw series only keep known values, smooth series are the 5 minute resampling.
    ///
    /// # Arguments
    ///
    /// * 'historical' - historical observations
    /// * 'forecast' - forecast records
    /// * 'days_back' - number of days of history to include, counted from the latest observation
    pub fn new(historical: &Dataset<Tz>, forecast: &Dataset<Tz>, days_back: i64) -> TemperatureComparison<Tz> {
        // A cutoff beyond what chrono can represent keeps all history
        let recent = match historical.last_timestamp() {
            Some(last) => match TimeDelta::try_days(days_back).and_then(|d| last.clone().checked_sub_signed(d)) {
                Some(cutoff) => historical.since(&cutoff),
                None => historical.clone(),
            },
            None => Dataset::empty(),
        };

        let historical = recent.series(AIR_TEMPERATURE);
        let forecast = forecast.series(AIR_TEMPERATURE);

        TemperatureComparison {
            historical_smooth: interpolate_temperature_data(&historical),
            historical: known_only(&historical),
            forecast_smooth: interpolate_temperature_data(&forecast),
            forecast: known_only(&forecast),
        }
    }
}

fn known_only<Tz: TimeZone>(series: &TemperatureSeries<Tz>) -> TemperatureSeries<Tz> {
    let points = series.known_points().into_iter().map(|(t, v)| (t, Some(v))).collect();
    TemperatureSeries::from_sorted(points)
}

/// Saves the comparison as json in the output directory for an external plotting tool
///
/// # Arguments
///
/// * 'output_dir' - directory to save the file to
/// * 'comparison' - the comparison to save
pub fn save_comparison<Tz: TimeZone>(output_dir: &str, comparison: &TemperatureComparison<Tz>) -> Result<(), ReportError>
where
    Tz::Offset: std::fmt::Display,
{
    fs::create_dir_all(output_dir)?;
    let file_path = Path::new(output_dir).join(COMPARISON_FILE);

    let json = serde_json::to_string_pretty(comparison)?;
    fs::write(&file_path, json)?;
    info!("temperature comparison saved to {}", file_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset};
    use crate::models::observation::TimestampedRecord;

    fn local(day: u32, hour: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(2 * 3600).unwrap()
            .with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn missing_values_render_as_no_data() {
        let mut stats = StatisticsResult::new();
        stats.insert(Statistic::AvgTemperature, Some(6.04));
        stats.insert(Statistic::AvgDayTemperature, None);

        let text = StatisticsReport { stats: &stats, rainy_weekends: 0 }.to_string();
        assert!(text.contains("Average temperature: 6.0°C"));
        assert!(text.contains("Average humidity: no data"));
        assert!(text.contains("Average day temperature: no data"));
        assert!(text.contains("Average night temperature: no data"));
        assert!(text.contains("Rainy weekends during the period: 0"));
        assert!(!text.contains("0.0"));
    }

    #[test]
    fn comparison_keeps_recent_days_only() {
        let historical = Dataset::new(vec![
            TimestampedRecord::new(local(1, 0)).with(AIR_TEMPERATURE, Some(-5.0)),
            TimestampedRecord::new(local(9, 0)).with(AIR_TEMPERATURE, Some(1.0)),
            TimestampedRecord::new(local(9, 1)).with(AIR_TEMPERATURE, None),
            TimestampedRecord::new(local(9, 2)).with(AIR_TEMPERATURE, Some(3.0)),
        ]).unwrap();
        let forecast = Dataset::new(vec![
            TimestampedRecord::new(local(10, 0)).with(AIR_TEMPERATURE, Some(2.0)),
            TimestampedRecord::new(local(10, 1)).with(AIR_TEMPERATURE, Some(4.0)),
        ]).unwrap();

        let comparison = TemperatureComparison::new(&historical, &forecast, 7);

        assert_eq!(comparison.historical.len(), 2);
        assert_eq!(comparison.historical_smooth.len(), 25);
        assert_eq!(comparison.historical_smooth.value_at(&local(9, 1)), Some(2.0));
        assert_eq!(comparison.forecast.len(), 2);
        assert_eq!(comparison.forecast_smooth.len(), 13);
    }

    #[test]
    fn huge_days_back_keeps_all_history() {
        let historical = Dataset::new(vec![
            TimestampedRecord::new(local(1, 0)).with(AIR_TEMPERATURE, Some(-5.0)),
            TimestampedRecord::new(local(9, 0)).with(AIR_TEMPERATURE, Some(1.0)),
        ]).unwrap();

        let comparison = TemperatureComparison::new(&historical, &Dataset::empty(), 1_000_000_000);
        assert_eq!(comparison.historical.len(), 2);

        let comparison = TemperatureComparison::new(&historical, &Dataset::empty(), i64::MAX);
        assert_eq!(comparison.historical.len(), 2);
    }

    #[test]
    fn comparison_of_empty_data_is_empty() {
        let empty: Dataset<FixedOffset> = Dataset::empty();
        let comparison = TemperatureComparison::new(&empty, &empty, 7);

        assert!(comparison.historical.is_empty());
        assert!(comparison.forecast_smooth.is_empty());
    }
}
