use chrono::{DateTime, NaiveDateTime, TimeZone};
use serde::Deserialize;
use serde_json::{Map, Value};
use crate::errors::DatasetError;
use crate::models::observation::{TimestampedRecord, PRECIPITATION};

/// Time format used by meteo.lt for all UTC timestamps
const METEO_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Forecast documents name accumulated precipitation differently from observations
const FORECAST_PRECIPITATION: &str = "totalPrecipitation";

#[derive(Deserialize, Debug)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Deserialize, Debug)]
pub struct Station {
    pub code: String,
    pub name: String,
    pub coordinates: Option<Coordinates>,
}

#[derive(Deserialize, Debug)]
pub struct ObservationEntry {
    #[serde(rename = "observationTimeUtc")]
    pub observation_time_utc: Option<String>,
    #[serde(flatten)]
    pub values: Map<String, Value>,
}

#[derive(Deserialize, Debug)]
pub struct Observations {
    #[serde(default)]
    pub observations: Vec<ObservationEntry>,
}

#[derive(Deserialize, Debug)]
pub struct ForecastEntry {
    #[serde(rename = "forecastTimeUtc")]
    pub forecast_time_utc: String,
    #[serde(flatten)]
    pub values: Map<String, Value>,
}

#[derive(Deserialize, Debug)]
pub struct LongTermForecast {
    #[serde(rename = "forecastTimestamps", default)]
    pub forecast_timestamps: Vec<ForecastEntry>,
}

impl Observations {
    /// Converts observation entries to records localized to the given timezone.
    /// Entries without an observation time are skipped.
    ///
    /// # Arguments
    ///
    /// * 'tz' - timezone to convert the UTC observation times to
    pub fn to_records<Tz: TimeZone>(&self, tz: &Tz) -> Result<Vec<TimestampedRecord<Tz>>, DatasetError> {
        let mut records = Vec::with_capacity(self.observations.len());
        for entry in &self.observations {
            if let Some(time) = &entry.observation_time_utc {
                records.push(to_record(time, &entry.values, tz)?);
            }
        }

        Ok(records)
    }
}

impl LongTermForecast {
    /// Converts forecast entries to records localized to the given timezone.
    ///
    /// # Arguments
    ///
    /// * 'tz' - timezone to convert the UTC forecast times to
    pub fn to_records<Tz: TimeZone>(&self, tz: &Tz) -> Result<Vec<TimestampedRecord<Tz>>, DatasetError> {
        self.forecast_timestamps
            .iter()
            .map(|e| to_record(&e.forecast_time_utc, &e.values, tz))
            .collect()
    }
}

/// Parses a meteo.lt UTC timestamp and converts it to the given timezone
///
/// # Arguments
///
/// * 'time' - timestamp string, e.g. "2024-05-01 13:00:00"
/// * 'tz' - target timezone
pub fn parse_utc<Tz: TimeZone>(time: &str, tz: &Tz) -> Result<DateTime<Tz>, DatasetError> {
    let naive = NaiveDateTime::parse_from_str(time, METEO_TIME_FORMAT)
        .map_err(|e| DatasetError::UnparseableTimestamp(format!("{}: {}", time, e)))?;

    Ok(naive.and_utc().with_timezone(tz))
}

/// Builds a record from the numeric members of an entry. Nulls are kept as gaps
/// while strings (e.g. conditionCode) are not numeric fields and are left out.
fn to_record<Tz: TimeZone>(time: &str, values: &Map<String, Value>, tz: &Tz) -> Result<TimestampedRecord<Tz>, DatasetError> {
    let mut record = TimestampedRecord::new(parse_utc(time, tz)?);

    for (name, value) in values {
        let name = if name == FORECAST_PRECIPITATION { PRECIPITATION } else { name.as_str() };
        match value {
            Value::Number(n) => { record.fields.insert(name.to_string(), n.as_f64()); },
            Value::Null => { record.fields.insert(name.to_string(), None); },
            _ => {},
        }
    }

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Timelike};
    use crate::models::observation::{AIR_TEMPERATURE, RELATIVE_HUMIDITY};

    #[test]
    fn observations_are_localized_and_numeric_only() {
        let json = r#"{
            "station": {"code": "kauno-ams", "name": "Kauno AMS"},
            "observations": [
                {"observationTimeUtc": "2024-05-01 21:00:00", "airTemperature": 11.3,
                 "relativeHumidity": null, "conditionCode": "clear"}
            ]
        }"#;
        let doc: Observations = serde_json::from_str(json).unwrap();
        let tz = FixedOffset::east_opt(3 * 3600).unwrap();
        let records = doc.to_records(&tz).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].timestamp.hour(), 0);
        assert_eq!(records[0].value(AIR_TEMPERATURE), Some(11.3));
        assert_eq!(records[0].fields.get(RELATIVE_HUMIDITY), Some(&None));
        assert!(!records[0].fields.contains_key("conditionCode"));
    }

    #[test]
    fn forecast_precipitation_is_normalized() {
        let json = r#"{
            "forecastTimestamps": [
                {"forecastTimeUtc": "2024-05-02 00:00:00", "airTemperature": 8.0, "totalPrecipitation": 0.4}
            ]
        }"#;
        let doc: LongTermForecast = serde_json::from_str(json).unwrap();
        let records = doc.to_records(&chrono::Utc).unwrap();

        assert_eq!(records[0].value(PRECIPITATION), Some(0.4));
        assert!(!records[0].fields.contains_key(FORECAST_PRECIPITATION));
    }

    #[test]
    fn bad_timestamp_is_malformed_input() {
        let result = parse_utc("01/05/2024 13:00", &chrono::Utc);
        assert!(matches!(result, Err(DatasetError::UnparseableTimestamp(_))));
    }
}
