use std::collections::BTreeMap;
use chrono::{DateTime, TimeZone};
use crate::errors::DatasetError;
use crate::models::temperature_series::TemperatureSeries;

/// Field name for air temperature in degrees Celsius
pub const AIR_TEMPERATURE: &str = "airTemperature";

/// Field name for relative humidity in percent
pub const RELATIVE_HUMIDITY: &str = "relativeHumidity";

/// Field name for precipitation in millimeters
pub const PRECIPITATION: &str = "precipitation";

/// One observation or forecast point.
///
/// A key present with a `None` value means the field is known to the source but the sensor
/// reported nothing for this point, a missing key means the record never carried the field.
#[derive(Clone, Debug, PartialEq)]
pub struct TimestampedRecord<Tz: TimeZone> {
    pub timestamp: DateTime<Tz>,
    pub fields: BTreeMap<String, Option<f64>>,
}

impl<Tz: TimeZone> TimestampedRecord<Tz> {
    pub fn new(timestamp: DateTime<Tz>) -> TimestampedRecord<Tz> {
        TimestampedRecord { timestamp, fields: BTreeMap::new() }
    }

    /// Builder style setter for a field value
    ///
    /// # Arguments
    ///
    /// * 'name' - field name, e.g. airTemperature
    /// * 'value' - the value, None for a sensor gap
    pub fn with(mut self, name: &str, value: Option<f64>) -> TimestampedRecord<Tz> {
        self.fields.insert(name.to_string(), value);
        self
    }

    /// Returns the value of the given field, None if absent or null
    pub fn value(&self, name: &str) -> Option<f64> {
        self.fields.get(name).copied().flatten()
    }
}

/// An ordered collection of records, strictly ascending by timestamp
#[derive(Clone, Debug)]
pub struct Dataset<Tz: TimeZone> {
    records: Vec<TimestampedRecord<Tz>>,
}

impl<Tz: TimeZone> Dataset<Tz> {
    /// Returns a Dataset after checking that timestamps are strictly ascending
    ///
    /// # Arguments
    ///
    /// * 'records' - records in ascending timestamp order
    pub fn new(records: Vec<TimestampedRecord<Tz>>) -> Result<Dataset<Tz>, DatasetError> {
        for (i, pair) in records.windows(2).enumerate() {
            if pair[1].timestamp == pair[0].timestamp {
                return Err(DatasetError::DuplicateTimestamp { index: i + 1 });
            }
            if pair[1].timestamp < pair[0].timestamp {
                return Err(DatasetError::NotAscending { index: i + 1 });
            }
        }

        Ok(Dataset { records })
    }

    /// Returns a Dataset from records merged from several fetches.
    /// Records are sorted and on duplicate timestamps the first record seen is kept.
    ///
    /// # Arguments
    ///
    /// * 'records' - records in any order
    pub fn from_unordered(mut records: Vec<TimestampedRecord<Tz>>) -> Dataset<Tz> {
        records.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        records.dedup_by(|a, b| a.timestamp == b.timestamp);

        Dataset { records }
    }

    pub fn empty() -> Dataset<Tz> {
        Dataset { records: Vec::new() }
    }

    pub fn records(&self) -> &[TimestampedRecord<Tz>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns true if any record carries the given field, null or not
    pub fn has_field(&self, name: &str) -> bool {
        self.records.iter().any(|r| r.fields.contains_key(name))
    }

    /// Projects a single field into a series. Records lacking the field give null points.
    ///
    /// # Arguments
    ///
    /// * 'name' - field to project
    pub fn series(&self, name: &str) -> TemperatureSeries<Tz> {
        let points = self.records
            .iter()
            .map(|r| (r.timestamp.clone(), r.value(name)))
            .collect::<Vec<(DateTime<Tz>, Option<f64>)>>();

        // Dataset ordering already guarantees the series invariant
        TemperatureSeries::from_sorted(points)
    }

    /// Returns a new dataset holding records at or after the cutoff
    ///
    /// # Arguments
    ///
    /// * 'cutoff' - earliest timestamp to keep
    pub fn since(&self, cutoff: &DateTime<Tz>) -> Dataset<Tz> {
        let start = self.records.partition_point(|r| r.timestamp < *cutoff);
        Dataset { records: self.records[start..].to_vec() }
    }

    /// Latest timestamp in the dataset
    pub fn last_timestamp(&self) -> Option<&DateTime<Tz>> {
        self.records.last().map(|r| &r.timestamp)
    }
}
