use chrono::{DateTime, TimeZone};
use serde::{Serialize, Serializer};
use serde::ser::SerializeSeq;
use crate::errors::DatasetError;

/// Ordered (timestamp, value) pairs where a value may be missing
#[derive(Clone, Debug)]
pub struct TemperatureSeries<Tz: TimeZone> {
    points: Vec<(DateTime<Tz>, Option<f64>)>,
}

impl<Tz: TimeZone> TemperatureSeries<Tz> {
    /// Returns a series after checking that timestamps are strictly ascending
    ///
    /// # Arguments
    ///
    /// * 'points' - timestamp and value pairs in ascending order
    pub fn new(points: Vec<(DateTime<Tz>, Option<f64>)>) -> Result<TemperatureSeries<Tz>, DatasetError> {
        for (i, pair) in points.windows(2).enumerate() {
            if pair[1].0 == pair[0].0 {
                return Err(DatasetError::DuplicateTimestamp { index: i + 1 });
            }
            if pair[1].0 < pair[0].0 {
                return Err(DatasetError::NotAscending { index: i + 1 });
            }
        }

        Ok(TemperatureSeries { points })
    }

    pub(crate) fn from_sorted(points: Vec<(DateTime<Tz>, Option<f64>)>) -> TemperatureSeries<Tz> {
        TemperatureSeries { points }
    }

    pub fn empty() -> TemperatureSeries<Tz> {
        TemperatureSeries { points: Vec::new() }
    }

    pub fn points(&self) -> &[(DateTime<Tz>, Option<f64>)] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns only the points carrying a value
    pub fn known_points(&self) -> Vec<(DateTime<Tz>, f64)> {
        self.points
            .iter()
            .filter_map(|(t, v)| v.map(|v| (t.clone(), v)))
            .collect()
    }

    /// Returns the value at exactly the given timestamp, None if there is no such point
    /// or if the point is null
    pub fn value_at(&self, timestamp: &DateTime<Tz>) -> Option<f64> {
        self.points
            .binary_search_by(|(t, _)| t.cmp(timestamp))
            .ok()
            .and_then(|i| self.points[i].1)
    }
}

#[derive(Serialize)]
struct SeriesPoint<'a> {
    time: &'a str,
    value: Option<f64>,
}

/// Serializes as a list of `{"time": RFC 3339, "value": number or null}` objects
impl<Tz: TimeZone> Serialize for TemperatureSeries<Tz>
where
    Tz::Offset: std::fmt::Display,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.points.len()))?;
        for (t, v) in &self.points {
            let time = t.to_rfc3339();
            seq.serialize_element(&SeriesPoint { time: &time, value: *v })?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn new_rejects_unordered_points() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2024, 1, 1, 1, 0, 0).unwrap();

        assert!(TemperatureSeries::new(vec![(t0, Some(1.0)), (t1, None)]).is_ok());
        assert_eq!(
            TemperatureSeries::new(vec![(t1, Some(1.0)), (t0, None)]).unwrap_err(),
            DatasetError::NotAscending { index: 1 });
        assert_eq!(
            TemperatureSeries::new(vec![(t0, Some(1.0)), (t0, None)]).unwrap_err(),
            DatasetError::DuplicateTimestamp { index: 1 });
    }

    #[test]
    fn known_points_and_value_at() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2024, 1, 1, 1, 0, 0).unwrap();
        let series = TemperatureSeries::new(vec![(t0, None), (t1, Some(3.5))]).unwrap();

        assert_eq!(series.known_points(), vec![(t1, 3.5)]);
        assert_eq!(series.value_at(&t0), None);
        assert_eq!(series.value_at(&t1), Some(3.5));
    }

    #[test]
    fn serializes_nulls() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let series = TemperatureSeries::new(vec![(t0, None)]).unwrap();
        let json = serde_json::to_string(&series).unwrap();
        assert_eq!(json, r#"[{"time":"2024-01-01T00:00:00+00:00","value":null}]"#);
    }
}
