use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Formatter;
use serde::Serialize;

/// Available yearly statistics
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Statistic {
    AvgTemperature,
    AvgHumidity,
    AvgDayTemperature,
    AvgNightTemperature,
}

impl Statistic {
    pub fn name(&self) -> &'static str {
        match self {
            Statistic::AvgTemperature      => "avg_temperature",
            Statistic::AvgHumidity         => "avg_humidity",
            Statistic::AvgDayTemperature   => "avg_day_temperature",
            Statistic::AvgNightTemperature => "avg_night_temperature",
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Statistic name to value, where a missing key means the source field never existed
/// and a None value means the field existed but had no usable values.
#[derive(Serialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct StatisticsResult(BTreeMap<Statistic, Option<f64>>);

impl StatisticsResult {
    pub fn new() -> StatisticsResult {
        StatisticsResult(BTreeMap::new())
    }

    pub fn insert(&mut self, statistic: Statistic, value: Option<f64>) {
        self.0.insert(statistic, value);
    }

    /// Returns None if the key is absent, Some(None) if present without data
    pub fn get(&self, statistic: Statistic) -> Option<Option<f64>> {
        self.0.get(&statistic).copied()
    }

    /// Returns the value if the key is present and has data
    pub fn value(&self, statistic: Statistic) -> Option<f64> {
        self.get(statistic).flatten()
    }

    pub fn contains(&self, statistic: Statistic) -> bool {
        self.0.contains_key(&statistic)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Statistic, Option<f64>)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_and_none_are_distinct() {
        let mut stats = StatisticsResult::new();
        stats.insert(Statistic::AvgHumidity, None);

        assert_eq!(stats.get(Statistic::AvgHumidity), Some(None));
        assert_eq!(stats.get(Statistic::AvgTemperature), None);
        assert!(stats.contains(Statistic::AvgHumidity));
        assert_eq!(stats.value(Statistic::AvgHumidity), None);
    }

    #[test]
    fn serializes_with_snake_case_keys() {
        let mut stats = StatisticsResult::new();
        stats.insert(Statistic::AvgTemperature, Some(7.5));
        stats.insert(Statistic::AvgNightTemperature, None);

        let json = serde_json::to_string(&stats).unwrap();
        assert_eq!(json, r#"{"avg_temperature":7.5,"avg_night_temperature":null}"#);
    }
}
