pub mod errors;

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use chrono::{NaiveDate, TimeDelta, TimeZone};
use glob::glob;
use log::{info, warn};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use crate::config::MeteoParameters;
use crate::models::meteo_lt::{LongTermForecast, Observations, Station};
use crate::models::observation::{Dataset, TimestampedRecord};
pub use errors::MeteoError;

/// File name suffix for offline observation documents, e.g. 2024-05-01_observations.json
const OBSERVATIONS_SUFFIX: &str = "_observations.json";

/// File name of the offline forecast document
const FORECAST_FILE: &str = "forecast.json";

/// Where documents are read from
enum Source {
    Api { client: Client, base_url: String, request_delay: Duration },
    Files { input_dir: PathBuf },
}

/// Struct for retrieving observations and forecasts from meteo.lt
///
/// All timestamps are converted to the timezone given at construction, and the returned
/// datasets are sorted with duplicate timestamps removed.
pub struct Meteo<Tz: TimeZone> {
    source: Source,
    location_code: String,
    tz: Tz,
}

impl<Tz: TimeZone> Meteo<Tz> {
    /// Returns a Meteo struct fetching from the meteo.lt REST API
    ///
    /// # Arguments
    ///
    /// * 'params' - API parameters
    /// * 'location_code' - place code, e.g. kaunas
    /// * 'tz' - timezone to localize timestamps to
    pub fn new(params: &MeteoParameters, location_code: &str, tz: Tz) -> Result<Meteo<Tz>, MeteoError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(params.timeout_secs))
            .build()?;

        let source = Source::Api {
            client,
            base_url: params.base_url.clone(),
            request_delay: Duration::from_millis(params.request_delay_ms),
        };

        Ok(Meteo { source, location_code: location_code.to_string(), tz })
    }

    /// Returns a Meteo struct reading previously saved documents from a directory
    ///
    /// # Arguments
    ///
    /// * 'input_dir' - directory holding *_observations.json files and forecast.json
    /// * 'location_code' - place code, e.g. kaunas
    /// * 'tz' - timezone to localize timestamps to
    pub fn from_files(input_dir: &str, location_code: &str, tz: Tz) -> Meteo<Tz> {
        let source = Source::Files { input_dir: PathBuf::from(input_dir) };

        Meteo { source, location_code: location_code.to_string(), tz }
    }

    /// Retrieves observations for every day between start and end inclusive.
    ///
    /// Days that can't be fetched are logged and skipped.
    ///
    /// # Arguments
    ///
    /// * 'start' - first day
    /// * 'end' - last day
    pub fn get_historical_data(&self, start: NaiveDate, end: NaiveDate) -> Result<Dataset<Tz>, MeteoError> {
        let records = match &self.source {
            Source::Api { client, base_url, request_delay } => {
                let station_code = self.get_station_code(client, base_url)?;
                let mut records: Vec<TimestampedRecord<Tz>> = Vec::new();

                let mut date = start;
                while date <= end {
                    match self.get_day_observations(client, base_url, &station_code, date) {
                        Ok(mut day) => records.append(&mut day),
                        Err(e) => warn!("skipping observations for {}: {}", date, e),
                    }
                    thread::sleep(*request_delay);
                    date = date + TimeDelta::days(1);
                }
                records
            },
            Source::Files { input_dir } => {
                self.read_observation_files(input_dir)?
                    .into_iter()
                    .filter(|r| {
                        let date = r.timestamp.date_naive();
                        date >= start && date <= end
                    })
                    .collect()
            },
        };

        let dataset = Dataset::from_unordered(records);
        info!("retrieved {} historical records for {} - {}", dataset.len(), start, end);

        Ok(dataset)
    }

    /// Retrieves the long term forecast for the location
    pub fn get_forecast(&self) -> Result<Dataset<Tz>, MeteoError> {
        let json = match &self.source {
            Source::Api { client, base_url, .. } => {
                let url = format!("{}/places/{}/forecasts/long-term", base_url, self.location_code);
                get_document(client, &url)?
            },
            Source::Files { input_dir } => fs::read_to_string(input_dir.join(FORECAST_FILE))?,
        };

        let forecast: LongTermForecast = serde_json::from_str(&json)?;
        if forecast.forecast_timestamps.is_empty() {
            warn!("no forecast data for {}", self.location_code);
        }

        let dataset = Dataset::from_unordered(forecast.to_records(&self.tz)?);
        info!("retrieved {} forecast records", dataset.len());

        Ok(dataset)
    }

    /// Finds the station whose name contains the location code, falling back to the first
    /// station listed if there is no match
    fn get_station_code(&self, client: &Client, base_url: &str) -> Result<String, MeteoError> {
        let json = get_document(client, &format!("{}/stations", base_url))?;
        let stations: Vec<Station> = serde_json::from_str(&json)?;

        select_station(&stations, &self.location_code)
    }

    fn get_day_observations(&self, client: &Client, base_url: &str, station_code: &str, date: NaiveDate)
        -> Result<Vec<TimestampedRecord<Tz>>, MeteoError> {

        let url = format!("{}/stations/{}/observations/{}", base_url, station_code, date.format("%Y-%m-%d"));
        let json = get_document(client, &url)?;
        let observations: Observations = serde_json::from_str(&json)?;

        Ok(observations.to_records(&self.tz)?)
    }

    fn read_observation_files(&self, input_dir: &Path) -> Result<Vec<TimestampedRecord<Tz>>, MeteoError> {
        let pattern = format!("{}/*{}", input_dir.display(), OBSERVATIONS_SUFFIX);
        let mut records: Vec<TimestampedRecord<Tz>> = Vec::new();

        for entry in glob(&pattern)? {
            match entry {
                Ok(path) => {
                    let json = fs::read_to_string(&path)?;
                    let observations: Observations = serde_json::from_str(&json)?;
                    records.append(&mut observations.to_records(&self.tz)?);
                },
                Err(e) => warn!("unreadable observation file: {}", e),
            }
        }

        Ok(records)
    }
}

/// Picks a station code given the location code
///
/// # Arguments
///
/// * 'stations' - stations listed by meteo.lt
/// * 'location_code' - place code to match against station names
pub fn select_station(stations: &[Station], location_code: &str) -> Result<String, MeteoError> {
    let needle = location_code.to_lowercase();
    if let Some(station) = stations.iter().find(|s| s.name.to_lowercase().contains(&needle)) {
        return Ok(station.code.clone());
    }

    match stations.first() {
        Some(station) => {
            warn!("no station matching '{}', using '{}'", location_code, station.code);
            Ok(station.code.clone())
        },
        None => Err(MeteoError("no stations available".to_string())),
    }
}

fn get_document(client: &Client, url: &str) -> Result<String, MeteoError> {
    let res = client.get(url).send()?;

    if res.status() != StatusCode::OK {
        return Err(MeteoError(format!("http status {} for {}", res.status(), url)));
    }

    Ok(res.text()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(code: &str, name: &str) -> Station {
        Station { code: code.to_string(), name: name.to_string(), coordinates: None }
    }

    #[test]
    fn station_matches_name_case_insensitively() {
        let stations = vec![station("vilniaus-ams", "Vilniaus AMS"), station("kauno-ams", "Kauno AMS")];
        assert_eq!(select_station(&stations, "KAUNO").unwrap(), "kauno-ams");
    }

    #[test]
    fn station_falls_back_to_first() {
        let stations = vec![station("vilniaus-ams", "Vilniaus AMS"), station("kauno-ams", "Kauno AMS")];
        assert_eq!(select_station(&stations, "kaunas").unwrap(), "vilniaus-ams");
    }

    #[test]
    fn no_stations_is_an_error() {
        assert!(select_station(&[], "kaunas").is_err());
    }
}
