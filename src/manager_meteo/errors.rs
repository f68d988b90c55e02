use thiserror::Error;
use crate::errors::DatasetError;

#[derive(Error, Debug)]
#[error("error in communication with meteo.lt: {0}")]
pub struct MeteoError(pub String);
impl From<serde_json::Error> for MeteoError {
    fn from(e: serde_json::Error) -> MeteoError {
        MeteoError(format!("json document error: {}", e.to_string()))
    }
}
impl From<reqwest::Error> for MeteoError {
    fn from(e: reqwest::Error) -> MeteoError {
        MeteoError(format!("http request error: {}", e.to_string()))
    }
}
impl From<DatasetError> for MeteoError {
    fn from(e: DatasetError) -> MeteoError {
        MeteoError(format!("malformed data: {}", e.to_string()))
    }
}
impl From<std::io::Error> for MeteoError {
    fn from(e: std::io::Error) -> MeteoError {
        MeteoError(format!("file error: {}", e.to_string()))
    }
}
impl From<glob::PatternError> for MeteoError {
    fn from(e: glob::PatternError) -> MeteoError {
        MeteoError(format!("file pattern error: {}", e.to_string()))
    }
}
