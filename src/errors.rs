use thiserror::Error;

/// Contract violations in datasets and series handed to the engine
#[derive(Error, Debug, PartialEq)]
pub enum DatasetError {
    #[error("timestamp at index {index} is earlier than its predecessor")]
    NotAscending { index: usize },
    #[error("timestamp at index {index} duplicates its predecessor")]
    DuplicateTimestamp { index: usize },
    #[error("unparseable timestamp: {0}")]
    UnparseableTimestamp(String),
}

#[derive(Error, Debug)]
#[error("ConfigError: {0}")]
pub struct ConfigError(pub String);
impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError(e.to_string())
    }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError(e.to_string())
    }
}
impl From<&str> for ConfigError {
    fn from(e: &str) -> Self {
        ConfigError(e.to_string())
    }
}

#[derive(Error, Debug)]
#[error("LoggingError: {0}")]
pub struct LoggingError(pub String);
impl From<std::io::Error> for LoggingError {
    fn from(e: std::io::Error) -> Self {
        LoggingError(e.to_string())
    }
}
impl From<log4rs::config::runtime::ConfigErrors> for LoggingError {
    fn from(e: log4rs::config::runtime::ConfigErrors) -> Self {
        LoggingError(e.to_string())
    }
}
impl From<log::SetLoggerError> for LoggingError {
    fn from(e: log::SetLoggerError) -> Self {
        LoggingError(e.to_string())
    }
}

#[derive(Error, Debug)]
#[error("ReportError: {0}")]
pub struct ReportError(pub String);
impl From<std::io::Error> for ReportError {
    fn from(e: std::io::Error) -> Self {
        ReportError(e.to_string())
    }
}
impl From<serde_json::Error> for ReportError {
    fn from(e: serde_json::Error) -> Self {
        ReportError(e.to_string())
    }
}
impl<E: std::error::Error + Send + Sync> From<plotters::drawing::DrawingAreaErrorKind<E>> for ReportError {
    fn from(e: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        ReportError(e.to_string())
    }
}
