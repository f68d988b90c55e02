pub mod meteo_lt;
pub mod observation;
pub mod statistics;
pub mod temperature_series;
