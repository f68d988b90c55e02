pub mod config;
pub mod errors;
pub mod interpolation;
pub mod logging;
pub mod manager_meteo;
pub mod models;
pub mod plot;
pub mod report;
pub mod weekends;
pub mod yearly;

pub use interpolation::interpolate_temperature_data;
pub use weekends::count_rainy_weekends;
pub use yearly::calculate_yearly_statistics;
