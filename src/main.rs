use std::env;
use anyhow::{Context, Result};
use chrono::{Local, TimeDelta};
use log::{error, info, warn};
use meteostats::config::{load_config, Config};
use meteostats::logging::setup_logger;
use meteostats::manager_meteo::Meteo;
use meteostats::models::observation::Dataset;
use meteostats::plot::plot_comparison;
use meteostats::report::{display_statistics, save_comparison, TemperatureComparison};
use meteostats::{calculate_yearly_statistics, count_rainy_weekends};

const DEFAULT_CONFIG: &str = "config.toml";

fn main() {
    let config_path = env::args()
        .skip(1)
        .find_map(|a| a.strip_prefix("--config=").map(|p| p.to_string()))
        .unwrap_or(DEFAULT_CONFIG.to_string());

    let config = match load_config(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = setup_logger(&config.general) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
    info!("meteostats version: {}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&config) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

/// Fetches a year of observations and the forecast, prints statistics and exports
/// the temperature comparison
///
/// # Arguments
///
/// * 'config' - loaded configuration
fn run(config: &Config) -> Result<()> {
    let meteo = match &config.files.input_dir {
        Some(dir) => Meteo::from_files(dir, &config.location.code, Local),
        None => Meteo::new(&config.meteo, &config.location.code, Local)
            .context("failed to create meteo client")?,
    };

    let end = Local::now().date_naive();
    let start = TimeDelta::try_days(config.history.days_back)
        .and_then(|d| end.checked_sub_signed(d))
        .context("history days_back out of range")?;

    let historical = meteo.get_historical_data(start, end)
        .context("failed to get historical data")?;
    if historical.is_empty() {
        anyhow::bail!("no historical data for {} - {}", start, end);
    }

    let stats = calculate_yearly_statistics(&historical);
    let rainy_weekends = count_rainy_weekends(&historical);
    display_statistics(&stats, rainy_weekends);

    // The comparison still holds history without a forecast
    let forecast = meteo.get_forecast().unwrap_or_else(|e| {
        warn!("failed to get forecast: {}", e);
        Dataset::empty()
    });

    let comparison = TemperatureComparison::new(&historical, &forecast, config.plot.days_back);
    save_comparison(&config.files.output_dir, &comparison)
        .context("failed to save temperature comparison")?;
    plot_comparison(&config.files.output_dir, &comparison)
        .context("failed to plot temperature comparison")?;

    Ok(())
}
