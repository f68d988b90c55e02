use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use chrono::{NaiveDateTime, TimeDelta, TimeZone};
use log::{info, warn};
use plotters::coord::types::RangedDateTime;
use plotters::prelude::*;
use crate::errors::ReportError;
use crate::models::temperature_series::TemperatureSeries;
use crate::report::TemperatureComparison;

/// File name for the rendered comparison chart
pub const PLOT_FILE: &str = "temperature_comparison.svg";

const PLOT_SIZE: (u32, u32) = (1500, 800);

/// Draws measured against forecasted temperatures to an svg chart in the output directory.
/// Known points are drawn as markers on top of the 5 minute interpolated lines.
///
/// Returns the path to the chart, or None if there is not a single temperature to draw.
///
/// # Arguments
///
/// * 'output_dir' - directory to save the chart to
/// * 'comparison' - measured and forecasted temperatures
pub fn plot_comparison<Tz: TimeZone>(output_dir: &str, comparison: &TemperatureComparison<Tz>) -> Result<Option<PathBuf>, ReportError>
where
    Tz::Offset: Display,
{
    let historical = plot_points(&comparison.historical);
    let historical_smooth = plot_points(&comparison.historical_smooth);
    let forecast = plot_points(&comparison.forecast);
    let forecast_smooth = plot_points(&comparison.forecast_smooth);

    let Some((mut min_t, mut max_t, min_v, max_v)) = bounds(&[&historical, &historical_smooth, &forecast, &forecast_smooth]) else {
        warn!("no temperatures to plot");
        return Ok(None);
    };
    if min_t == max_t {
        min_t = min_t - TimeDelta::hours(1);
        max_t = max_t + TimeDelta::hours(1);
    }
    let padding = if max_v - min_v > 1e-6 { (max_v - min_v) * 0.1 } else { 1.0 };

    fs::create_dir_all(output_dir)?;
    let file_path = Path::new(output_dir).join(PLOT_FILE);
    {
        let root = SVGBackend::new(&file_path, PLOT_SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Temperature: measured vs forecast", ("sans-serif", 30))
            .margin(15)
            .x_label_area_size(60)
            .y_label_area_size(60)
            .build_cartesian_2d(RangedDateTime::from(min_t..max_t), (min_v - padding)..(max_v + padding))?;

        chart
            .configure_mesh()
            .x_desc("Time")
            .y_desc("Temperature (°C)")
            .x_label_formatter(&|t: &NaiveDateTime| t.format("%m-%d %H:%M").to_string())
            .light_line_style(BLACK.mix(0.15))
            .draw()?;

        chart.draw_series(LineSeries::new(historical_smooth, BLUE.mix(0.5)))?;
        chart
            .draw_series(historical.iter().map(|p| Circle::new(*p, 3, BLUE.filled())))?
            .label("Measured temperature")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

        chart.draw_series(LineSeries::new(forecast_smooth, RED.mix(0.5)))?;
        chart
            .draw_series(forecast.iter().map(|p| TriangleMarker::new(*p, 4, RED.filled())))?
            .label("Forecast temperature")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        root.present()?;
    }
    info!("temperature chart saved to {}", file_path.display());

    Ok(Some(file_path))
}

/// Known values on local wall clock time
fn plot_points<Tz: TimeZone>(series: &TemperatureSeries<Tz>) -> Vec<(NaiveDateTime, f64)> {
    series.known_points()
        .into_iter()
        .map(|(t, v)| (t.naive_local(), v))
        .collect()
}

/// Time and value ranges over all series, None if they are all empty
fn bounds(series: &[&Vec<(NaiveDateTime, f64)>]) -> Option<(NaiveDateTime, NaiveDateTime, f64, f64)> {
    let mut points = series.iter().flat_map(|s| s.iter());
    let (t, v) = *points.next()?;

    Some(points.fold((t, t, v, v), |(min_t, max_t, min_v, max_v), (t, v)| {
        (min_t.min(*t), max_t.max(*t), min_v.min(*v), max_v.max(*v))
    }))
}
