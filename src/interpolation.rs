use chrono::{DateTime, TimeDelta, TimeZone};
use log::debug;
use crate::models::temperature_series::TemperatureSeries;

/// Output resolution in minutes
pub const INTERVAL_MINUTES: i64 = 5;

/// Resamples a series to a fixed 5 minute grid using time weighted linear interpolation.
///
/// The grid starts at the earliest input timestamp and steps 5 minutes until the latest
/// input timestamp. Grid points holding a known input value keep it. Any other point between
/// two known values is interpolated between the closest known input points on each side,
/// weighted by elapsed time, so nulls in between are skipped over. Points before the first
/// or after the last known value stay null.
///
/// # Arguments
///
/// * 'series' - input series, typically hourly
pub fn interpolate_temperature_data<Tz: TimeZone>(series: &TemperatureSeries<Tz>) -> TemperatureSeries<Tz> {
    let (Some((start, _)), Some((end, _))) = (series.points().first(), series.points().last()) else {
        return TemperatureSeries::empty();
    };

    let known = series.known_points();
    let grid = grid(start, end);
    debug!("resampling {} points ({} known) to {} grid points", series.len(), known.len(), grid.len());

    let points = grid
        .into_iter()
        .map(|t| {
            let value = value_at(&known, &t);
            (t, value)
        })
        .collect::<Vec<(DateTime<Tz>, Option<f64>)>>();

    TemperatureSeries::from_sorted(points)
}

/// Every 5 minute step from start up to and including end
fn grid<Tz: TimeZone>(start: &DateTime<Tz>, end: &DateTime<Tz>) -> Vec<DateTime<Tz>> {
    let step = TimeDelta::minutes(INTERVAL_MINUTES);
    let mut grid = Vec::new();
    let mut t = start.clone();
    while t <= *end {
        grid.push(t.clone());
        t = t + step;
    }

    grid
}

/// Value at t given the known points, None outside the known span
///
/// # Arguments
///
/// * 'known' - known points in ascending order
/// * 't' - time to get a value for
fn value_at<Tz: TimeZone>(known: &[(DateTime<Tz>, f64)], t: &DateTime<Tz>) -> Option<f64> {
    let after = known.partition_point(|(k, _)| k < t);
    let (t1, v1) = known.get(after)?;
    if t1 == t {
        return Some(*v1);
    }
    let (t0, v0) = known.get(after.checked_sub(1)?)?;

    let elapsed = (t.clone() - t0.clone()).num_milliseconds() as f64;
    let span = (t1.clone() - t0.clone()).num_milliseconds() as f64;

    Some(v0 + (v1 - v0) * elapsed / span)
}
