//! Turns a [`ForecastResult`] into display strings for the render target.
//!
//! Rendering is a pure function of the result, the selected unit and the
//! current local time, so toggling units never needs a new lookup.

use chrono::{NaiveDateTime, Timelike};
use serde::Serialize;

use crate::{
    error::RenderError,
    model::{Condition, DisplayUnit, ForecastResult, HourlyEntry},
};

/// Placeholder shown instead of an empty hourly list.
pub const NOT_AVAILABLE_TEXT: &str = "Hourly forecast not available";

const HOUR_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Display strings for every slot of the weather panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderableForecast {
    pub unit: DisplayUnit,
    pub city_name: String,
    /// `"{region}, {country}"`
    pub region: String,
    pub temperature: String,
    pub description: String,
    pub feels_like: String,
    pub humidity: String,
    pub wind_speed: String,
    pub pressure: String,
    pub uv: String,
    pub icon_url: String,
    pub icon_alt: String,
    pub hourly: HourlyDisplay,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum HourlyDisplay {
    Hours(Vec<HourCard>),
    NotAvailable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourCard {
    pub time_label: String,
    pub icon_url: String,
    pub icon_alt: String,
    pub temperature: String,
    pub condition: String,
}

pub fn render(
    result: &ForecastResult,
    unit: DisplayUnit,
    now: NaiveDateTime,
) -> Result<RenderableForecast, RenderError> {
    let location = &result.location;
    let current = &result.current;

    Ok(RenderableForecast {
        unit,
        city_name: location.name.clone(),
        region: format!("{}, {}", location.region, location.country),
        temperature: format_temperature(unit.pick(current.temp_c, current.temp_f), unit),
        description: current.condition.text.clone(),
        feels_like: format!(
            "Feels like {}",
            format_temperature(unit.pick(current.feelslike_c, current.feelslike_f), unit)
        ),
        humidity: format!("{}%", current.humidity),
        wind_speed: format!("{} km/h", current.wind_kph),
        pressure: format!("{} mb", current.pressure_mb),
        uv: current.uv.to_string(),
        icon_url: icon_url(&current.condition),
        icon_alt: current.condition.text.clone(),
        hourly: render_hours(&result.hours, unit, now)?,
    })
}

fn render_hours(
    hours: &[HourlyEntry],
    unit: DisplayUnit,
    now: NaiveDateTime,
) -> Result<HourlyDisplay, RenderError> {
    if hours.is_empty() {
        return Ok(HourlyDisplay::NotAvailable);
    }

    let timed = hours
        .iter()
        .map(|entry| -> Result<_, RenderError> { Ok((parse_hour_time(&entry.time)?, entry)) })
        .collect::<Result<Vec<_>, _>>()?;

    let upcoming: Vec<_> = timed.iter().filter(|(time, _)| *time >= now).collect();

    // Past the last hour of the day: show the whole day rather than nothing.
    let selected: Vec<_> = if upcoming.is_empty() { timed.iter().collect() } else { upcoming };

    let cards = selected
        .into_iter()
        .map(|(time, entry)| HourCard {
            time_label: hour_label(time.hour()),
            icon_url: icon_url(&entry.condition),
            icon_alt: entry.condition.text.clone(),
            temperature: format_temperature(unit.pick(entry.temp_c, entry.temp_f), unit),
            condition: entry.condition.text.clone(),
        })
        .collect();

    Ok(HourlyDisplay::Hours(cards))
}

fn parse_hour_time(raw: &str) -> Result<NaiveDateTime, RenderError> {
    NaiveDateTime::parse_from_str(raw.trim(), HOUR_TIME_FORMAT)
        .map_err(|e| RenderError::MalformedEntry(format!("time '{raw}': {e}")))
}

/// 12-hour clock label for an hour of the day (`0` → `"12 AM"`, `13` → `"1 PM"`).
pub fn hour_label(hour: u32) -> String {
    let display = match hour % 12 {
        0 => 12,
        h => h,
    };
    let suffix = if hour >= 12 { "PM" } else { "AM" };
    format!("{display} {suffix}")
}

/// Whole degrees with the unit suffix, e.g. `"20°C"`.
pub fn format_temperature(value: f64, unit: DisplayUnit) -> String {
    format!("{}°{}", round_half_up(value), unit.symbol())
}

/// Ties round towards positive infinity, so `-2.5` becomes `-2`.
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// The API hands out protocol-relative icon paths.
fn icon_url(condition: &Condition) -> String {
    format!("https:{}", condition.icon)
}
