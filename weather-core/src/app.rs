//! Lookup/render orchestration for a single weather panel.
//!
//! `WeatherApp` owns the only mutable state of a session: the selected unit,
//! the last successful forecast and a generation counter that lets a late
//! response from an older lookup be dropped instead of overwriting a newer one.

use chrono::{Local, NaiveDateTime};
use std::time::Duration;

use crate::{
    config::{Config, DEFAULT_CITY},
    error::LookupError,
    model::{DisplayUnit, ForecastQuery, ForecastResult},
    provider::ForecastSource,
    render::{RenderableForecast, render},
};

/// Host surface with the named display slots of the weather panel.
pub trait RenderTarget {
    fn set_loading(&mut self, visible: bool);
    fn show_error(&mut self, message: &str);
    fn hide_error(&mut self);
    fn set_weather_visible(&mut self, visible: bool);
    /// Mark `unit` as the active toggle control.
    fn set_active_unit(&mut self, unit: DisplayUnit);
    fn show_forecast(&mut self, view: &RenderableForecast);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Displayed,
    Failed,
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    phase: Phase,
    unit: DisplayUnit,
    current: Option<ForecastResult>,
    generation: u64,
}

impl AppState {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn unit(&self) -> DisplayUnit {
        self.unit
    }

    pub fn current(&self) -> Option<&ForecastResult> {
        self.current.as_ref()
    }
}

/// Identifies one started lookup; only the newest ticket may update state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct LookupTicket {
    generation: u64,
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

#[derive(Debug)]
pub struct WeatherApp<S> {
    source: S,
    state: AppState,
    default_city: String,
    startup_delay: Duration,
    clock: fn() -> NaiveDateTime,
}

impl<S: ForecastSource> WeatherApp<S> {
    pub fn new(source: S, unit: DisplayUnit) -> Self {
        Self {
            source,
            state: AppState { unit, ..AppState::default() },
            default_city: DEFAULT_CITY.to_string(),
            startup_delay: Duration::from_millis(500),
            clock: local_now,
        }
    }

    pub fn from_config(source: S, config: &Config) -> Self {
        Self::new(source, config.unit).with_startup(&config.default_city, config.startup_delay())
    }

    pub fn with_startup(mut self, default_city: &str, delay: Duration) -> Self {
        self.default_city = default_city.to_string();
        self.startup_delay = delay;
        self
    }

    /// Replace the wall clock used to pick upcoming hours.
    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Wait for the startup delay, then look up the default city.
    pub async fn initial_load<T: RenderTarget + ?Sized>(&mut self, target: &mut T) -> Phase {
        target.set_active_unit(self.state.unit);
        tokio::time::sleep(self.startup_delay).await;

        let city = self.default_city.clone();
        self.lookup(&city, target).await
    }

    /// Fetch `city` and display it, or show why it failed.
    pub async fn lookup<T: RenderTarget + ?Sized>(&mut self, city: &str, target: &mut T) -> Phase {
        let query = match ForecastQuery::new(city) {
            Ok(query) => query,
            Err(err) => {
                // Any lookup still in flight must not replace this error.
                self.state.generation += 1;
                self.fail(&err.user_message(), target);
                return self.state.phase;
            }
        };

        let ticket = self.begin_lookup(target);
        let result = self.source.fetch(&query).await;
        self.finish_lookup(ticket, result, target);

        self.state.phase
    }

    /// Enter `Loading`: clears the error and hides the current display.
    pub fn begin_lookup<T: RenderTarget + ?Sized>(&mut self, target: &mut T) -> LookupTicket {
        self.state.generation += 1;
        self.state.phase = Phase::Loading;

        target.set_loading(true);
        target.hide_error();
        target.set_weather_visible(false);

        LookupTicket { generation: self.state.generation }
    }

    /// Apply the outcome of a lookup. Returns `false` if a newer lookup has
    /// started since `ticket` was issued; the outcome is then dropped.
    pub fn finish_lookup<T: RenderTarget + ?Sized>(
        &mut self,
        ticket: LookupTicket,
        result: Result<ForecastResult, LookupError>,
        target: &mut T,
    ) -> bool {
        if ticket.generation != self.state.generation {
            tracing::debug!(
                stale = ticket.generation,
                latest = self.state.generation,
                "discarding stale lookup result"
            );
            return false;
        }

        target.set_loading(false);

        match result {
            Ok(forecast) => {
                tracing::info!(city = %forecast.location.name, "forecast received");
                self.state.current = Some(forecast);
                self.display(target);
            }
            Err(err) => {
                tracing::warn!(error = %err, "lookup failed");
                self.fail(&err.user_message(), target);
            }
        }

        true
    }

    /// Switch units, re-rendering the stored forecast when one is displayed.
    pub fn set_unit<T: RenderTarget + ?Sized>(&mut self, unit: DisplayUnit, target: &mut T) {
        if self.state.unit == unit {
            return;
        }

        self.state.unit = unit;
        target.set_active_unit(unit);

        if self.state.phase == Phase::Displayed {
            self.display(target);
        }
    }

    pub fn toggle_unit<T: RenderTarget + ?Sized>(&mut self, target: &mut T) {
        self.set_unit(self.state.unit.toggled(), target);
    }

    fn display<T: RenderTarget + ?Sized>(&mut self, target: &mut T) {
        let Some(current) = self.state.current.as_ref() else {
            return;
        };

        match render(current, self.state.unit, (self.clock)()) {
            Ok(view) => {
                target.hide_error();
                target.show_forecast(&view);
                target.set_weather_visible(true);
                self.state.phase = Phase::Displayed;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to render forecast");
                self.fail(&err.user_message(), target);
            }
        }
    }

    fn fail<T: RenderTarget + ?Sized>(&mut self, message: &str, target: &mut T) {
        self.state.phase = Phase::Failed;
        target.set_loading(false);
        target.set_weather_visible(false);
        target.show_error(message);
    }
}
