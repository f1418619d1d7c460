//! Core library for the `weather` widget.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The WeatherAPI.com forecast client and its failure classification
//! - Rendering of a forecast into unit-aware display strings
//! - The lookup/display state machine driving a render target
//!
//! It is used by `weather-cli`, but can also be reused by other front-ends.

pub mod app;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod render;

pub use app::{LookupTicket, Phase, RenderTarget, WeatherApp};
pub use config::Config;
pub use error::{LookupError, RenderError};
pub use model::{DisplayUnit, ForecastQuery, ForecastResult};
pub use provider::{ForecastSource, WeatherApiClient};
pub use render::{HourCard, HourlyDisplay, RenderableForecast, render};
