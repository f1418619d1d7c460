use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::LookupError,
    model::{ForecastQuery, ForecastResult},
};

pub mod weatherapi;

pub use weatherapi::WeatherApiClient;

/// Anything that can turn a city into a forecast snapshot.
///
/// The orchestrator only depends on this trait, which keeps it testable
/// without a network.
#[async_trait]
pub trait ForecastSource: Send + Sync + Debug {
    async fn fetch(&self, query: &ForecastQuery) -> Result<ForecastResult, LookupError>;
}
