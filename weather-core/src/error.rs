//! Failure kinds surfaced by a lookup or a render.

use thiserror::Error;

/// Why a forecast lookup did not produce a result.
///
/// Every variant is terminal for the attempt; nothing is retried.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Please enter a city name")]
    EmptyInput,

    #[error("City not found. Please check the spelling and try again.")]
    CityNotFound,

    #[error("Invalid API key. Please check your API key at weatherapi.com")]
    InvalidCredential,

    #[error("API Error: {0}")]
    ApiError(u16),

    #[error("Unable to retrieve forecast data. Please try again.")]
    MalformedResponse,

    #[error("Unable to fetch weather data. Please try again.")]
    NetworkFailure(#[source] reqwest::Error),

    #[error("The weather service did not respond in time. Please try again.")]
    Timeout,
}

impl LookupError {
    /// Text shown in the error slot of the render target.
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// Map a transport-level failure to its lookup error kind.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::NetworkFailure(err)
        }
    }
}

/// A forecast that could not be turned into display strings.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("malformed hourly entry: {0}")]
    MalformedEntry(String),
}

impl RenderError {
    /// Generic display-error text; the detail only goes to the log.
    pub fn user_message(&self) -> String {
        "Error displaying weather data. Please try again.".to_string()
    }
}
