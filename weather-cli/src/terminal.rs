//! Terminal render target: prints the weather panel slots as plain text.

use std::fmt;

use weather_core::{
    DisplayUnit, HourlyDisplay, RenderTarget, RenderableForecast, render::NOT_AVAILABLE_TEXT,
};

#[derive(Debug, Default)]
pub struct TerminalPanel {
    /// Echo loading and unit-control changes; off for one-shot output.
    chatty: bool,
    view: Option<RenderableForecast>,
}

impl TerminalPanel {
    pub fn quiet() -> Self {
        Self { chatty: false, view: None }
    }

    pub fn interactive() -> Self {
        Self { chatty: true, view: None }
    }
}

impl RenderTarget for TerminalPanel {
    fn set_loading(&mut self, visible: bool) {
        if visible && self.chatty {
            eprintln!("Loading...");
        }
    }

    fn show_error(&mut self, message: &str) {
        eprintln!("Error: {message}");
    }

    fn hide_error(&mut self) {}

    fn set_weather_visible(&mut self, visible: bool) {
        if !visible {
            return;
        }
        if let Some(view) = &self.view {
            print!("{}", Panel(view));
        }
    }

    fn set_active_unit(&mut self, unit: DisplayUnit) {
        if self.chatty {
            println!("Units: {}", unit_controls(unit));
        }
    }

    fn show_forecast(&mut self, view: &RenderableForecast) {
        self.view = Some(view.clone());
    }
}

/// `[°C] °F` with the active unit bracketed.
fn unit_controls(active: DisplayUnit) -> String {
    DisplayUnit::all()
        .iter()
        .map(|unit| {
            if *unit == active {
                format!("[°{}]", unit.symbol())
            } else {
                format!("°{}", unit.symbol())
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Plain-text rendering of every panel slot.
struct Panel<'a>(&'a RenderableForecast);

impl fmt::Display for Panel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.0;

        writeln!(f, "\n{}", view.city_name)?;
        writeln!(f, "{}", view.region)?;
        writeln!(
            f,
            "  {}  {}    {}",
            view.temperature,
            view.description,
            unit_controls(view.unit)
        )?;
        writeln!(f, "  {}", view.feels_like)?;
        writeln!(
            f,
            "  Humidity {} | Wind {} | Pressure {} | UV {}",
            view.humidity, view.wind_speed, view.pressure, view.uv
        )?;
        writeln!(f, "  Icon: {} ({})", view.icon_url, view.icon_alt)?;
        writeln!(f, "\nHourly forecast")?;

        match &view.hourly {
            HourlyDisplay::Hours(cards) => {
                for card in cards {
                    writeln!(
                        f,
                        "  {:>5}  {:>5}  {}",
                        card.time_label, card.temperature, card.condition
                    )?;
                }
                Ok(())
            }
            HourlyDisplay::NotAvailable => writeln!(f, "  {NOT_AVAILABLE_TEXT}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weather_core::HourCard;

    fn view(hourly: HourlyDisplay) -> RenderableForecast {
        RenderableForecast {
            unit: DisplayUnit::Fahrenheit,
            city_name: "Rochester".into(),
            region: "New York, USA".into(),
            temperature: "68°F".into(),
            description: "Sunny".into(),
            feels_like: "Feels like 67°F".into(),
            humidity: "65%".into(),
            wind_speed: "13 km/h".into(),
            pressure: "1015 mb".into(),
            uv: "5".into(),
            icon_url: "https://cdn/113.png".into(),
            icon_alt: "Sunny".into(),
            hourly,
        }
    }

    #[test]
    fn unit_controls_mark_active_unit() {
        assert_eq!(unit_controls(DisplayUnit::Celsius), "[°C] °F");
        assert_eq!(unit_controls(DisplayUnit::Fahrenheit), "°C [°F]");
    }

    #[test]
    fn panel_lists_hour_cards() {
        let text = Panel(&view(HourlyDisplay::Hours(vec![HourCard {
            time_label: "3 PM".into(),
            icon_url: "https://cdn/116.png".into(),
            icon_alt: "Cloudy".into(),
            temperature: "71°F".into(),
            condition: "Cloudy".into(),
        }])))
        .to_string();

        assert!(text.contains("Rochester"));
        assert!(text.contains("68°F"));
        assert!(text.contains("°C [°F]"));
        assert!(text.contains(" 3 PM   71°F  Cloudy"));
    }

    #[test]
    fn panel_shows_placeholder_without_hours() {
        let text = Panel(&view(HourlyDisplay::NotAvailable)).to_string();
        assert!(text.contains(NOT_AVAILABLE_TEXT));
    }
}
