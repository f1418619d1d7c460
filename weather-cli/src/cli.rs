use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Select, Text};
use weather_core::{Config, DisplayUnit, Phase, WeatherApiClient, WeatherApp};

use crate::terminal::TerminalPanel;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current conditions and hourly forecast")]
pub struct Cli {
    /// Log requests and state changes to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key, default city and preferred unit.
    Configure,

    /// Show weather for a city once.
    Show {
        /// City name, e.g. "Rochester".
        city: String,

        /// Display unit: c or f; defaults to the configured unit.
        #[arg(long)]
        unit: Option<DisplayUnit>,
    },

    /// Start a session: loads the default city, then prompts for more.
    Interactive {
        /// Display unit at session start: c or f.
        #[arg(long)]
        unit: Option<DisplayUnit>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Command::Configure => {
                configure()?;
                Ok(ExitCode::SUCCESS)
            }
            Command::Show { city, unit } => show(&city, unit).await,
            Command::Interactive { unit } => {
                interactive(unit).await?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

fn load_app(unit: Option<DisplayUnit>) -> anyhow::Result<WeatherApp<WeatherApiClient>> {
    let mut config = Config::load()?.with_env_overrides();
    if let Some(unit) = unit {
        config.unit = unit;
    }

    let client = WeatherApiClient::from_config(&config)?;
    Ok(WeatherApp::from_config(client, &config))
}

async fn show(city: &str, unit: Option<DisplayUnit>) -> anyhow::Result<ExitCode> {
    let mut app = load_app(unit)?;
    let mut panel = TerminalPanel::quiet();

    match app.lookup(city, &mut panel).await {
        Phase::Displayed => Ok(ExitCode::SUCCESS),
        _ => Ok(ExitCode::FAILURE),
    }
}

async fn interactive(unit: Option<DisplayUnit>) -> anyhow::Result<()> {
    let mut app = load_app(unit)?;
    let mut panel = TerminalPanel::interactive();

    tracing::debug!(unit = %app.state().unit(), "starting interactive session");
    app.initial_load(&mut panel).await;

    loop {
        let line = match Text::new("City:")
            .with_help_message(":c / :f switch units, :q quits")
            .prompt()
        {
            Ok(line) => line,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e).context("Failed to read city"),
        };

        match line.trim() {
            ":q" => break,
            cmd @ (":c" | ":f") => {
                let unit: DisplayUnit = cmd[1..].parse()?;
                tracing::debug!(%unit, "unit selected");
                app.set_unit(unit, &mut panel);
            }
            _ => {
                app.lookup(&line, &mut panel).await;
            }
        }
    }

    tracing::debug!("interactive session ended");
    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("WeatherAPI.com API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let default_city = Text::new("Default city:")
        .with_default(&config.default_city)
        .prompt()
        .context("Failed to read default city")?;

    let units = DisplayUnit::all().to_vec();
    let cursor = units.iter().position(|u| *u == config.unit).unwrap_or(0);
    let unit = Select::new("Temperature unit:", units)
        .with_starting_cursor(cursor)
        .prompt()
        .context("Failed to read unit")?;

    if !api_key.trim().is_empty() {
        config.api_key = Some(api_key.trim().to_string());
    }
    if !default_city.trim().is_empty() {
        config.default_city = default_city.trim().to_string();
    }
    config.unit = unit;

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}
