use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Text};
use skycast_core::{Config, SearchController, SearchOutcome, provider_from_config};
use tracing::debug;

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Current weather and 5-day forecast")]
pub struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// OpenWeather API key; overrides the configured one
    #[arg(long, env = "OPENWEATHER_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store an OpenWeather API key in the config file.
    Configure,

    /// Show weather for a city.
    Show {
        /// City name, e.g. "London" or "Paris,FR".
        city: String,

        /// Print the normalized view as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Prompt for cities repeatedly until an empty line or Esc.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { ref city, json } => {
                // Blank input never needs credentials or the network.
                if city.trim().is_empty() {
                    return Ok(());
                }
                let controller = self.controller()?;
                show(&controller, city, json).await
            }
            Command::Interactive => {
                let controller = self.controller()?;
                interactive(&controller).await
            }
        }
    }

    fn controller(&self) -> anyhow::Result<SearchController> {
        let config = self.resolve_config(Config::load()?);
        let provider = provider_from_config(&config)?;
        Ok(SearchController::new(provider))
    }

    /// Layer environment and `--api-key` on top of the file config.
    fn resolve_config(&self, file: Config) -> Config {
        let file_key = file.api_key().map(str::to_owned);
        let config = file.with_env_overrides().with_overrides(self.api_key.clone(), None);

        if file_key.is_some() && config.api_key() != file_key.as_deref() {
            debug!("API key from --api-key/OPENWEATHER_API_KEY replaces the configured one");
        }
        debug!(base_url = config.base_url(), "resolved configuration");

        config
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    if key.trim().is_empty() {
        bail!("API key must not be empty");
    }

    config.set_api_key(key.trim().to_string());
    let path = config.save()?;
    println!("Saved OpenWeather API key to {}", path.display());

    Ok(())
}

async fn show(controller: &SearchController, city: &str, json: bool) -> anyhow::Result<()> {
    match controller.search(city).await {
        SearchOutcome::Skipped => Ok(()),
        SearchOutcome::Success(view) if json => {
            println!("{}", serde_json::to_string_pretty(&view)?);
            Ok(())
        }
        SearchOutcome::Success(view) => {
            print!("{}", render::render_view(&view));
            Ok(())
        }
        SearchOutcome::Failure(message) => bail!(message),
    }
}

async fn interactive(controller: &SearchController) -> anyhow::Result<()> {
    loop {
        let city = match Text::new("City:").with_placeholder("Enter city name").prompt() {
            Ok(city) => city,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Failed to read city"),
        };

        if city.trim().is_empty() {
            break;
        }

        eprintln!("Fetching weather data...");
        controller.search(&city).await;
        println!("{}", render::render_state(&controller.state().await));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_parses_city_and_json_flag() {
        let cli = Cli::parse_from(["skycast", "show", "New York", "--json"]);
        match cli.command {
            Command::Show { city, json } => {
                assert_eq!(city, "New York");
                assert!(json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn verbose_is_counted_after_subcommand() {
        let cli = Cli::parse_from(["skycast", "show", "Oslo", "-vv"]);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn api_key_flag_overrides_configured_key() {
        let mut file = Config::default();
        file.set_api_key("FILE_KEY".into());

        let cli = Cli::parse_from(["skycast", "show", "Oslo", "--api-key", "FLAG_KEY"]);
        let config = cli.resolve_config(file);
        assert_eq!(config.api_key(), Some("FLAG_KEY"));
    }

    #[test]
    fn api_key_flag_is_global() {
        let cli = Cli::parse_from(["skycast", "interactive", "--api-key", "K"]);
        assert_eq!(cli.api_key.as_deref(), Some("K"));
    }
}
