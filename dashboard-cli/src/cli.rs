use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use dashboard_core::{
    Config, Providers, RequestState, Shell, Tab,
    config::API_KEY_ENV,
    widget::{CurrencyWidget, QuoteWidget, WeatherWidget},
};
use inquire::{Password, PasswordDisplayMode, Text};
use tracing::debug;

use crate::{app, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "dashboard", version, about = "Weather, currency and quote dashboard")]
pub struct Cli {
    /// Log debug output to stderr (RUST_LOG can refine it).
    #[arg(long, global = true)]
    pub debug: bool,

    /// Defaults to `run`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the quote API key and widget defaults.
    Configure,

    /// Start the interactive tabbed dashboard.
    Run {
        /// Tab shown first: weather, currency or quote.
        #[arg(long, default_value = "weather")]
        tab: String,
    },

    /// Look up the weather once.
    Weather {
        /// City name; defaults to the configured city.
        city: Option<String>,
    },

    /// Convert an INR amount to USD and EUR once.
    Convert {
        /// Amount in INR.
        amount: String,
    },

    /// Print one motivational quote.
    Quote,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;
        debug!(
            has_api_key = config.has_api_key(),
            default_city = %config.weather.default_city,
            "configuration loaded"
        );

        match self.command.unwrap_or(Command::Run {
            tab: Tab::default().to_string(),
        }) {
            Command::Configure => configure(config),
            Command::Run { tab } => {
                let tab = Tab::try_from(tab.as_str())?;
                let mut shell = Shell::with_tab(Providers::from_config(&config), &config, tab);
                app::run(&mut shell).await
            }
            Command::Weather { city } => {
                let providers = Providers::from_config(&config);
                let city = city.unwrap_or_else(|| config.weather.default_city.clone());
                let mut widget = WeatherWidget::new(providers.weather, city);

                let fetch = widget.mount();
                widget.apply(fetch.await);

                print!("{}", render::weather(&widget));
                into_exit(widget.state())
            }
            Command::Convert { amount } => {
                let providers = Providers::from_config(&config);
                let mut widget = CurrencyWidget::new(providers.currency, amount);

                if let Some(fetch) = widget.mount() {
                    widget.apply(fetch.await);
                }

                print!("{}", render::currency(&widget));
                into_exit(widget.state())
            }
            Command::Quote => {
                let providers = Providers::from_config(&config);
                let mut widget = QuoteWidget::new(providers.quote);

                let fetch = widget.generate();
                widget.apply(fetch.await);

                print!("{}", render::quote(&widget));
                Ok(())
            }
        }
    }
}

/// Turns an error state into a non-zero exit after it was printed.
fn into_exit<T>(state: &RequestState<T>) -> anyhow::Result<()> {
    match state {
        RequestState::Error(message) => Err(anyhow!(message.clone())),
        _ => Ok(()),
    }
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    if std::env::var(API_KEY_ENV).is_ok_and(|key| !key.trim().is_empty()) {
        println!("Note: {API_KEY_ENV} is set and overrides the stored key.");
    }

    let api_key = Password::new("Quote API key (leave empty for local quotes only):")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    config.set_api_key(api_key);

    let city = Text::new("Default city:")
        .with_default(&config.weather.default_city)
        .prompt()
        .context("Failed to read default city")?;
    if !city.trim().is_empty() {
        config.weather.default_city = city.trim().to_string();
    }

    let amount = Text::new("Default amount (INR):")
        .with_default(&config.currency.default_amount)
        .prompt()
        .context("Failed to read default amount")?;
    if !amount.trim().is_empty() {
        config.currency.default_amount = amount.trim().to_string();
    }

    config.save()?;
    println!(
        "Configuration saved to {}",
        Config::config_file_path()?.display()
    );

    Ok(())
}
