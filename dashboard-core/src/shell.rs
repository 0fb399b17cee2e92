use std::{convert::TryFrom, fmt};

use tracing::debug;

use crate::{
    Config,
    provider::Providers,
    widget::{CurrencyWidget, QuoteWidget, WeatherWidget},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    #[default]
    Weather,
    Currency,
    Quote,
}

impl Tab {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::Weather => "weather",
            Tab::Currency => "currency",
            Tab::Quote => "quote",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Weather => "Weather",
            Tab::Currency => "Currency Converter",
            Tab::Quote => "Motivational Quote",
        }
    }

    pub const fn all() -> &'static [Tab] {
        &[Tab::Weather, Tab::Currency, Tab::Quote]
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Tab {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "weather" => Ok(Tab::Weather),
            "currency" => Ok(Tab::Currency),
            "quote" => Ok(Tab::Quote),
            _ => Err(anyhow::anyhow!(
                "Unknown tab '{value}'. Available tabs: weather, currency, quote."
            )),
        }
    }
}

/// The widget instance behind the active tab.
#[derive(Debug)]
pub enum ActiveWidget {
    Weather(WeatherWidget),
    Currency(CurrencyWidget),
    Quote(QuoteWidget),
}

impl ActiveWidget {
    pub fn tab(&self) -> Tab {
        match self {
            ActiveWidget::Weather(_) => Tab::Weather,
            ActiveWidget::Currency(_) => Tab::Currency,
            ActiveWidget::Quote(_) => Tab::Quote,
        }
    }
}

/// Builds fresh widgets with the configured defaults.
#[derive(Debug, Clone)]
struct WidgetFactory {
    providers: Providers,
    default_city: String,
    default_amount: String,
}

impl WidgetFactory {
    fn build(&self, tab: Tab) -> ActiveWidget {
        match tab {
            Tab::Weather => ActiveWidget::Weather(WeatherWidget::new(
                self.providers.weather.clone(),
                self.default_city.clone(),
            )),
            Tab::Currency => ActiveWidget::Currency(CurrencyWidget::new(
                self.providers.currency.clone(),
                self.default_amount.clone(),
            )),
            Tab::Quote => ActiveWidget::Quote(QuoteWidget::new(self.providers.quote.clone())),
        }
    }
}

/// Tab router. Only the active widget exists; leaving a tab discards its state.
#[derive(Debug)]
pub struct Shell {
    factory: WidgetFactory,
    widget: ActiveWidget,
}

impl Shell {
    pub fn new(providers: Providers, config: &Config) -> Self {
        Self::with_tab(providers, config, Tab::default())
    }

    pub fn with_tab(providers: Providers, config: &Config, tab: Tab) -> Self {
        let factory = WidgetFactory {
            providers,
            default_city: config.weather.default_city.clone(),
            default_amount: config.currency.default_amount.clone(),
        };
        let widget = factory.build(tab);

        Self { factory, widget }
    }

    pub fn active(&self) -> Tab {
        self.widget.tab()
    }

    pub fn widget(&self) -> &ActiveWidget {
        &self.widget
    }

    pub fn widget_mut(&mut self) -> &mut ActiveWidget {
        &mut self.widget
    }

    /// Switches tabs. Returns `true` when a fresh widget was created and
    /// needs mounting; selecting the active tab keeps its state.
    pub fn navigate(&mut self, tab: Tab) -> bool {
        if tab == self.active() {
            return false;
        }

        debug!(from = %self.active(), to = %tab, "switching tab");
        self.widget = self.factory.build(tab);
        true
    }
}
