use dashboard_core::{
    RequestState, Tab,
    widget::{CurrencyWidget, QuoteWidget, WeatherWidget},
};

/// Tab strip with the active tab bracketed, e.g. `[Weather]  Currency Converter`.
pub fn tabs(active: Tab) -> String {
    Tab::all()
        .iter()
        .map(|tab| {
            if *tab == active {
                format!("[{}]", tab.title())
            } else {
                tab.title().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

pub fn weather(widget: &WeatherWidget) -> String {
    let mut lines = vec![format!("City: {}", widget.city())];

    if let Some(result) = widget.displayed() {
        lines.push(result.city.clone());
        lines.push(format!("  Temperature: {} °C", result.temperature_display()));
        lines.push(format!("  Condition:   {}", result.condition));
        lines.push(format!("  Wind:        {} km/h", result.wind_speed_display()));
    }

    lines.extend(status(widget.state(), "Fetching weather..."));
    block(lines)
}

pub fn currency(widget: &CurrencyWidget) -> String {
    let mut lines = vec![format!("Amount (INR): {}", widget.input())];

    if let Some(result) = widget.displayed() {
        lines.push(format!("  USD: ${}", result.usd));
        lines.push(format!("  EUR: €{}", result.eur));
        lines.push(format!("  Converted at {}", result.computed_at_display()));
    }

    lines.extend(status(widget.state(), "Converting..."));
    block(lines)
}

pub fn quote(widget: &QuoteWidget) -> String {
    let mut lines = Vec::new();

    match widget.displayed() {
        Some(quote) => lines.push(format!("\u{201C}{quote}\u{201D}")),
        None if matches!(widget.state(), RequestState::Idle) => {
            lines.push("Press \"Generate quote\" for some motivation.".to_string());
        }
        None => {}
    }

    lines.extend(status(widget.state(), "Generating..."));
    block(lines)
}

/// Loading or error line for the current request, if any.
fn status<T>(state: &RequestState<T>, loading: &str) -> Option<String> {
    match state {
        RequestState::Loading => Some(loading.to_string()),
        RequestState::Error(message) => Some(format!("Error: {message}")),
        RequestState::Idle | RequestState::Success(_) => None,
    }
}

/// Newline-terminated lines.
fn block(lines: Vec<String>) -> String {
    lines.into_iter().map(|line| line + "\n").collect()
}
