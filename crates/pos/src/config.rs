//! Counter configuration from environment variables.

use chrono::format::{Item, StrftimeItems};

use laundrypay_core::Money;
use laundrypay_observability::LogFormat;
use laundrypay_orders::DEFAULT_TIMESTAMP_FORMAT;

pub const CURRENCY_SYMBOL_VAR: &str = "LAUNDRYPAY_CURRENCY_SYMBOL";
pub const TIMESTAMP_FORMAT_VAR: &str = "LAUNDRYPAY_TIMESTAMP_FORMAT";
pub const LOG_FORMAT_VAR: &str = "LAUNDRYPAY_LOG_FORMAT";

pub const DEFAULT_CURRENCY_SYMBOL: &str = "₱";

/// Presentation settings for one counter session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosConfig {
    pub currency_symbol: String,
    /// chrono `strftime` layout for transaction timestamps.
    pub timestamp_format: String,
    pub log_format: LogFormat,
}

impl Default for PosConfig {
    fn default() -> Self {
        Self {
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            log_format: LogFormat::default(),
        }
    }
}

impl PosConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    ///
    /// Blank or invalid values fall back to the defaults with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(symbol) = lookup(CURRENCY_SYMBOL_VAR) {
            if symbol.trim().is_empty() {
                tracing::warn!(var = CURRENCY_SYMBOL_VAR, "blank currency symbol; using default");
            } else {
                config.currency_symbol = symbol.trim().to_string();
            }
        }

        if let Some(layout) = lookup(TIMESTAMP_FORMAT_VAR) {
            if is_valid_layout(&layout) {
                config.timestamp_format = layout;
            } else {
                tracing::warn!(
                    var = TIMESTAMP_FORMAT_VAR,
                    value = %layout,
                    "invalid timestamp format; using default"
                );
            }
        }

        if let Some(format) = lookup(LOG_FORMAT_VAR) {
            match format.parse() {
                Ok(format) => config.log_format = format,
                Err(err) => tracing::warn!(var = LOG_FORMAT_VAR, error = %err, "using default log format"),
            }
        }

        config
    }

    /// `₱100.00`
    pub fn format_money(&self, amount: Money) -> String {
        format!("{}{}", self.currency_symbol, amount)
    }
}

fn is_valid_layout(layout: &str) -> bool {
    !layout.trim().is_empty() && !StrftimeItems::new(layout).any(|item| matches!(item, Item::Error))
}
