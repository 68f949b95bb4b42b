use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use procura_domain::SeverityThresholds;

use crate::ConfigError;

/// Stores dashboard preferences shared by every view of an installation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// BCP 47 language tag, `en-US` style. Picks the number separators.
    #[serde(default = "Config::default_locale")]
    pub locale: String,
    #[serde(default = "Config::default_base_currency")]
    pub base_currency: String,
    #[serde(default = "Config::default_amount_precision")]
    pub amount_precision: u8,
    #[serde(default)]
    pub stock_alerts: StockAlertSettings,
    #[serde(default)]
    pub flow: FlowSettings,
    #[serde(default = "Config::default_log_filter")]
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: Self::default_locale(),
            base_currency: Self::default_base_currency(),
            amount_precision: Self::default_amount_precision(),
            stock_alerts: StockAlertSettings::default(),
            flow: FlowSettings::default(),
            log_filter: Self::default_log_filter(),
        }
    }
}

impl Config {
    pub fn default_locale() -> String {
        "en-US".into()
    }

    pub fn default_base_currency() -> String {
        "EUSD".into()
    }

    pub fn default_amount_precision() -> u8 {
        2
    }

    pub fn default_log_filter() -> String {
        "procura=info".into()
    }

    /// Rejects values the services cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ratio = self.stock_alerts.critical_ratio;
        if !(ratio > 0.0 && ratio <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "stock_alerts.critical_ratio must be in (0, 1], got {ratio}"
            )));
        }
        let language = language_of(&self.locale);
        if language.len() < 2 || !language.chars().all(|ch| ch.is_ascii_alphabetic()) {
            return Err(ConfigError::Invalid(format!(
                "locale must start with a language code, got {:?}",
                self.locale
            )));
        }
        if self.base_currency.trim().is_empty() {
            return Err(ConfigError::Invalid("base_currency must not be empty".into()));
        }
        if self.amount_precision > 6 {
            return Err(ConfigError::Invalid(format!(
                "amount_precision must be at most 6, got {}",
                self.amount_precision
            )));
        }
        Ok(())
    }

    /// Decimal and grouping separators for the configured locale.
    pub fn number_style(&self) -> NumberStyle {
        match language_of(&self.locale).to_ascii_lowercase().as_str() {
            "de" | "es" | "id" | "it" | "nl" | "pt" | "tr" | "vi" => NumberStyle::new(',', '.'),
            "cs" | "fi" | "fr" | "nb" | "pl" | "ru" | "sv" | "uk" => NumberStyle::new(',', ' '),
            _ => NumberStyle::default(),
        }
    }

    pub fn severity_thresholds(&self) -> SeverityThresholds {
        SeverityThresholds::new(self.stock_alerts.critical_ratio)
    }

    /// Default directory holding `config.json`, `~/.config/procura` on Linux.
    pub fn default_base_dir() -> PathBuf {
        dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("procura")
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct StockAlertSettings {
    #[serde(default = "StockAlertSettings::default_critical_ratio")]
    pub critical_ratio: f64,
}

impl StockAlertSettings {
    pub fn default_critical_ratio() -> f64 {
        SeverityThresholds::DEFAULT_CRITICAL_RATIO
    }
}

impl Default for StockAlertSettings {
    fn default() -> Self {
        Self {
            critical_ratio: Self::default_critical_ratio(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct FlowSettings {
    /// Fail tree building on dangling references instead of leaving the rows out.
    #[serde(default)]
    pub strict_references: bool,
}

/// Separators used when rendering amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberStyle {
    pub decimal_separator: char,
    pub grouping_separator: char,
}

impl NumberStyle {
    pub const fn new(decimal_separator: char, grouping_separator: char) -> Self {
        Self {
            decimal_separator,
            grouping_separator,
        }
    }
}

impl Default for NumberStyle {
    fn default() -> Self {
        Self::new('.', ',')
    }
}

/// Primary language subtag: `pt` for `pt-BR` or `pt_BR`.
fn language_of(locale: &str) -> &str {
    locale
        .trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
}
