//! User-selected display preferences.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{domain::common::Displayable, errors::TrackerError};

/// Supported currencies as `(code, symbol, name)`. The first entry is the default.
const KNOWN_CURRENCIES: [(&str, &str, &str); 4] = [
    ("INR", "₹", "Rupee"),
    ("USD", "$", "Dollar"),
    ("EUR", "€", "Euro"),
    ("BDT", "৳", "Taka"),
];

/// Display currency. Amounts are never converted between currencies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Currency {
    pub code: String,
    pub symbol: String,
    pub name: String,
}

impl Currency {
    /// Looks up a supported currency by ISO code.
    pub fn from_code(code: &str) -> Option<Self> {
        let wanted = code.trim();
        KNOWN_CURRENCIES
            .iter()
            .find(|(known, _, _)| known.eq_ignore_ascii_case(wanted))
            .map(|&(code, symbol, name)| Self {
                code: code.into(),
                symbol: symbol.into(),
                name: name.into(),
            })
    }

    pub fn available() -> Vec<Self> {
        KNOWN_CURRENCIES
            .iter()
            .filter_map(|(code, _, _)| Self::from_code(code))
            .collect()
    }
}

impl Default for Currency {
    fn default() -> Self {
        let (code, symbol, name) = KNOWN_CURRENCIES[0];
        Self {
            code: code.into(),
            symbol: symbol.into(),
            name: name.into(),
        }
    }
}

impl Displayable for Currency {
    fn display_label(&self) -> String {
        format!("{} {} ({})", self.symbol, self.code, self.name)
    }
}

/// Interface language.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Hi,
    Bn,
    Es,
    Fr,
}

impl Language {
    /// Languages offered in the settings picker.
    pub const SELECTABLE: [Language; 3] = [Language::En, Language::Bn, Language::Hi];

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
            Language::Bn => "bn",
            Language::Es => "es",
            Language::Fr => "fr",
        }
    }

    pub fn native_name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Hi => "हिन्दी",
            Language::Bn => "বাংলা",
            Language::Es => "Español",
            Language::Fr => "Français",
        }
    }
}

impl FromStr for Language {
    type Err = TrackerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "hi" => Ok(Language::Hi),
            "bn" => Ok(Language::Bn),
            "es" => Ok(Language::Es),
            "fr" => Ok(Language::Fr),
            other => Err(TrackerError::Validation(format!(
                "unsupported language `{other}`"
            ))),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Singleton preferences owned by the settings holder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Settings {
    pub currency: Currency,
    pub language: Language,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_currency_and_english() {
        let settings = Settings::default();
        assert_eq!(settings.currency.code, "INR");
        assert_eq!(settings.currency.symbol, "₹");
        assert_eq!(settings.language, Language::En);
    }

    #[test]
    fn currency_lookup_is_case_insensitive() {
        let eur = Currency::from_code("eur").expect("known currency");
        assert_eq!(eur.symbol, "€");
        assert!(Currency::from_code("GBP").is_none());
        assert_eq!(Currency::available().len(), 4);
    }

    #[test]
    fn language_round_trips_through_lowercase_codes() {
        let json = serde_json::to_string(&Language::Bn).unwrap();
        assert_eq!(json, "\"bn\"");
        assert_eq!("HI".parse::<Language>().unwrap(), Language::Hi);
        assert!("de".parse::<Language>().is_err());
    }

    #[test]
    fn picker_offers_three_languages_by_native_name() {
        let names: Vec<&str> = Language::SELECTABLE
            .iter()
            .map(|language| language.native_name())
            .collect();
        assert_eq!(names, vec!["English", "বাংলা", "हिन्दी"]);
        assert!(!Language::SELECTABLE.contains(&Language::Fr));
    }
}
