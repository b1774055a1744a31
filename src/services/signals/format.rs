//! Description formatting. Trend decisions never depend on anything here.

use serde::{Deserialize, Serialize};

/// Language of description labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "en")]
    En,
    #[serde(rename = "zh-TW")]
    ZhTw,
}

impl Locale {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "en" | "en-us" | "english" => Some(Self::En),
            "zh" | "zh-tw" | "zh-hant" => Some(Self::ZhTw),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::ZhTw => "zh-TW",
        }
    }
}

/// Formatting parameters for descriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presentation {
    pub locale: Locale,
    /// Decimal places for oscillator and line values.
    pub decimals: usize,
    /// Decimal places for prices and band levels.
    pub price_decimals: usize,
}

impl Default for Presentation {
    fn default() -> Self {
        Self {
            locale: Locale::En,
            decimals: 2,
            price_decimals: 0,
        }
    }
}

impl Presentation {
    pub fn new(locale: Locale, decimals: usize) -> Self {
        Self {
            locale,
            decimals,
            ..Default::default()
        }
    }

    /// Pick the label for the active locale.
    pub fn pick<'a>(&self, en: &'a str, zh: &'a str) -> &'a str {
        match self.locale {
            Locale::En => en,
            Locale::ZhTw => zh,
        }
    }

    pub fn value(&self, value: f64) -> String {
        format!("{:.*}", self.decimals, value)
    }

    pub fn price(&self, value: f64) -> String {
        format!("{:.*}", self.price_decimals, value)
    }

    /// Signed percentage, always two decimals.
    pub fn percent(&self, value: f64) -> String {
        format!("{:+.2}%", value)
    }
}

/// Comparison symbol between two values.
pub fn relation(a: f64, b: f64) -> &'static str {
    if a > b {
        ">"
    } else if a < b {
        "<"
    } else {
        "≈"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_parsing() {
        assert_eq!(Locale::from_str("zh-TW"), Some(Locale::ZhTw));
        assert_eq!(Locale::from_str("zh_tw"), Some(Locale::ZhTw));
        assert_eq!(Locale::from_str("EN"), Some(Locale::En));
        assert_eq!(Locale::from_str("fr"), None);
    }

    #[test]
    fn test_number_formatting() {
        let fmt = Presentation::default();
        assert_eq!(fmt.value(25.0), "25.00");
        assert_eq!(fmt.price(2431.6), "2432");
        assert_eq!(fmt.percent(1.234), "+1.23%");
        assert_eq!(fmt.percent(-0.5), "-0.50%");

        let precise = Presentation::new(Locale::En, 4);
        assert_eq!(precise.value(1.5), "1.5000");
    }

    #[test]
    fn test_relation_symbols() {
        assert_eq!(relation(2.0, 1.0), ">");
        assert_eq!(relation(1.0, 2.0), "<");
        assert_eq!(relation(1.0, 1.0), "≈");
    }
}
