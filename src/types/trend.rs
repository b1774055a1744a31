use serde::{Deserialize, Serialize};

/// Discrete trend tag attached to every classified indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Bullish,
    Bearish,
    #[default]
    Neutral,
    Overbought,
    Oversold,
    UpperBreakout,
    LowerBreakout,
    AboveMiddle,
    BelowMiddle,
    AtMiddle,
    BullishReversal,
    BearishReversal,
    StrongBullish,
    StrongBearish,
    WeakBullish,
    WeakBearish,
    Sideways,
    HighVolatility,
    MediumVolatility,
    LowVolatility,
    /// Squeeze flag set.
    Squeeze,
    /// Supertrend advice present.
    Supertrend,
}

/// Fixed presentation style for a trend tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrendStyle {
    pub color: &'static str,
    pub bold: bool,
}

const GREEN: &str = "#28a745";
const RED: &str = "#dc3545";
const GRAY: &str = "#6c757d";
const GOLD: &str = "#FFD700";
const PINK: &str = "#FF1493";

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bullish => "bullish",
            Self::Bearish => "bearish",
            Self::Neutral => "neutral",
            Self::Overbought => "overbought",
            Self::Oversold => "oversold",
            Self::UpperBreakout => "upper_breakout",
            Self::LowerBreakout => "lower_breakout",
            Self::AboveMiddle => "above_middle",
            Self::BelowMiddle => "below_middle",
            Self::AtMiddle => "at_middle",
            Self::BullishReversal => "bullish_reversal",
            Self::BearishReversal => "bearish_reversal",
            Self::StrongBullish => "strong_bullish",
            Self::StrongBearish => "strong_bearish",
            Self::WeakBullish => "weak_bullish",
            Self::WeakBearish => "weak_bearish",
            Self::Sideways => "sideways",
            Self::HighVolatility => "high_volatility",
            Self::MediumVolatility => "medium_volatility",
            Self::LowVolatility => "low_volatility",
            Self::Squeeze => "squeeze",
            Self::Supertrend => "supertrend",
        }
    }

    /// Table cell style for this tag.
    pub fn style(&self) -> TrendStyle {
        let (color, bold) = match self {
            Self::Bullish | Self::StrongBullish => (GREEN, true),
            Self::Bearish | Self::StrongBearish => (RED, true),
            Self::WeakBullish | Self::AboveMiddle => (GREEN, false),
            Self::WeakBearish | Self::BelowMiddle => (RED, false),
            Self::UpperBreakout => (GREEN, true),
            Self::LowerBreakout => (RED, true),
            Self::AtMiddle | Self::Sideways | Self::Neutral => (GRAY, false),
            Self::Overbought => ("#fd7e14", true),
            Self::Oversold => ("#6f42c1", true),
            Self::BullishReversal => (GOLD, true),
            Self::BearishReversal => (PINK, true),
            Self::HighVolatility => (RED, true),
            Self::MediumVolatility => ("#fd7e14", false),
            Self::LowVolatility => (GRAY, false),
            Self::Squeeze => ("#17a2b8", true),
            Self::Supertrend => (GRAY, true),
        };
        TrendStyle { color, bold }
    }

    /// Style for a cell, using the description where the tag alone does not
    /// carry direction (Supertrend advice).
    pub fn style_for(&self, description: &str) -> TrendStyle {
        if *self != Self::Supertrend {
            return self.style();
        }
        let advice = description.to_lowercase();
        if advice.contains("buy") || advice.contains("long") {
            TrendStyle { color: GREEN, bold: true }
        } else if advice.contains("sell") || advice.contains("short") {
            TrendStyle { color: RED, bold: true }
        } else {
            self.style()
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
