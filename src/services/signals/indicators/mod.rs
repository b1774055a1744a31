//! Per-indicator classification rules.

pub mod atr;
pub mod bands;
pub mod dmi;
pub mod fibonacci;
pub mod kdj;
pub mod macd;
pub mod mfi;
pub mod passthrough;
pub mod psar;
pub mod rsi;

pub use atr::Atr;
pub use bands::BandChannel;
pub use dmi::Dmi;
pub use fibonacci::Fibonacci;
pub use kdj::Kdj;
pub use macd::Macd;
pub use mfi::Mfi;
pub use passthrough::{Squeeze, Supertrend};
pub use psar::Psar;
pub use rsi::Rsi;

use super::Classifier;

/// Get every classifier, one per analysed indicator.
pub fn all_classifiers() -> Vec<Box<dyn Classifier>> {
    vec![
        // Crossover rules
        Box::new(Kdj),
        Box::new(Macd),
        Box::new(Psar),
        // Oscillator zones
        Box::new(Rsi),
        Box::new(Mfi),
        // Channels and volatility
        Box::new(BandChannel::bollinger()),
        Box::new(BandChannel::keltner()),
        Box::new(Atr),
        Box::new(Squeeze),
        // Trend strength
        Box::new(Dmi),
        Box::new(Fibonacci),
        Box::new(Supertrend),
    ]
}
