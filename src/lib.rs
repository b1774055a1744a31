//! Trendboard - technical indicator trend board
//!
//! Fetches indicator series for one trading pair, merges them into
//! per-timestamp records, classifies each indicator's trend and keeps the
//! results in a cumulative store.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod sources;
pub mod types;

pub use types::*;

use config::Config;
use services::Session;
use std::sync::Arc;

/// Application state shared across handlers.
pub struct AppState<S, R> {
    pub config: Arc<Config>,
    pub session: Arc<Session<S, R>>,
}

impl<S, R> AppState<S, R> {
    pub fn new(config: Arc<Config>, session: Arc<Session<S, R>>) -> Self {
        Self { config, session }
    }
}

// Manual impl so the source and store need not be Clone themselves.
impl<S, R> Clone for AppState<S, R> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            session: self.session.clone(),
        }
    }
}
