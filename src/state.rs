// src/state.rs
use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::completion::CompletionClient;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub completions: CompletionClient,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            completions: CompletionClient::new(config),
        }
    }
}
