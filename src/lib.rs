//! Bookshelf server
//!
//! A REST JSON API over an in-memory collection of book records: create,
//! list, fetch, update and delete, every response wrapped in a uniform
//! status envelope.
//!
//! The store lives only as long as the process. Each process owns its own
//! store, so running several instances behind one address gives each
//! instance a diverging view.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

impl AppState {
    /// State over a fresh, empty book store
    pub fn new(config: AppConfig) -> Self {
        Self::with_repository(config, repository::Repository::new())
    }

    pub fn with_repository(config: AppConfig, repository: repository::Repository) -> Self {
        Self {
            config: Arc::new(config),
            services: Arc::new(services::Services::new(repository)),
        }
    }
}
