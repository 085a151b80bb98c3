//! Application state management.
//!
//! This module defines the shared application state passed to request handlers.

use sea_orm::DatabaseConnection;

/// Shared application state.
///
/// This struct is cloned for each handler (inexpensive Arc clones), providing
/// access to configuration and the PostgreSQL connection pool.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// PostgreSQL database connection pool
    pub db: DatabaseConnection,
}
