//! task-manager - A small task-management service with a typed HTTP client
//!
//! This crate provides task CRUD over a REST API with:
//! - redb embedded database for task records (ACID, MVCC, crash-safe)
//! - Named secondary indexes applied idempotently by an admin script
//! - Bearer-token auth (HS256) with a login endpoint and route middleware
//! - A reqwest client wrapper with session persistence and navigation
//!   guarding mirroring the browser frontend

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod storage;

use config::Config;
use storage::Database;

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub db: Database,
}
