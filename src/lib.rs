//! Tenancy Core - Multitenant Backend
//!
//! One process serving many tenants from a master database plus one
//! database per tenant, with encrypted cookie sessions kept in the master
//! database.

pub mod api;
pub mod browser;
pub mod config;
pub mod crypto;
pub mod domain;
pub mod error;
pub mod middleware;
pub mod migration;
pub mod openapi;
pub mod repository;
pub mod server;
pub mod service;
pub mod session;
pub mod state;
pub mod telemetry;
pub mod tenancy;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
