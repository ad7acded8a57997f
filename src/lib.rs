//! Lead analysis dashboard
//!
//! Loads a CSV of sales leads, filters it by lead source and derives the
//! tables behind the dashboard charts and performer rankings.

pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod loader;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod session;
pub mod synthetic;

pub use error::{DashboardError, Result};
