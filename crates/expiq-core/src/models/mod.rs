//! Data models and configuration.

pub mod category;
pub mod config;
pub mod transaction;
