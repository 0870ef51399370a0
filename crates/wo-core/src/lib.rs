//! # wo-core
//!
//! Core types, traits, and utilities for Parada OS.
//!
//! This crate provides the foundational building blocks used across all
//! other crates:
//! - Application configuration and its error type
//! - Identity types shared by the models (`Id`, `Identifiable`)

pub mod config;
pub mod error;
pub mod traits;

pub use config::AppConfig;
pub use error::ConfigError;
pub use traits::*;
