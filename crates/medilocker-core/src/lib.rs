//! Medilocker Core - shared configuration types
//!
//! This crate defines the process-wide configuration for the Medilocker
//! backend. Configuration is loaded exactly once at startup and handed to
//! every component by reference; no component reads the environment after
//! that point.

pub mod config;

pub use config::{AppConfig, AuthConfig, ConfigError, DatabaseConfig, LoggingConfig, ServerConfig};
