/// Database configuration and connection management
pub mod database;

/// Seed record loading from seed.toml
pub mod seed;

/// View settings from environment variables
pub mod settings;
