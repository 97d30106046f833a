//! Settings and environment configuration.
//!
//! ```rust,no_run
//! use deepseek_code::config::SettingsLoader;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = SettingsLoader::load_merged(std::path::Path::new("."))
//!     .await?
//!     .permissions
//!     .to_manager()?;
//! # Ok(())
//! # }
//! ```

pub mod env;
pub mod memory;
pub mod provider;
pub mod settings;

pub use env::EnvConfigProvider;
pub use memory::MemoryConfigProvider;
pub use provider::{ConfigProvider, ConfigProviderExt};
pub use settings::{PermissionSettings, Settings, SettingsLoader, SettingsSource};

use thiserror::Error;

use crate::permissions::RuleError;

/// Errors that can occur in configuration operations
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid configuration value
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    /// Malformed permission rule
    #[error("Invalid permission rule: {0}")]
    Rule(#[from] RuleError),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable error
    #[error("Environment error: {0}")]
    Env(#[from] std::env::VarError),
}

/// Result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
