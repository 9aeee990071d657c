//! Configuration for the encrypter.
//!
//! Decryption needs no configuration: any nonce length in the supported
//! range is accepted regardless of what the sender chose.
//!
//! # Example
//!
//! ```
//! use hdseal_protocol::config::{SealConfig, SealConfigBuilder};
//!
//! // Use defaults
//! let config = SealConfig::default();
//! assert_eq!(config.nonce_size, 12);
//!
//! // Or use the builder
//! let config = SealConfigBuilder::new()
//!     .with_nonce_size(24)
//!     .build_validated()
//!     .unwrap();
//! assert_eq!(config.nonce_size, 24);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::limits::{DEFAULT_NONCE_SIZE, MAX_NONCE_LEN, MIN_NONCE_LEN};

/// Encrypter configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SealConfig {
    /// Length of the random nonce generated for each message.
    pub nonce_size: usize,
}

impl Default for SealConfig {
    fn default() -> Self {
        Self {
            nonce_size: DEFAULT_NONCE_SIZE,
        }
    }
}

impl SealConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration builder.
    pub fn builder() -> SealConfigBuilder {
        SealConfigBuilder::new()
    }

    /// Validate the configuration.
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_NONCE_LEN..=MAX_NONCE_LEN).contains(&self.nonce_size) {
            return Err(ConfigError::InvalidValue {
                field: "nonce_size".into(),
                reason: format!(
                    "nonce size must be between {} and {}, got {}",
                    MIN_NONCE_LEN, MAX_NONCE_LEN, self.nonce_size
                ),
            });
        }
        Ok(())
    }
}

/// Builder for [`SealConfig`].
#[derive(Clone, Debug, Default)]
pub struct SealConfigBuilder {
    config: SealConfig,
}

impl SealConfigBuilder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the nonce size.
    pub fn with_nonce_size(mut self, nonce_size: usize) -> Self {
        self.config.nonce_size = nonce_size;
        self
    }

    /// Build the final configuration.
    pub fn build(self) -> SealConfig {
        self.config
    }

    /// Build and validate the configuration.
    ///
    /// Returns an error if validation fails.
    pub fn build_validated(self) -> Result<SealConfig, ConfigError> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue {
        /// The field name.
        field: String,
        /// The reason it's invalid.
        reason: String,
    },
}
