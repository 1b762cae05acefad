// Path: crates/types/src/config/mod.rs

//! Node configuration for the observer core.
use crate::app::{AdminPolicy, ObserverParams};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Genesis records imported into an empty state.
pub mod genesis;
pub use genesis::*;

fn default_log_filter() -> String {
    "info".to_string()
}

/// The top-level configuration file.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CoreConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// Addresses holding admin policy groups.
    #[serde(default)]
    pub admin_policies: Vec<AdminPolicy>,
    /// Initial state, including the observer parameters.
    #[serde(default)]
    pub genesis: GenesisState,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            admin_policies: Vec::new(),
            genesis: GenesisState::default(),
        }
    }
}

impl CoreConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: CoreConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// The observer parameters written at genesis.
    pub fn observer_params(&self) -> &ObserverParams {
        &self.genesis.params
    }

    /// Checks cross-field consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let params = &self.genesis.params;
        if !params.ballot_threshold.is_valid_threshold() {
            return Err(ConfigError::Invalid(format!(
                "ballot_threshold must be in (0, 1], got {}",
                params.ballot_threshold
            )));
        }
        let mut seen = BTreeSet::new();
        for chain in &params.supported_chains {
            if !seen.insert(chain.chain_id) {
                return Err(ConfigError::Invalid(format!(
                    "chain {} listed twice in supported_chains",
                    chain.chain_id
                )));
            }
        }
        for mapper in &self.genesis.observer_mappers {
            if !seen.contains(&mapper.chain_id()) {
                return Err(ConfigError::Invalid(format!(
                    "observer list for unsupported chain {}",
                    mapper.chain_id()
                )));
            }
        }
        for nonces in &self.genesis.chain_nonces {
            if !seen.contains(&nonces.chain_id) {
                return Err(ConfigError::Invalid(format!(
                    "chain nonces for unsupported chain {}",
                    nonces.chain_id
                )));
            }
        }
        Ok(())
    }
}
