//! Layered configuration: command line over config file over defaults

use crate::{constants::*, stake::StakeCounter};
use anyhow::Context;
use log::debug;
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, SmartDefault)]
#[serde(default, deny_unknown_fields)]
pub struct VoteCounterConfig {
    #[default(DEFAULT_GRAPHQL_ENDPOINT.to_string())]
    pub graphql_endpoint: String,

    #[default(MAINNET_BURN_ADDRESS.to_string())]
    pub burn_address: String,

    #[default(PathBuf::from(DEFAULT_DATABASE_DIR))]
    pub database_dir: PathBuf,

    #[default(DEFAULT_REORG_MARGIN)]
    pub reorg_margin: u32,

    #[default(BEST_CHAIN_MAX_LENGTH)]
    pub max_length: u32,

    #[default(StakeCounter::DEFAULT_WORKERS)]
    pub balance_workers: usize,
}

/// Values given on the command line, each overriding its config counterpart
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub graphql_endpoint: Option<String>,
    pub burn_address: Option<String>,
    pub database_dir: Option<PathBuf>,
    pub reorg_margin: Option<u32>,
    pub max_length: Option<u32>,
    pub balance_workers: Option<usize>,
}

impl VoteCounterConfig {
    /// Config file values, defaulting those it omits
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path).with_context(|| format!("Failed to open config {path:#?}"))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse config {path:#?}"))
    }

    /// Resolve the effective configuration
    pub fn resolve(path: Option<&Path>, overrides: ConfigOverrides) -> anyhow::Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = config.with_overrides(overrides);

        debug!("Effective configuration: {config:#?}");
        Ok(config)
    }

    pub fn with_overrides(self, overrides: ConfigOverrides) -> Self {
        Self {
            graphql_endpoint: overrides.graphql_endpoint.unwrap_or(self.graphql_endpoint),
            burn_address: overrides.burn_address.unwrap_or(self.burn_address),
            database_dir: overrides.database_dir.unwrap_or(self.database_dir),
            reorg_margin: overrides.reorg_margin.unwrap_or(self.reorg_margin),
            max_length: overrides.max_length.unwrap_or(self.max_length),
            balance_workers: overrides.balance_workers.unwrap_or(self.balance_workers),
        }
    }
}
