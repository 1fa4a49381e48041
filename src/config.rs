// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! `config.toml` handling.
//!
//! Every section and field has a default, so a missing file or a partial one
//! is fine.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::db;
use crate::store::{DataStore, RestStore, SqliteStore};

pub const API_KEY_ENV: &str = "MONEYDASH_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Sqlite,
    Rest,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: Backend,

    /// SQLite file; the platform data dir when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,

    #[serde(default)]
    pub rest: RestConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestConfig {
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: None,
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    15
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_symbol")]
    pub currency_symbol: String,

    /// Months shown by the chart views.
    #[serde(default = "default_chart_months")]
    pub chart_months: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_symbol: default_symbol(),
            chart_months: default_chart_months(),
        }
    }
}

fn default_symbol() -> String {
    "$".to_string()
}

fn default_chart_months() -> usize {
    6
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn default_path() -> Result<PathBuf> {
        Ok(db::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Loads `explicit` if given (it must exist), else the default location
    /// when present, else defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(p) = explicit {
            return Self::load(p);
        }
        let path = Self::default_path()?;
        if path.exists() {
            debug!(path = %path.display(), "loading config");
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn default_toml() -> String {
        toml::to_string_pretty(&Config::default()).unwrap_or_default()
    }

    pub fn sqlite_path(&self) -> Result<PathBuf> {
        match &self.store.path {
            Some(p) => Ok(p.clone()),
            None => db::db_path(),
        }
    }

    pub fn api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.is_empty())
            .or_else(|| self.store.rest.api_key.clone())
    }

    pub fn open_store(&self) -> Result<Box<dyn DataStore>> {
        match self.store.backend {
            Backend::Sqlite => {
                let conn = db::open_or_init(&self.sqlite_path()?)?;
                Ok(Box::new(SqliteStore::new(conn)))
            }
            Backend::Rest => {
                if self.store.rest.url.is_empty() {
                    bail!("store.rest.url must be set for the rest backend");
                }
                let key = self.api_key().with_context(|| {
                    format!("Set store.rest.api_key or {} for the rest backend", API_KEY_ENV)
                })?;
                let store = RestStore::new(
                    &self.store.rest.url,
                    &key,
                    Duration::from_secs(self.store.rest.timeout_seconds),
                )?;
                Ok(Box::new(store))
            }
        }
    }
}
