use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::repair::AliasTable;

/// Application configuration module
/// This module handles the optional configuration file: loading,
/// validating and resolving it into the alias table used by a run.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Annotation file used when no input path is given on the command line
    #[serde(default = "default_input_path")]
    pub input_path: PathBuf,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Extra category aliases, merged over the built-in table
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,

    /// Use only `aliases`, ignoring the built-in table
    #[serde(default)]
    pub replace_default_aliases: bool,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching filter for the log facade
    pub fn to_level_filter(&self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
        }
    }
}

fn default_input_path() -> PathBuf {
    PathBuf::from("./data/annotations.json")
}

impl Config {
    /// Load a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {:?}", path))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Resolve the alias table for this configuration
    pub fn alias_table(&self) -> AliasTable {
        let mut table = if self.replace_default_aliases {
            AliasTable::empty()
        } else {
            AliasTable::builtin()
        };
        for (alias, canonical) in &self.aliases {
            table.insert(alias.clone(), canonical.clone());
        }
        table
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.input_path.as_os_str().is_empty() {
            return Err(anyhow!("Input path must not be empty"));
        }

        let table = self.alias_table();
        for (alias, canonical) in table.iter() {
            if alias.is_empty() || canonical.is_empty() {
                return Err(anyhow!(
                    "Category aliases must not be empty: '{}' -> '{}'",
                    alias, canonical
                ));
            }
            if alias == canonical {
                return Err(anyhow!("Category alias '{}' maps to itself", alias));
            }
            // A canonical name that is itself an alias would be rewritten again on the next run
            if table.canonical_name(canonical).is_some() {
                return Err(anyhow!(
                    "Canonical name '{}' (for '{}') is itself an alias",
                    canonical, alias
                ));
            }
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            input_path: default_input_path(),
            log_level: LogLevel::default(),
            aliases: BTreeMap::new(),
            replace_default_aliases: false,
        }
    }
}
