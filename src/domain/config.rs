use std::{collections::BTreeMap, num::NonZeroUsize, path::Path};

use serde::{Deserialize, Serialize};

use crate::domain::{DomainRanks, builder::DEFAULT_MAX_LENGTH, rank::default_overrides};

/// Configuration for curriculum planning.
///
/// This struct holds the settings that control how the domain-order table is
/// read and how curricula are built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Explicit ranks for domains whose tokens are not integers.
    ///
    /// For example, `K = 0` places kindergarten before grade `1`. Overrides
    /// also take precedence over integer tokens.
    rank_overrides: BTreeMap<String, i64>,

    /// The maximum number of units in a student's curriculum.
    pub max_curriculum_length: NonZeroUsize,

    /// The column of the domain-order table that holds each row's domain.
    pub domain_column: usize,

    /// The field delimiter of the input and output tables.
    pub delimiter: char,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rank_overrides: default_overrides(),
            max_curriculum_length: DEFAULT_MAX_LENGTH,
            domain_column: 0,
            delimiter: default_delimiter(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Returns the configured rank overrides.
    #[must_use]
    pub const fn rank_overrides(&self) -> &BTreeMap<String, i64> {
        &self.rank_overrides
    }

    /// Sets the rank of a domain token, returning the previous rank if there
    /// was one.
    pub fn set_rank(&mut self, domain: impl Into<String>, rank: i64) -> Option<i64> {
        self.rank_overrides.insert(domain.into(), rank)
    }

    /// Builds the rank table for these overrides.
    #[must_use]
    pub fn ranks(&self) -> DomainRanks {
        DomainRanks::new(self.rank_overrides.clone())
    }
}

const fn default_delimiter() -> char {
    ','
}

const fn default_max_length() -> NonZeroUsize {
    DEFAULT_MAX_LENGTH
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_max_length")]
        max_curriculum_length: NonZeroUsize,

        #[serde(default)]
        domain_column: usize,

        #[serde(default = "default_delimiter")]
        delimiter: char,

        /// Ranks for named domains, e.g. `K = 0`.
        ///
        /// Must stay last: TOML tables follow plain values.
        #[serde(default = "default_overrides")]
        rank_overrides: BTreeMap<String, i64>,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                max_curriculum_length,
                domain_column,
                delimiter,
                rank_overrides,
            } => Self {
                rank_overrides,
                max_curriculum_length,
                domain_column,
                delimiter,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            max_curriculum_length: config.max_curriculum_length,
            domain_column: config.domain_column,
            delimiter: config.delimiter,
            rank_overrides: config.rank_overrides,
        }
    }
}
