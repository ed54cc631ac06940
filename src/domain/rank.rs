//! Total ordering of domains.
//!
//! A domain's rank comes from an explicit override table (for named levels
//! such as `K`) or, failing that, from reading the token as a base-10
//! integer.

use std::{cmp::Ordering, collections::BTreeMap};

use crate::domain::Domain;

/// A domain token that is neither overridden nor a base-10 integer.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("domain '{0}' has no rank: add a rank override or use an integer domain")]
pub struct RankError(pub Domain);

/// Resolves domains to their integer rank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainRanks {
    overrides: BTreeMap<String, i64>,
}

impl Default for DomainRanks {
    fn default() -> Self {
        Self::new(default_overrides())
    }
}

impl DomainRanks {
    /// Creates a rank table from the given overrides.
    #[must_use]
    pub const fn new(overrides: BTreeMap<String, i64>) -> Self {
        Self { overrides }
    }

    /// The configured overrides.
    #[must_use]
    pub const fn overrides(&self) -> &BTreeMap<String, i64> {
        &self.overrides
    }

    /// Returns the rank of a domain.
    ///
    /// # Errors
    ///
    /// Returns a [`RankError`] if the domain has no override and is not a
    /// base-10 integer.
    pub fn rank(&self, domain: &Domain) -> Result<i64, RankError> {
        if let Some(rank) = self.overrides.get(domain.as_str()) {
            return Ok(*rank);
        }
        domain
            .as_str()
            .parse()
            .map_err(|_| RankError(domain.clone()))
    }

    /// Compares two domains by rank.
    ///
    /// # Errors
    ///
    /// Returns a [`RankError`] if either domain cannot be ranked.
    pub fn compare(&self, a: &Domain, b: &Domain) -> Result<Ordering, RankError> {
        Ok(self.rank(a)?.cmp(&self.rank(b)?))
    }
}

pub(crate) fn default_overrides() -> BTreeMap<String, i64> {
    BTreeMap::from([("K".to_string(), 0)])
}
