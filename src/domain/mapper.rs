//! Inference of the linear curriculum sequence from a domain-order table.
//!
//! The [`DomainMapper`] reads the raw rows of a domain-order table and
//! derives two immutable lookups:
//!
//! - a [`DomainTransitionMap`], giving the next domain by rank, and
//! - a [`DomainOrderMap`], giving the next `domain.standard` unit across the
//!   whole curriculum, crossing domain boundaries where a row runs out.
//!
//! Rows may appear in any order. Both maps are built once, when the mapper is
//! constructed, and never change afterwards.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;
use tracing::{debug, instrument, trace};

use crate::domain::{Domain, DomainRanks, DomainStandard, RankError, Standard};

/// Errors that make a domain-order table unusable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapError {
    /// The table has no rows.
    #[error("the domain-order table is empty")]
    EmptyTable,

    /// A domain token cannot be ranked.
    #[error(transparent)]
    Rank(#[from] RankError),

    /// A row has no cell in the domain column.
    #[error("row {row}: no domain in column {column}")]
    MissingDomain {
        /// 1-based row number.
        row: usize,
        /// 0-based column the domain was expected in.
        column: usize,
    },

    /// Two rows declare the same domain.
    #[error("domain '{domain}' is declared by more than one row")]
    DuplicateDomain {
        /// The repeated domain.
        domain: Domain,
    },

    /// Two distinct domains resolve to the same rank.
    #[error("domains '{first}' and '{second}' share rank {rank}")]
    RankCollision {
        /// The first domain with this rank.
        first: Domain,
        /// The second domain with this rank.
        second: Domain,
        /// The shared rank.
        rank: i64,
    },

    /// A row does not contain exactly one domain token.
    #[error("row {row}: expected exactly one domain token, found {} in [{}]", .domains.len(), .tokens.join(", "))]
    MalformedRow {
        /// 1-based row number.
        row: usize,
        /// The row's tokens.
        tokens: Vec<String>,
        /// The tokens in the row that are known domains.
        domains: Vec<Domain>,
    },

    /// A standard is listed twice within one row.
    #[error("row {row}: standard '{standard}' is listed more than once")]
    DuplicateStandard {
        /// 1-based row number.
        row: usize,
        /// The repeated standard.
        standard: Standard,
    },
}

/// The successor of each domain, by rank.
///
/// The highest-ranked domain maps to `None` (terminal).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainTransitionMap {
    /// Domains in ascending rank order.
    ordered: Vec<Domain>,
    successors: BTreeMap<Domain, Option<Domain>>,
}

impl DomainTransitionMap {
    fn from_sorted(ordered: Vec<Domain>) -> Self {
        let successors = ordered
            .iter()
            .enumerate()
            .map(|(index, domain)| (domain.clone(), ordered.get(index + 1).cloned()))
            .collect();
        Self {
            ordered,
            successors,
        }
    }

    /// Whether the domain appears in the table.
    #[must_use]
    pub fn contains(&self, domain: &Domain) -> bool {
        self.successors.contains_key(domain)
    }

    /// The next domain by rank, or `None` if `domain` is the last one or is
    /// not a known domain.
    #[must_use]
    pub fn successor(&self, domain: &Domain) -> Option<&Domain> {
        self.successors.get(domain).and_then(Option::as_ref)
    }

    /// Looks up a domain's entry: `None` if unknown, `Some(None)` if terminal.
    #[must_use]
    pub fn get(&self, domain: &Domain) -> Option<Option<&Domain>> {
        self.successors.get(domain).map(Option::as_ref)
    }

    /// All domains, lowest rank first.
    #[must_use]
    pub fn domains(&self) -> &[Domain] {
        &self.ordered
    }

    /// Iterates `(domain, successor)` pairs, lowest rank first.
    pub fn iter(&self) -> impl Iterator<Item = (&Domain, Option<&Domain>)> {
        self.ordered
            .iter()
            .map(|domain| (domain, self.successor(domain)))
    }

    /// The number of domains.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// Whether there are no domains.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

/// The successor of each `domain.standard` unit named in the table.
///
/// The last standard of the last domain maps to `None` (terminal).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DomainOrderMap {
    first: Option<DomainStandard>,
    successors: BTreeMap<DomainStandard, Option<DomainStandard>>,
}

impl DomainOrderMap {
    /// Whether the unit is part of the known sequence.
    #[must_use]
    pub fn contains(&self, unit: &DomainStandard) -> bool {
        self.successors.contains_key(unit)
    }

    /// Looks up a unit: `None` if unknown, `Some(None)` if terminal.
    #[must_use]
    pub fn get(&self, unit: &DomainStandard) -> Option<Option<&DomainStandard>> {
        self.successors.get(unit).map(Option::as_ref)
    }

    /// The next unit in the sequence, or `None` if the unit is terminal or
    /// not part of the sequence.
    #[must_use]
    pub fn successor(&self, unit: &DomainStandard) -> Option<&DomainStandard> {
        self.get(unit).flatten()
    }

    /// The first unit of the sequence: the first standard of the
    /// lowest-ranked domain that lists any.
    #[must_use]
    pub const fn first(&self) -> Option<&DomainStandard> {
        self.first.as_ref()
    }

    /// Walks the full linear sequence from [`first`](Self::first).
    pub fn sequence(&self) -> impl Iterator<Item = &DomainStandard> {
        std::iter::successors(self.first(), |unit| self.successor(unit))
    }

    /// Iterates every `(unit, successor)` entry in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&DomainStandard, Option<&DomainStandard>)> {
        self.successors
            .iter()
            .map(|(unit, next)| (unit, next.as_ref()))
    }

    /// The number of units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.successors.len()
    }

    /// Whether the map has no units.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.successors.is_empty()
    }
}

/// One parsed table row: its domain and its standards in mastery order.
#[derive(Debug)]
struct DomainRow {
    domain: Domain,
    standards: Vec<Standard>,
}

/// Derives the domain transition and domain order maps from a domain-order
/// table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainMapper {
    transitions: DomainTransitionMap,
    order: DomainOrderMap,
}

impl DomainMapper {
    /// Builds both maps from raw table rows, reading the domain of each row
    /// from the first column.
    ///
    /// # Errors
    ///
    /// See [`with_domain_column`](Self::with_domain_column).
    pub fn new<R: AsRef<[String]>>(rows: &[R], ranks: &DomainRanks) -> Result<Self, MapError> {
        Self::with_domain_column(rows, ranks, 0)
    }

    /// Builds both maps from raw table rows.
    ///
    /// `domain_column` is the cell each row's domain is collected from when
    /// building the transition map. Blank cells are ignored and rows with no
    /// content are skipped.
    ///
    /// # Errors
    ///
    /// Returns a [`MapError`] if the table is empty, a domain cannot be
    /// ranked, domains repeat or collide in rank, or any row does not contain
    /// exactly one domain token.
    #[instrument(level = "debug", skip(rows, ranks), fields(rows = rows.len()))]
    pub fn with_domain_column<R: AsRef<[String]>>(
        rows: &[R],
        ranks: &DomainRanks,
        domain_column: usize,
    ) -> Result<Self, MapError> {
        let rows: Vec<(usize, &[String])> = rows
            .iter()
            .map(AsRef::as_ref)
            .enumerate()
            .map(|(index, cells)| (index + 1, cells))
            .filter(|(_, cells)| cells.iter().any(|cell| !cell.trim().is_empty()))
            .collect();

        if rows.is_empty() {
            return Err(MapError::EmptyTable);
        }

        let transitions = transition_map(&rows, ranks, domain_column)?;
        let parsed = parse_rows(&rows, &transitions)?;
        let order = order_map(&parsed, &transitions);

        debug!(
            domains = transitions.len(),
            units = order.len(),
            "inferred domain order"
        );

        Ok(Self { transitions, order })
    }

    /// The successor of each domain by rank.
    #[must_use]
    pub const fn transition_map(&self) -> &DomainTransitionMap {
        &self.transitions
    }

    /// The successor of each `domain.standard` unit.
    #[must_use]
    pub const fn order_map(&self) -> &DomainOrderMap {
        &self.order
    }
}

fn transition_map(
    rows: &[(usize, &[String])],
    ranks: &DomainRanks,
    domain_column: usize,
) -> Result<DomainTransitionMap, MapError> {
    let mut seen = BTreeSet::new();
    let mut ranked = Vec::with_capacity(rows.len());

    for &(row, cells) in rows {
        let domain = cells
            .get(domain_column)
            .and_then(|cell| Domain::new(cell).ok())
            .ok_or(MapError::MissingDomain {
                row,
                column: domain_column,
            })?;

        if !seen.insert(domain.clone()) {
            return Err(MapError::DuplicateDomain { domain });
        }

        let rank = ranks.rank(&domain)?;
        ranked.push((rank, domain));
    }

    ranked.sort_by_key(|(rank, _)| *rank);

    for pair in ranked.windows(2) {
        let ((rank, first), (next_rank, second)) = (&pair[0], &pair[1]);
        if rank == next_rank {
            return Err(MapError::RankCollision {
                first: first.clone(),
                second: second.clone(),
                rank: *rank,
            });
        }
    }

    Ok(DomainTransitionMap::from_sorted(
        ranked.into_iter().map(|(_, domain)| domain).collect(),
    ))
}

fn parse_rows(
    rows: &[(usize, &[String])],
    transitions: &DomainTransitionMap,
) -> Result<Vec<DomainRow>, MapError> {
    rows.iter()
        .map(|&(row, cells)| parse_row(row, cells, transitions))
        .collect()
}

fn parse_row(
    row: usize,
    cells: &[String],
    transitions: &DomainTransitionMap,
) -> Result<DomainRow, MapError> {
    let tokens: Vec<&str> = cells
        .iter()
        .map(|cell| cell.trim())
        .filter(|cell| !cell.is_empty())
        .collect();

    let mut domains = Vec::new();
    let mut standards: Vec<Standard> = Vec::new();

    for token in &tokens {
        let (Ok(domain), Ok(standard)) = (Domain::new(token), Standard::new(token)) else {
            continue;
        };
        if transitions.contains(&domain) {
            domains.push(domain);
        } else if standards.contains(&standard) {
            return Err(MapError::DuplicateStandard { row, standard });
        } else {
            standards.push(standard);
        }
    }

    match <[Domain; 1]>::try_from(domains) {
        Ok([domain]) => Ok(DomainRow { domain, standards }),
        Err(domains) => Err(MapError::MalformedRow {
            row,
            tokens: tokens.iter().map(ToString::to_string).collect(),
            domains,
        }),
    }
}

fn order_map(rows: &[DomainRow], transitions: &DomainTransitionMap) -> DomainOrderMap {
    let mut successors = BTreeMap::new();

    for (index, row) in rows.iter().enumerate() {
        for (position, standard) in row.standards.iter().enumerate() {
            let unit = DomainStandard::new(row.domain.clone(), standard.clone());
            let next = row.standards.get(position + 1).map_or_else(
                || first_unit_after(&row.domain, index, rows, transitions),
                |next| Some(DomainStandard::new(row.domain.clone(), next.clone())),
            );
            trace!(%unit, next = ?next.as_ref().map(ToString::to_string), "mapped unit");
            successors.insert(unit, next);
        }
    }

    let first = transitions.domains().iter().find_map(|domain| {
        rows.iter()
            .find(|row| &row.domain == domain)
            .and_then(|row| row.standards.first())
            .map(|standard| DomainStandard::new(domain.clone(), standard.clone()))
    });

    DomainOrderMap { first, successors }
}

/// The first unit of the next domain (by rank) that lists any standards.
///
/// The successor's row is searched for from the current row onwards first,
/// then from the start of the table, so rows need not be in rank order.
fn first_unit_after(
    domain: &Domain,
    index: usize,
    rows: &[DomainRow],
    transitions: &DomainTransitionMap,
) -> Option<DomainStandard> {
    let mut current = transitions.successor(domain);

    while let Some(target) = current {
        let row = rows[index + 1..]
            .iter()
            .chain(&rows[..=index])
            .find(|row| &row.domain == target);

        if let Some(standard) = row.and_then(|row| row.standards.first()) {
            return Some(DomainStandard::new(target.clone(), standard.clone()));
        }

        current = transitions.successor(target);
    }

    None
}
