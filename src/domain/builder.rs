//! Per-student curriculum resolution.
//!
//! Given the inferred sequence, the [`CurriculumBuilder`] finds the earliest
//! unit a student needs to revisit and walks forward from it, skipping units
//! the student has already mastered, until the curriculum is full or the
//! sequence ends.

use std::{fmt, num::NonZeroUsize};

use tracing::{debug, instrument, trace};

use crate::domain::{
    Domain, DomainMapper, DomainRanks, DomainStandard, ProficiencyRecord, RankError, Standard,
};

/// The default upper bound on the number of units in a curriculum.
pub const DEFAULT_MAX_LENGTH: NonZeroUsize = NonZeroUsize::new(5).unwrap();

/// An ordered list of recommended units for one student.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Curriculum(Vec<DomainStandard>);

impl Curriculum {
    /// The units, in recommended order.
    #[must_use]
    pub fn units(&self) -> &[DomainStandard] {
        &self.0
    }

    /// The number of units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the curriculum has no units.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the units in order.
    pub fn iter(&self) -> std::slice::Iter<'_, DomainStandard> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a Curriculum {
    type Item = &'a DomainStandard;
    type IntoIter = std::slice::Iter<'a, DomainStandard>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<Curriculum> for Vec<DomainStandard> {
    fn from(curriculum: Curriculum) -> Self {
        curriculum.0
    }
}

impl fmt::Display for Curriculum {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let units: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&units.join(", "))
    }
}

/// Resolves remediation starting points and curricula against an inferred
/// domain order.
///
/// The builder only reads the mapper and rank table, so one builder can be
/// shared across threads to plan many students at once.
#[derive(Debug, Clone, Copy)]
pub struct CurriculumBuilder<'a> {
    mapper: &'a DomainMapper,
    ranks: &'a DomainRanks,
    max_length: NonZeroUsize,
}

impl<'a> CurriculumBuilder<'a> {
    /// Creates a builder producing curricula of at most
    /// [`DEFAULT_MAX_LENGTH`] units.
    #[must_use]
    pub const fn new(mapper: &'a DomainMapper, ranks: &'a DomainRanks) -> Self {
        Self {
            mapper,
            ranks,
            max_length: DEFAULT_MAX_LENGTH,
        }
    }

    /// Sets the maximum number of units in a curriculum.
    #[must_use]
    pub const fn with_max_length(mut self, max_length: NonZeroUsize) -> Self {
        self.max_length = max_length;
        self
    }

    /// The maximum number of units in a curriculum.
    #[must_use]
    pub const fn max_length(&self) -> NonZeroUsize {
        self.max_length
    }

    /// Resolves a student's full curriculum: the minimum unit followed by the
    /// applicable units after it.
    ///
    /// A student with no tested standards gets an empty curriculum.
    ///
    /// # Errors
    ///
    /// Returns a [`RankError`] if a domain in the record cannot be ranked.
    pub fn resolve(&self, record: &ProficiencyRecord) -> Result<Curriculum, RankError> {
        match self.minimum(record)? {
            Some(start) => self.build(&start, record),
            None => Ok(Curriculum::default()),
        }
    }

    /// Projects a tested `(standard, domain)` pair onto the known sequence.
    ///
    /// If the pair is already a unit of the sequence it is returned as is.
    /// Otherwise later domains are tried in rank order and the first that
    /// lists the standard wins. If none does, the original pair is returned:
    /// it can still act as a starting point but cannot be walked forward.
    #[must_use]
    pub fn most_applicable(&self, standard: &Standard, tested: &Domain) -> DomainStandard {
        let order = self.mapper.order_map();
        let transitions = self.mapper.transition_map();

        let original = DomainStandard::new(tested.clone(), standard.clone());
        if order.contains(&original) {
            return original;
        }

        let mut current = transitions.successor(tested);
        while let Some(domain) = current {
            let candidate = DomainStandard::new(domain.clone(), standard.clone());
            if order.contains(&candidate) {
                trace!(from = %original, to = %candidate, "projected onto later domain");
                return candidate;
            }
            current = transitions.successor(domain);
        }

        debug!(unit = %original, "combination is outside the known sequence");
        original
    }

    /// The earliest unit, over every tested standard, at which the student
    /// needs remediation.
    ///
    /// Returns `None` for an empty record.
    ///
    /// # Errors
    ///
    /// Returns a [`RankError`] if a domain in the record cannot be ranked.
    #[instrument(level = "trace", skip_all)]
    pub fn minimum(&self, record: &ProficiencyRecord) -> Result<Option<DomainStandard>, RankError> {
        let mut minimum: Option<DomainStandard> = None;

        for (standard, domain) in record {
            let candidate = self.most_applicable(standard, domain);
            minimum = match minimum {
                Some(current) if !self.is_earlier(&candidate, &current)? => Some(current),
                _ => Some(candidate),
            };
        }

        Ok(minimum)
    }

    /// Whether `test` comes strictly before `base`.
    ///
    /// A lower-ranked domain is always earlier. Otherwise `test` is earlier
    /// only if walking forward from it reaches `base` without leaving
    /// `base`'s domain. Units outside the sequence, or walks that hit the end
    /// of the sequence, are never earlier.
    ///
    /// # Errors
    ///
    /// Returns a [`RankError`] if either domain cannot be ranked.
    pub fn is_earlier(&self, test: &DomainStandard, base: &DomainStandard) -> Result<bool, RankError> {
        if self.ranks.rank(test.domain())? < self.ranks.rank(base.domain())? {
            return Ok(true);
        }
        Ok(self.precedes_within_domain(test, base))
    }

    fn precedes_within_domain(&self, test: &DomainStandard, base: &DomainStandard) -> bool {
        let order = self.mapper.order_map();

        let Some(mut current) = order.successor(test) else {
            return false;
        };

        while current.domain() == base.domain() && current.standard() != base.standard() {
            match order.successor(current) {
                Some(next) => current = next,
                None => return false,
            }
        }

        current == base
    }

    /// Builds a curriculum starting at `start`.
    ///
    /// `start` is always the first unit. The sequence is then walked forward
    /// one unit at a time; each unit is included only if it is applicable to
    /// the student. Skipped units do not count towards the maximum length, so
    /// the curriculum may be shorter if the sequence ends first.
    ///
    /// # Errors
    ///
    /// Returns a [`RankError`] if a domain in the record cannot be ranked.
    #[instrument(level = "trace", skip_all, fields(start = %start))]
    pub fn build(
        &self,
        start: &DomainStandard,
        record: &ProficiencyRecord,
    ) -> Result<Curriculum, RankError> {
        let order = self.mapper.order_map();
        let mut units = vec![start.clone()];
        let mut current = start;

        while units.len() < self.max_length.get() {
            let Some(next) = order.successor(current) else {
                break;
            };
            if self.is_applicable(Some(next), record)? {
                units.push(next.clone());
            } else {
                trace!(unit = %next, "skipped mastered unit");
            }
            current = next;
        }

        Ok(Curriculum(units))
    }

    /// Whether a unit still needs work: the student's recorded domain for its
    /// standard is no higher than the unit's domain.
    ///
    /// Terminal (`None`) is never applicable. A standard the student was never
    /// tested on is always applicable.
    ///
    /// # Errors
    ///
    /// Returns a [`RankError`] if either domain cannot be ranked.
    pub fn is_applicable(
        &self,
        unit: Option<&DomainStandard>,
        record: &ProficiencyRecord,
    ) -> Result<bool, RankError> {
        let Some(unit) = unit else {
            return Ok(false);
        };

        match record.get(unit.standard()) {
            Some(tested) => Ok(self.ranks.rank(tested)? <= self.ranks.rank(unit.domain())?),
            None => Ok(true),
        }
    }
}
