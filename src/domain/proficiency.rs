use crate::domain::{Domain, Standard};

/// The highest domain at which a student tested proficient, per standard.
///
/// Entries keep the order they were recorded in, which for a student table
/// is header column order. Standards the student was never tested on are
/// simply absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProficiencyRecord {
    tested: Vec<(Standard, Domain)>,
}

impl ProficiencyRecord {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the domain a standard was tested at, returning the previous
    /// entry if there was one.
    ///
    /// A replaced entry keeps its original position.
    pub fn insert(&mut self, standard: Standard, domain: Domain) -> Option<Domain> {
        match self.tested.iter_mut().find(|(s, _)| *s == standard) {
            Some((_, existing)) => Some(std::mem::replace(existing, domain)),
            None => {
                self.tested.push((standard, domain));
                None
            }
        }
    }

    /// The domain a standard was tested at.
    #[must_use]
    pub fn get(&self, standard: &Standard) -> Option<&Domain> {
        self.tested
            .iter()
            .find_map(|(s, domain)| (s == standard).then_some(domain))
    }

    /// Iterates the `(standard, domain)` entries in recorded order.
    pub fn iter(&self) -> impl Iterator<Item = (&Standard, &Domain)> {
        self.into_iter()
    }

    /// The number of tested standards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tested.len()
    }

    /// Whether no standards were tested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tested.is_empty()
    }
}

impl FromIterator<(Standard, Domain)> for ProficiencyRecord {
    fn from_iter<T: IntoIterator<Item = (Standard, Domain)>>(iter: T) -> Self {
        let mut record = Self::new();
        for (standard, domain) in iter {
            record.insert(standard, domain);
        }
        record
    }
}

impl<'a> IntoIterator for &'a ProficiencyRecord {
    type Item = (&'a Standard, &'a Domain);
    type IntoIter = std::iter::Map<std::slice::Iter<'a, (Standard, Domain)>, EntryRefs<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.tested.iter().map(entry_refs as EntryRefs<'a>)
    }
}

type EntryRefs<'a> = fn(&'a (Standard, Domain)) -> (&'a Standard, &'a Domain);

const fn entry_refs((standard, domain): &(Standard, Domain)) -> (&Standard, &Domain) {
    (standard, domain)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Builds a record from `(standard, domain)` string pairs.
    pub(crate) fn record(entries: &[(&str, &str)]) -> ProficiencyRecord {
        entries
            .iter()
            .map(|(standard, domain)| {
                (Standard::new(standard).unwrap(), Domain::new(domain).unwrap())
            })
            .collect()
    }

    fn standards(record: &ProficiencyRecord) -> Vec<&str> {
        record.iter().map(|(standard, _)| standard.as_str()).collect()
    }

    #[test]
    fn lookup_by_standard() {
        let record = record(&[("RF", "2"), ("RI", "K")]);
        assert_eq!(record.len(), 2);
        assert_eq!(
            record.get(&Standard::new("RI").unwrap()),
            Some(&Domain::new("K").unwrap())
        );
        assert_eq!(record.get(&Standard::new("L").unwrap()), None);
    }

    #[test]
    fn iterates_in_recorded_order() {
        let record = record(&[("RL", "1"), ("RF", "2"), ("L", "K")]);
        assert_eq!(standards(&record), vec!["RL", "RF", "L"]);
    }

    #[test]
    fn insert_replaces_previous_domain_in_place() {
        let mut record = record(&[("RF", "1"), ("L", "2")]);
        let previous = record.insert(Standard::new("RF").unwrap(), Domain::new("3").unwrap());

        assert_eq!(previous, Some(Domain::new("1").unwrap()));
        assert_eq!(record.len(), 2);
        assert_eq!(standards(&record), vec!["RF", "L"]);
        assert_eq!(
            record.get(&Standard::new("RF").unwrap()),
            Some(&Domain::new("3").unwrap())
        );
    }
}
