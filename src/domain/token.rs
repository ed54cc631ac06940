use std::{fmt, ops::Deref, str::FromStr};

use non_empty_string::NonEmptyString;

/// Error returned when a table cell cannot be used as a domain or standard
/// token.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    /// The token was empty (or only whitespace).
    #[error("token must not be empty")]
    Empty,

    /// A `domain.standard` string had no `.` separator.
    #[error("Invalid domain-standard '{0}': expected '<domain>.<standard>'")]
    Syntax(String),
}

macro_rules! token_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(NonEmptyString);

        impl $name {
            /// Creates a token from a string, trimming surrounding whitespace.
            ///
            /// # Errors
            ///
            /// Returns [`TokenError::Empty`] if nothing remains after trimming.
            pub fn new(s: impl AsRef<str>) -> Result<Self, TokenError> {
                NonEmptyString::new(s.as_ref().trim().to_string())
                    .map(Self)
                    .map_err(|_| TokenError::Empty)
            }

            /// Returns the string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl FromStr for $name {
            type Err = TokenError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TokenError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str(self.0.as_str())
            }
        }
    };
}

token_type! {
    /// A coarse, ranked curriculum level such as `K` or `3`.
    Domain
}

token_type! {
    /// A skill category such as `RF` or `RL`.
    ///
    /// Only meaningful when paired with a [`Domain`].
    Standard
}

/// One unit of the linear curriculum: a standard at a given domain.
///
/// Displayed (and parsed) as `<domain>.<standard>`, e.g. `K.RI`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DomainStandard {
    domain: Domain,
    standard: Standard,
}

impl DomainStandard {
    /// Pairs a domain with a standard.
    #[must_use]
    pub const fn new(domain: Domain, standard: Standard) -> Self {
        Self { domain, standard }
    }

    /// The domain component.
    #[must_use]
    pub const fn domain(&self) -> &Domain {
        &self.domain
    }

    /// The standard component.
    #[must_use]
    pub const fn standard(&self) -> &Standard {
        &self.standard
    }
}

impl fmt::Display for DomainStandard {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{}", self.domain, self.standard)
    }
}

impl FromStr for DomainStandard {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (domain, standard) = s
            .split_once('.')
            .ok_or_else(|| TokenError::Syntax(s.to_string()))?;
        Ok(Self::new(Domain::new(domain)?, Standard::new(standard)?))
    }
}

impl TryFrom<&str> for DomainStandard {
    type Error = TokenError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_str(value)
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test]
    fn tokens_are_trimmed() {
        let domain = Domain::new("  K ").unwrap();
        assert_eq!(domain.as_str(), "K");
    }

    #[test_case(""; "empty")]
    #[test_case("   "; "whitespace only")]
    fn empty_tokens_are_rejected(input: &str) {
        assert_eq!(Standard::new(input), Err(TokenError::Empty));
    }

    #[test]
    fn domain_standard_display() {
        let unit = DomainStandard::new(Domain::new("K").unwrap(), Standard::new("RI").unwrap());
        assert_eq!(unit.to_string(), "K.RI");
    }

    #[test_case("K.RI", "K", "RI"; "kindergarten")]
    #[test_case("3.L", "3", "L"; "numeric domain")]
    #[test_case("2.RL.1", "2", "RL.1"; "dotted standard")]
    fn parse_domain_standard(input: &str, domain: &str, standard: &str) {
        let unit: DomainStandard = input.parse().unwrap();
        assert_eq!(unit.domain().as_str(), domain);
        assert_eq!(unit.standard().as_str(), standard);
    }

    #[test]
    fn parse_without_separator_fails() {
        let result = DomainStandard::try_from("KRI");
        assert!(matches!(result, Err(TokenError::Syntax(_))));
    }

    #[test]
    fn parse_with_missing_standard_fails() {
        assert_eq!(DomainStandard::try_from("K."), Err(TokenError::Empty));
    }
}
