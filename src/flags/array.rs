//! Repeatable flag accumulator.
//!
//! A [`FlagArray`] gathers every occurrence of an option such as
//! `--trusted-proxy 10.0.0.1 --trusted-proxy 10.0.0.2` into a list.

use std::fmt;

use clap::parser::MatchesError;
use clap::ArgMatches;
use thiserror::Error;

/// Errors a flag value may report when accepting a new occurrence.
#[derive(Debug, Error)]
pub enum FlagError {
    /// The argument was registered with a value type other than `String`.
    #[error("cannot read flag values: {0}")]
    Matches(#[from] MatchesError),
}

/// Minimal contract for a value registered with a flag parser.
pub trait FlagValue: fmt::Display {
    /// Human readable form of the current value.
    fn render(&self) -> String {
        self.to_string()
    }

    /// Accept one more occurrence of the flag.
    fn set(&mut self, value: &str) -> Result<(), FlagError>;
}

/// Ordered list of every value given for a repeatable flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagArray(Vec<String>);

impl FlagArray {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect all occurrences of the string argument `id`.
    ///
    /// The argument should be registered with `ArgAction::Append`. An id
    /// that clap does not know about yields an empty collection.
    pub fn from_matches(matches: &ArgMatches, id: &str) -> Result<Self, FlagError> {
        let mut flags = Self::new();
        let values = match matches.try_get_many::<String>(id) {
            Ok(values) => values,
            Err(MatchesError::UnknownArgument { .. }) => None,
            Err(e) => return Err(e.into()),
        };

        for value in values.into_iter().flatten() {
            flags.set(value)?;
        }

        Ok(flags)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Consume the collection, returning the values in arrival order.
    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl FlagValue for FlagArray {
    fn set(&mut self, value: &str) -> Result<(), FlagError> {
        self.0.push(value.to_string());
        Ok(())
    }
}

impl fmt::Display for FlagArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

impl FromIterator<String> for FlagArray {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<String> for FlagArray {
    fn extend<I: IntoIterator<Item = String>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for FlagArray {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a FlagArray {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
