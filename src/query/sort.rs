//! Sort order of the glossary listing.
//!
//! The server takes the sort as a comma separated list of column keys, each
//! optionally prefixed with `-` for descending order, e.g. `src_content,-pos`.
//! Column order is significant and kept as inserted.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, TermbaseError};
use crate::types::DEFAULT_SORT_COLUMN;

/// Ordered mapping of column key to direction (`true` = ascending)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortSpec {
    columns: Vec<(String, bool)>,
}

impl SortSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// The order the server applies when nothing is specified
    pub fn server_default() -> Self {
        Self::single(DEFAULT_SORT_COLUMN, true)
    }

    pub fn single(column: &str, ascending: bool) -> Self {
        Self {
            columns: vec![(column.to_string(), ascending)],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Direction of `column`, if it takes part in the sort
    pub fn direction(&self, column: &str) -> Option<bool> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, asc)| *asc)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.columns.iter().map(|(name, asc)| (name.as_str(), *asc))
    }

    /// Set `column` to `ascending`, keeping its position if already present
    pub fn set(&mut self, column: &str, ascending: bool) {
        match self.columns.iter_mut().find(|(name, _)| name == column) {
            Some(slot) => slot.1 = ascending,
            None => self.columns.push((column.to_string(), ascending)),
        }
    }

    /// Flip the direction of `column`. A column not yet sorted on is added
    /// ascending. Returns the new direction.
    pub fn toggle(&mut self, column: &str) -> bool {
        let ascending = self.direction(column).map(|asc| !asc).unwrap_or(true);
        self.set(column, ascending);
        ascending
    }

    /// Request parameter form: `a,-b`
    pub fn to_param(&self) -> String {
        self.columns
            .iter()
            .map(|(name, asc)| {
                if *asc {
                    name.clone()
                } else {
                    format!("-{name}")
                }
            })
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Parse the request parameter form. An empty string yields the server's
    /// default order.
    pub fn parse(param: &str) -> Result<Self> {
        let param = param.trim();
        if param.is_empty() {
            return Ok(Self::server_default());
        }

        let mut spec = SortSpec::new();
        for part in param.split(',') {
            let part = part.trim();
            let (name, ascending) = match part.strip_prefix('-') {
                Some(name) => (name, false),
                None => (part, true),
            };
            if name.is_empty() || name.starts_with('-') {
                return Err(TermbaseError::InvalidSort(param.to_string()));
            }
            spec.set(name, ascending);
        }
        Ok(spec)
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_param())
    }
}

impl FromStr for SortSpec {
    type Err = TermbaseError;

    fn from_str(s: &str) -> Result<Self> {
        SortSpec::parse(s)
    }
}
