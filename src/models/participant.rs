use std::collections::HashMap;
use std::fmt;
use std::num::IntErrorKind;

use crate::error::{MatchError, ParseError, Result};

/// Which side of the programme a record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Mentor,
    Mentee,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Mentor => f.write_str("mentor"),
            Role::Mentee => f.write_str("mentee"),
        }
    }
}

/// One survey row, keyed by header name
///
/// Only the columns the matcher consumes are interpreted; every other
/// column is carried through untouched for the output table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParticipantRecord {
    fields: HashMap<String, String>,
}

impl ParticipantRecord {
    /// Build a record from `(column, value)` pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Value of a column, or `MissingKey` when the row has no such column
    pub fn get(&self, column: &str) -> Result<&str> {
        self.fields
            .get(column)
            .map(String::as_str)
            .ok_or_else(|| MatchError::missing_key(column))
    }

    pub fn get_opt(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Space-separated name parts, skipping blank ones
    pub fn display_name(&self, parts: &[&str]) -> Result<String> {
        let mut name = Vec::with_capacity(parts.len());
        for column in parts {
            let value = self.get(column)?.trim();
            if !value.is_empty() {
                name.push(value);
            }
        }
        Ok(name.join(" "))
    }

    /// Values of `columns` in order, for the combined output table
    pub fn project(&self, columns: &[String]) -> Result<Vec<String>> {
        columns
            .iter()
            .map(|column| self.get(column).map(str::to_string))
            .collect()
    }
}

/// Parse the mentee capacity a mentor declared
///
/// An absent column or blank cell yields `default`; anything else must be
/// an integer. Negative values are kept (such a mentor never has room) and
/// out-of-range values saturate.
pub fn parse_capacity(mentor: &str, raw: Option<&str>, default: u32) -> std::result::Result<i64, ParseError> {
    let value = match raw.map(str::trim) {
        None | Some("") => return Ok(i64::from(default)),
        Some(value) => value,
    };

    value.parse::<i64>().or_else(|err| match err.kind() {
        IntErrorKind::PosOverflow => Ok(i64::MAX),
        IntErrorKind::NegOverflow => Ok(i64::MIN),
        _ => Err(ParseError::Capacity {
            mentor: mentor.to_string(),
            value: value.to_string(),
        }),
    })
}
