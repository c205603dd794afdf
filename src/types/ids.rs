//! Strongly-typed identifiers.
//!
//! All IDs are validated at construction time and implement common traits.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::{Error, Result};
use crate::validation::{validate_non_empty, validate_numeric};

/// Numeric Errata Tool advisory identifier (e.g. `148894`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdvisoryId(u64);

impl AdvisoryId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Parse a caller-supplied identifier. Only ASCII digits are accepted.
    pub fn parse(s: &str) -> Result<Self> {
        validate_non_empty(s, "advisory_id")?;
        validate_numeric(s, "advisory_id")?;
        s.parse::<u64>().map(Self).map_err(|_| {
            Error::validation(format!("advisory_id out of range: {}", s))
        })
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl FromStr for AdvisoryId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for AdvisoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
