//! Row selection notation.
//!
//! Row filters arrive as compact notation: numbers and inclusive ranges
//! separated by commas, e.g. `1,3-17,87`. Ranges work in either direction
//! (`17-3` covers the same rows as `3-17`). Row numbers are 1-based
//! everywhere; only indexing into the loaded table applies an offset.

use std::collections::BTreeSet;
use std::fmt;

/// Malformed row notation. Raised at startup, never per-row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotationError {
    token: String,
}

impl NotationError {
    /// The piece of notation that failed to parse.
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Display for NotationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid row notation: {:?} is not a number", self.token)
    }
}

impl std::error::Error for NotationError {}

/// Expand range notation into the set of row numbers it covers.
pub fn expand(notation: &str) -> Result<BTreeSet<usize>, NotationError> {
    let mut rows = BTreeSet::new();
    for element in notation.split(',') {
        let parts = element
            .split('-')
            .map(|part| {
                let part = part.trim();
                part.parse::<usize>().map_err(|_| NotationError {
                    token: part.to_string(),
                })
            })
            .collect::<Result<Vec<usize>, NotationError>>()?;
        if parts.len() == 1 {
            rows.insert(parts[0]);
        } else if let (Some(&lo), Some(&hi)) = (parts.iter().min(), parts.iter().max()) {
            rows.extend(lo..=hi);
        }
    }
    Ok(rows)
}
