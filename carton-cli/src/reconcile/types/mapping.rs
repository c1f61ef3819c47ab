//! Column references and their resolution to header labels

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// Errors from parsing a spreadsheet column reference
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColumnRefError {
    #[error("column reference is empty")]
    Empty,
    #[error("invalid column reference '{0}': expected letters A-Z")]
    Invalid(String),
    #[error("column reference '{0}' is out of range")]
    Overflow(String),
    #[error("expected 5 column letters (key,user,sum,date,head), got {0}")]
    WrongCount(usize),
}

/// A spreadsheet column letter reference (A, B, ..., Z, AA, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColumnRef {
    letters: String,
    index: usize,
}

impl ColumnRef {
    /// Parse column letters, case-insensitive, surrounding whitespace ignored
    pub fn parse(s: &str) -> Result<Self, ColumnRefError> {
        let letters = s.trim().to_uppercase();
        if letters.is_empty() {
            return Err(ColumnRefError::Empty);
        }
        if !letters.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(ColumnRefError::Invalid(s.trim().to_string()));
        }
        let index =
            letters_to_index(&letters).ok_or_else(|| ColumnRefError::Overflow(letters.clone()))?;
        Ok(ColumnRef { letters, index })
    }

    /// Zero-based column index (A=0, Z=25, AA=26)
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn letters(&self) -> &str {
        &self.letters
    }
}

/// Base-26 bijective conversion; caller guarantees A-Z only
fn letters_to_index(letters: &str) -> Option<usize> {
    let mut acc: usize = 0;
    for b in letters.bytes() {
        acc = acc
            .checked_mul(26)?
            .checked_add((b - b'A') as usize + 1)?;
    }
    Some(acc - 1)
}

impl TryFrom<String> for ColumnRef {
    type Error = ColumnRefError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        ColumnRef::parse(&s)
    }
}

impl From<ColumnRef> for String {
    fn from(c: ColumnRef) -> Self {
        c.letters
    }
}

impl std::fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letters)
    }
}

impl std::str::FromStr for ColumnRef {
    type Err = ColumnRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColumnRef::parse(s)
    }
}

/// Per-source column references for the five logical roles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRefs {
    /// Deduplication key
    pub key: ColumnRef,
    /// Contact identity
    pub user: ColumnRef,
    /// Amount to sum
    pub sum: ColumnRef,
    /// Day of the record
    pub date: ColumnRef,
    /// Auxiliary label column
    pub head: ColumnRef,
}

impl ColumnRefs {
    /// Parse "key,user,sum,date,head" letters, e.g. "A,C,F,B,D"
    pub fn from_list(s: &str) -> Result<Self, ColumnRefError> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 5 {
            return Err(ColumnRefError::WrongCount(parts.len()));
        }
        Ok(ColumnRefs {
            key: ColumnRef::parse(parts[0])?,
            user: ColumnRef::parse(parts[1])?,
            sum: ColumnRef::parse(parts[2])?,
            date: ColumnRef::parse(parts[3])?,
            head: ColumnRef::parse(parts[4])?,
        })
    }

    /// Resolve every reference to the header label at its index
    pub fn resolve(&self, headers: &[String]) -> Result<ColumnMapping> {
        let label = |role: &str, col: &ColumnRef| -> Result<String> {
            match headers.get(col.index()) {
                Some(h) => Ok(h.clone()),
                None => bail!(
                    "Column {} ({}) is beyond the header row ({} columns)",
                    col,
                    role,
                    headers.len()
                ),
            }
        };

        Ok(ColumnMapping {
            key: label("key", &self.key)?,
            user: label("user", &self.user)?,
            sum: label("sum", &self.sum)?,
            date: label("date", &self.date)?,
            head: label("head", &self.head)?,
        })
    }
}

impl std::str::FromStr for ColumnRefs {
    type Err = ColumnRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColumnRefs::from_list(s)
    }
}

/// Header labels playing each logical role, resolved once per run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pub key: String,
    pub user: String,
    pub sum: String,
    pub date: String,
    pub head: String,
}
