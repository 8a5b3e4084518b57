use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::random::RandomSource;

const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"-#!$@%^&*()_+|~=`{}[]:\";'<>?,.\\/ ";

/// Character class a password is assembled from.
///
/// The declaration order is the allocation order: the last category absorbs
/// whatever slack the others left over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Lowercase,
    Uppercase,
    Digit,
    Symbol,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Lowercase,
        Category::Uppercase,
        Category::Digit,
        Category::Symbol,
    ];

    pub fn alphabet(self) -> &'static [u8] {
        match self {
            Category::Lowercase => LOWERCASE,
            Category::Uppercase => UPPERCASE,
            Category::Digit => DIGITS,
            Category::Symbol => SYMBOLS,
        }
    }

    pub fn draw<R: RandomSource + ?Sized>(self, source: &mut R) -> char {
        char::from(source.uniform_element(self.alphabet()))
    }

    /// The category whose alphabet contains `c`, if any.
    pub fn of(c: char) -> Option<Category> {
        let byte = u8::try_from(c).ok()?;
        Category::ALL
            .into_iter()
            .find(|category| category.alphabet().contains(&byte))
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Category::Lowercase => "lowercase",
            Category::Uppercase => "uppercase",
            Category::Digit => "digit",
            Category::Symbol => "symbol",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Minimum number of characters a category must contribute.
///
/// `Include(true)` asks for at least one character, `Include(false)` for none;
/// negative counts are treated as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Requirement {
    Include(bool),
    Count(i64),
}

impl Requirement {
    pub fn resolve(self) -> u64 {
        match self {
            Requirement::Include(true) => 1,
            Requirement::Include(false) => 0,
            Requirement::Count(count) => u64::try_from(count).unwrap_or(0),
        }
    }
}

impl Default for Requirement {
    fn default() -> Self {
        Requirement::Include(true)
    }
}

impl From<bool> for Requirement {
    fn from(include: bool) -> Self {
        Requirement::Include(include)
    }
}

impl From<i64> for Requirement {
    fn from(count: i64) -> Self {
        Requirement::Count(count)
    }
}

impl FromStr for Requirement {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" => Ok(Requirement::Include(true)),
            "false" | "no" | "off" => Ok(Requirement::Include(false)),
            other => other
                .parse::<i64>()
                .map(Requirement::Count)
                .map_err(|_| ConfigError::InvalidRequirement(s.to_string())),
        }
    }
}
