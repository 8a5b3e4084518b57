use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::errors::GenerationError;
use crate::generators::{Category, Requirement};
use crate::random::{RandomSource, SharedSource};

/// What to generate: a length and a minimum per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordRequest {
    pub length: i64,
    pub lowercase: Requirement,
    pub uppercase: Requirement,
    pub digit: Requirement,
    pub symbol: Requirement,
}

impl PasswordRequest {
    pub fn new(length: i64) -> Self {
        Self {
            length,
            ..Self::default()
        }
    }

    pub fn requirement(&self, category: Category) -> Requirement {
        match category {
            Category::Lowercase => self.lowercase,
            Category::Uppercase => self.uppercase,
            Category::Digit => self.digit,
            Category::Symbol => self.symbol,
        }
    }

    pub fn set_requirement(&mut self, category: Category, requirement: Requirement) {
        match category {
            Category::Lowercase => self.lowercase = requirement,
            Category::Uppercase => self.uppercase = requirement,
            Category::Digit => self.digit = requirement,
            Category::Symbol => self.symbol = requirement,
        }
    }

    /// Resolved minimums in [`Category::ALL`] order.
    pub fn resolved(&self) -> [u64; 4] {
        Category::ALL.map(|category| self.requirement(category).resolve())
    }

    /// Checks the request and returns the length as an unsigned count.
    pub fn validate(&self) -> Result<u64, GenerationError> {
        let length = u64::try_from(self.length).map_err(|_| GenerationError::InvalidLength {
            length: self.length,
        })?;

        let required = self.resolved().iter().fold(0u64, |acc, n| acc.saturating_add(*n));
        if required > length {
            return Err(GenerationError::Overconstrained {
                required,
                length,
                excess: required - length,
            });
        }

        Ok(length)
    }
}

impl Default for PasswordRequest {
    fn default() -> Self {
        Self {
            length: 12,
            lowercase: Requirement::default(),
            uppercase: Requirement::default(),
            digit: Requirement::default(),
            symbol: Requirement::default(),
        }
    }
}

/// Number of characters each category emits: its minimum plus its share of
/// the slack.
///
/// Counts are signed because an over-constrained allocation pushes the last
/// category below zero; [`AllocationPlan::emit_count`] clamps them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocationPlan {
    required: [u64; 4],
    extras: [i64; 4],
}

impl AllocationPlan {
    pub fn chars_to_emit(&self, category: Category) -> i64 {
        let i = category.index();
        to_signed(self.required[i]).saturating_add(self.extras[i])
    }

    pub fn emit_count(&self, category: Category) -> usize {
        usize::try_from(self.chars_to_emit(category)).unwrap_or(0)
    }

    pub fn extra(&self, category: Category) -> i64 {
        self.extras[category.index()]
    }

    pub fn extras(&self) -> [i64; 4] {
        self.extras
    }

    /// Total characters the assembler will draw.
    pub fn total(&self) -> usize {
        Category::ALL
            .into_iter()
            .map(|category| self.emit_count(category))
            .sum()
    }
}

/// Splits `length - sum(required)` extra characters across the categories.
///
/// Every category but the last draws its extra count uniformly from
/// `0..=remaining`; the last one takes whatever is left, so the slack is
/// always consumed exactly.
///
/// When the minimums exceed `length` no draws are made: the leading
/// categories get no extras and the last one carries the (negative)
/// remainder, which clamps its emit count at zero.
pub fn allocate<R: RandomSource + ?Sized>(
    length: u64,
    required: &[u64; 4],
    source: &mut R,
) -> AllocationPlan {
    let required_total = required.iter().fold(0u64, |acc, n| acc.saturating_add(*n));
    let slack = to_signed(length).saturating_sub(to_signed(required_total));

    let mut extras = [0i64; 4];
    let mut remaining = slack;
    let last = Category::ALL.len() - 1;

    for (i, extra) in extras.iter_mut().enumerate() {
        *extra = if i == last {
            remaining
        } else if remaining > 0 {
            // remaining > 0, so the cast back is lossless
            source.uniform_int(0, remaining as u64) as i64
        } else {
            0
        };
        remaining -= *extra;
    }

    debug!(length, slack, ?extras, "allocated slack");

    AllocationPlan {
        required: *required,
        extras,
    }
}

/// Draws every category's characters, in category order.
pub fn assemble<R: RandomSource + ?Sized>(plan: &AllocationPlan, source: &mut R) -> Vec<char> {
    let mut chars = Vec::with_capacity(plan.total());

    for category in Category::ALL {
        let count = plan.emit_count(category);
        chars.extend((0..count).map(|_| category.draw(source)));
    }

    chars
}

/// Permutes the assembled characters and joins them.
pub fn shuffle<R: RandomSource + ?Sized>(mut chars: Vec<char>, source: &mut R) -> String {
    source.permute(&mut chars);
    chars.into_iter().collect()
}

/// Generates one password satisfying `request`.
///
/// Validation happens before any draw: an invalid or over-constrained request
/// leaves the source untouched.
pub fn generate<R: RandomSource + ?Sized>(
    request: &PasswordRequest,
    source: &mut R,
) -> Result<String, GenerationError> {
    let length = request.validate()?;
    Ok(generate_validated(length, &request.resolved(), source))
}

/// Generates `count` passwords from the same running source.
pub fn generate_batch<R: RandomSource + ?Sized>(
    request: &PasswordRequest,
    count: usize,
    source: &mut R,
) -> Result<Vec<String>, GenerationError> {
    let length = request.validate()?;
    let required = request.resolved();

    Ok((0..count)
        .map(|_| generate_validated(length, &required, source))
        .collect())
}

fn generate_validated<R: RandomSource + ?Sized>(
    length: u64,
    required: &[u64; 4],
    source: &mut R,
) -> String {
    trace!(?required, "resolved");
    let plan = allocate(length, required, source);
    trace!(total = plan.total(), "allocated");
    let chars = assemble(&plan, source);
    trace!(len = chars.len(), "assembled");
    shuffle(chars, source)
}

fn to_signed(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

impl<R: RandomSource> SharedSource<R> {
    /// Generates under the source lock, so concurrent callers never
    /// interleave draws within one password.
    pub fn generate(&self, request: &PasswordRequest) -> Result<String, GenerationError> {
        let length = request.validate()?;
        let mut source = self.lock();
        Ok(generate_validated(length, &request.resolved(), &mut *source))
    }
}
