//! Constrained random password synthesis.
//!
//! A [`PasswordRequest`] names a length and a minimum count for each
//! [`Category`]. The slack left after the minimums is split at random across
//! the categories, every character is drawn from the caller's
//! [`RandomSource`], and the result is shuffled. With a seeded source the
//! output is reproducible.
//!
//! The default source is a general-purpose PRNG; nothing here aims at
//! cryptographic strength.

pub mod config;
pub mod errors;
pub mod generators;
pub mod password;
pub mod random;

pub use errors::{ConfigError, GenerationError};
pub use generators::{Category, Requirement};
pub use password::{
    AllocationPlan, PasswordRequest, allocate, assemble, generate, generate_batch, shuffle,
};
pub use random::{RandomSource, SharedSource, seeded};
