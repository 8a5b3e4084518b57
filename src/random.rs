//! Random source used by every generation step.
//!
//! The generator never reaches for a global RNG: callers hand in a source,
//! which keeps output reproducible for a given seed.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Uniform randomness consumed by the allocator, the categories and the shuffler.
pub trait RandomSource {
    /// Uniform integer in `min..=max`. Requires `min <= max`.
    fn uniform_int(&mut self, min: u64, max: u64) -> u64;

    /// Uniformly chosen element of `items`.
    ///
    /// # Panics
    ///
    /// Panics if `items` is empty.
    fn uniform_element<T: Copy>(&mut self, items: &[T]) -> T {
        let last = items.len() as u64 - 1;
        let index = self.uniform_int(0, last) as usize;
        items[index]
    }

    /// Uniform in-place permutation of `items`.
    fn permute<T>(&mut self, items: &mut [T]);
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn uniform_int(&mut self, min: u64, max: u64) -> u64 {
        self.random_range(min..=max)
    }

    fn permute<T>(&mut self, items: &mut [T]) {
        items.shuffle(self);
    }
}

/// Reproducible source for the given seed.
pub fn seeded(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// A random source shared between threads.
///
/// Draw order decides the output, so callers must hold the lock for a whole
/// generation run rather than for single draws. [`SharedSource::lock`] hands
/// out that guard; `password::SharedSource::generate` uses it.
#[derive(Debug)]
pub struct SharedSource<R> {
    inner: Arc<Mutex<R>>,
}

impl<R> SharedSource<R> {
    pub fn new(source: R) -> Self {
        Self {
            inner: Arc::new(Mutex::new(source)),
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, R> {
        // A panic mid-draw leaves the RNG in a valid state, only further along.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<R> Clone for SharedSource<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
