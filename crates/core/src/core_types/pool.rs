//! Scratch-object pool for the visibility hot path
//!
//! A reaction-time search evaluates box-sampled LOS for dozens of ticks, each
//! needing two 11-point sample buffers. Instead of allocating fresh buffers per
//! evaluation the detector recycles them through a [`ScratchPool`].
//!
//! Acquisition hands out a [`Scratch`] guard that borrows the pool, so a pooled
//! value can never outlive the call that acquired it. Values are reset when
//! acquired, not when released.
//!
//! Only the hitbox sample buffers are pooled. The search path (`is_clear`,
//! `box_los`, `sees`) allocates nothing else per evaluation, and the blocking
//! triangle list of `LosDetector::point_los` is handed to the caller, so it
//! cannot come from a pool it would outlive.

use std::ops::{Deref, DerefMut};
use std::sync::{Mutex, PoisonError};

/// Values that can be returned to a zero state for reuse.
pub trait Reset {
    /// Restore the value to its zero state, keeping any allocation
    fn reset(&mut self);
}

impl<T> Reset for Vec<T> {
    #[inline]
    fn reset(&mut self) {
        self.clear();
    }
}

/// Free-list of reusable scratch values.
#[derive(Debug)]
pub struct ScratchPool<T> {
    free: Mutex<Vec<T>>,
    max_idle: usize,
}

impl<T: Reset + Default> ScratchPool<T> {
    /// Create a pool that keeps at most `max_idle` released values
    pub fn new(max_idle: usize) -> Self {
        Self {
            free: Mutex::new(Vec::with_capacity(max_idle)),
            max_idle,
        }
    }

    /// Take a value from the pool (or create one), reset to its zero state.
    pub fn acquire(&self) -> Scratch<'_, T> {
        // Values from a poisoned lock are fine: every value is reset below
        let recycled = self
            .free
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop();
        let mut item = recycled.unwrap_or_default();
        item.reset();
        Scratch { pool: self, item }
    }

    /// Number of values currently waiting for reuse
    pub fn idle_count(&self) -> usize {
        self.free
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn release(&self, item: T) {
        let mut free = self.free.lock().unwrap_or_else(PoisonError::into_inner);
        if free.len() < self.max_idle {
            free.push(item);
        }
    }
}

/// Scoped handle to a pooled value; returns the value on drop.
pub struct Scratch<'a, T: Reset + Default> {
    pool: &'a ScratchPool<T>,
    item: T,
}

impl<T: Reset + Default> Deref for Scratch<'_, T> {
    type Target = T;
    #[inline]
    fn deref(&self) -> &T {
        &self.item
    }
}

impl<T: Reset + Default> DerefMut for Scratch<'_, T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut T {
        &mut self.item
    }
}

impl<T: Reset + Default> Drop for Scratch<'_, T> {
    fn drop(&mut self) {
        self.pool.release(std::mem::take(&mut self.item));
    }
}
