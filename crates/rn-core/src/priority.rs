//! `PriorityList`: a small sorted list keyed by a caller-supplied score.
//!
//! The list is re-sorted on every push.  That is O(n log n) per insertion,
//! which is fine for the frontiers it serves (a few dozen graph nodes per
//! query) and keeps iteration order trivially inspectable in tests.
//!
//! Ordering is ascending by score.  Equal scores keep insertion order (the
//! sort is stable), so the element pushed first among equals is dequeued
//! first.

use crate::{CoreError, CoreResult};

/// A min-ordered list of `T`, scored by `F`.
pub struct PriorityList<T, F = fn(&T) -> f64>
where
    F: Fn(&T) -> f64,
{
    items: Vec<T>,
    score: F,
}

impl<T, F> PriorityList<T, F>
where
    F: Fn(&T) -> f64,
{
    /// Create an empty list ordered by `score`.
    pub fn new(score: F) -> Self {
        Self { items: Vec::new(), score }
    }

    /// Insert `item` and restore ascending order.
    pub fn push(&mut self, item: T) {
        self.items.push(item);
        let score = &self.score;
        self.items.sort_by(|a, b| score(a).total_cmp(&score(b)));
    }

    /// The lowest-scored element.
    pub fn peek(&self) -> CoreResult<&T> {
        self.items.first().ok_or(CoreError::EmptyQueue)
    }

    /// Remove and return the lowest-scored element.
    pub fn dequeue(&mut self) -> CoreResult<T> {
        if self.items.is_empty() {
            return Err(CoreError::EmptyQueue);
        }
        Ok(self.items.remove(0))
    }

    /// `true` if some element satisfies `pred`.
    pub fn contains_by(&self, pred: impl Fn(&T) -> bool) -> bool {
        self.items.iter().any(pred)
    }

    /// Drop every element matching `pred`.
    pub fn remove_where(&mut self, pred: impl Fn(&T) -> bool) {
        self.items.retain(|item| !pred(item));
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: std::fmt::Debug, F> std::fmt::Debug for PriorityList<T, F>
where
    F: Fn(&T) -> f64,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}
