//! Stopping criteria for the search loop.
//!
//! The loop asks [`Budget::is_exhausted`] before every iteration and calls
//! [`Budget::consume`] once after each completed iteration. An iteration that
//! has started always runs to completion.

use std::time::{Duration, Instant};

/// A resource the search loop spends one iteration at a time.
pub trait Budget {
    /// Whether the search must stop before starting another iteration.
    fn is_exhausted(&self) -> bool;

    /// Record one completed iteration.
    fn consume(&mut self);

    /// Wall-clock time between construction and the last `consume`.
    fn elapsed(&self) -> Duration;
}

impl<B: Budget + ?Sized> Budget for Box<B> {
    fn is_exhausted(&self) -> bool {
        (**self).is_exhausted()
    }

    fn consume(&mut self) {
        (**self).consume()
    }

    fn elapsed(&self) -> Duration {
        (**self).elapsed()
    }
}

/// Budget of a fixed number of iterations.
#[derive(Debug, Clone)]
pub struct CountBudget {
    total: u32,
    remaining: u32,
    created: Instant,
    updated: Instant,
}

impl CountBudget {
    /// Allow exactly `n` iterations.
    pub fn new(n: u32) -> Self {
        let now = Instant::now();
        Self {
            total: n,
            remaining: n,
            created: now,
            updated: now,
        }
    }

    /// Iterations consumed so far.
    pub fn used(&self) -> u32 {
        self.total - self.remaining
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}

impl Budget for CountBudget {
    fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    fn consume(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
        self.updated = Instant::now();
    }

    fn elapsed(&self) -> Duration {
        self.updated - self.created
    }
}

/// Budget of wall-clock time.
///
/// The clock is read in `consume`, so exhaustion is only noticed between
/// iterations and the first iteration always runs.
#[derive(Debug, Clone)]
pub struct TimeBudget {
    limit: Duration,
    created: Instant,
    updated: Instant,
}

impl TimeBudget {
    pub fn new(limit: Duration) -> Self {
        let now = Instant::now();
        Self {
            limit,
            created: now,
            updated: now,
        }
    }

    /// Build from a number of seconds. Negative or non-finite values mean
    /// a zero limit.
    pub fn from_secs_f64(secs: f64) -> Self {
        let limit = Duration::try_from_secs_f64(secs).unwrap_or(Duration::ZERO);
        Self::new(limit)
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }
}

impl Budget for TimeBudget {
    fn is_exhausted(&self) -> bool {
        self.updated - self.created > self.limit
    }

    fn consume(&mut self) {
        self.updated = Instant::now();
    }

    fn elapsed(&self) -> Duration {
        self.updated - self.created
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_budget_exhausts_after_n() {
        let mut budget = CountBudget::new(3);
        for _ in 0..3 {
            assert!(!budget.is_exhausted());
            budget.consume();
        }
        assert!(budget.is_exhausted());
        assert_eq!(budget.used(), 3);
        assert_eq!(budget.remaining(), 0);
    }

    #[test]
    fn test_zero_count_budget_is_exhausted_immediately() {
        let budget = CountBudget::new(0);
        assert!(budget.is_exhausted());
    }

    #[test]
    fn test_count_budget_consume_saturates() {
        let mut budget = CountBudget::new(1);
        budget.consume();
        budget.consume();
        assert_eq!(budget.remaining(), 0);
        assert_eq!(budget.used(), 1);
    }

    #[test]
    fn test_time_budget_allows_first_iteration() {
        let budget = TimeBudget::new(Duration::ZERO);
        assert!(!budget.is_exhausted());
        assert_eq!(budget.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_time_budget_exhausts_after_limit() {
        let mut budget = TimeBudget::new(Duration::from_millis(5));
        std::thread::sleep(Duration::from_millis(10));
        assert!(!budget.is_exhausted(), "clock is only read in consume");
        budget.consume();
        assert!(budget.is_exhausted());
        assert!(budget.elapsed() >= Duration::from_millis(10));
    }

    #[test]
    fn test_time_budget_from_negative_secs() {
        let budget = TimeBudget::from_secs_f64(-1.0);
        assert_eq!(budget.limit(), Duration::ZERO);
    }

    #[test]
    fn test_boxed_budget() {
        let mut budget: Box<dyn Budget> = Box::new(CountBudget::new(1));
        assert!(!budget.is_exhausted());
        budget.consume();
        assert!(budget.is_exhausted());
    }
}
