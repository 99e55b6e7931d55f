// src/utils/app_time.rs

use std::time::Duration;

pub type AppInstant = std::time::Instant;

pub fn now() -> AppInstant {
    std::time::Instant::now()
}

/// Point in time `budget` from now, if a budget was given.
pub fn deadline_after(budget: Option<Duration>) -> Option<AppInstant> {
    budget.map(|b| now() + b)
}

pub fn deadline_passed(deadline: Option<AppInstant>) -> bool {
    deadline.is_some_and(|d| now() >= d)
}
