//! Clock seam for "today" computation.
//!
//! The ingestion flow stamps attendance with the current calendar date.
//! Injecting the clock keeps that date fixed and observable in tests.

use crate::record::DATE_FORMAT;

/// Source of the current calendar date, formatted as a `%Y-%m-%d` key.
pub trait Clock {
    fn today(&self) -> String;
}

/// Wall-clock implementation using the local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> String {
        chrono::Local::now()
            .date_naive()
            .format(DATE_FORMAT)
            .to_string()
    }
}
