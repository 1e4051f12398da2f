use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Calendar-date key format used everywhere a date crosses a boundary
/// (ledger rows, D-Bus arguments, history keys).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Everyone marked present on one calendar date.
///
/// `users` is a set: re-marking the same name on the same day is a no-op.
/// Records are created on the first recognition event for a date and only
/// ever grow; the core never deletes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub date: String,
    pub users: BTreeSet<String>,
}

impl AttendanceRecord {
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            users: BTreeSet::new(),
        }
    }

    /// Whether `name` was marked present on this date.
    pub fn contains(&self, name: &str) -> bool {
        self.users.contains(name)
    }
}

/// Parse a `%Y-%m-%d` date key, e.g. for CLI argument validation.
pub fn parse_day(s: &str) -> Option<chrono::NaiveDate> {
    chrono::NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}
