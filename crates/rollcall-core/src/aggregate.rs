//! Pure read-side aggregation over attendance records.
//!
//! Every function here takes the record sequence the ledger returned and
//! computes a summary without mutating anything. A date with no record
//! means everyone was absent that day, never an error; a name the roster
//! does not know simply counts under its own key.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::record::AttendanceRecord;
use crate::roster::Roster;

/// Attendance totals across all recorded days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalSummary {
    #[serde(rename = "totalDays")]
    pub total_days: u64,
    /// Days-present count per name. Every roster member is keyed, even at
    /// zero; names recorded outside the roster keep their own key.
    pub attendance: BTreeMap<String, u64>,
}

/// Attendance totals for a single user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    #[serde(rename = "totalDays")]
    pub total_days: u64,
    #[serde(rename = "totalPresent")]
    pub total_present: u64,
}

/// One roster member's presence on a given date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyEntry {
    pub id: u32,
    pub name: String,
    pub present: bool,
}

/// Total days recorded plus per-user presence counts.
pub fn total_summary(records: &[AttendanceRecord], roster: &Roster) -> TotalSummary {
    let mut attendance: BTreeMap<String, u64> = roster
        .members()
        .iter()
        .map(|m| (m.name.clone(), 0))
        .collect();

    for record in records {
        for name in &record.users {
            *attendance.entry(name.clone()).or_insert(0) += 1;
        }
    }

    TotalSummary {
        total_days: records.len() as u64,
        attendance,
    }
}

/// Days recorded and days `name` was present. Unknown names yield zero
/// presence, not an error.
pub fn user_summary(records: &[AttendanceRecord], name: &str) -> UserSummary {
    UserSummary {
        total_days: records.len() as u64,
        total_present: records.iter().filter(|r| r.contains(name)).count() as u64,
    }
}

/// Presence of every roster member for one date, in roster order.
///
/// `record` is the ledger's answer for that date; `None` (no record at
/// all) reports everyone absent.
pub fn daily_snapshot(record: Option<&AttendanceRecord>, roster: &Roster) -> Vec<DailyEntry> {
    roster
        .members()
        .iter()
        .map(|m| DailyEntry {
            id: m.id,
            name: m.name.clone(),
            present: record.is_some_and(|r| r.contains(&m.name)),
        })
        .collect()
}

/// Per-date presence of `name` over every date that has a record.
///
/// Dates with no record for anyone do not appear; a never-present name
/// yields `false` for every recorded date.
pub fn history(records: &[AttendanceRecord], name: &str) -> BTreeMap<String, bool> {
    records
        .iter()
        .map(|r| (r.date.clone(), r.contains(name)))
        .collect()
}
