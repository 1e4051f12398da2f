//! rollcall-core — Attendance domain model and aggregation.
//!
//! Holds the static roster, the per-day attendance record type, and the
//! pure read-side aggregation functions. Nothing in this crate performs
//! I/O; the ledger and transport layers live in sibling crates.

pub mod aggregate;
pub mod clock;
pub mod record;
pub mod roster;

pub use clock::{Clock, SystemClock};
pub use record::AttendanceRecord;
pub use roster::{Member, Roster, RosterError};
