//! BitChore domain core.
//!
//! Pure domain logic with no I/O: the chore entity and its status/progress
//! rules, the access policy, dashboard aggregation and report flattening.
//! The `db` and `api` crates build on these types.

pub mod access;
pub mod chore;
pub mod dashboard;
pub mod error;
pub mod report;
pub mod roles;
pub mod types;
