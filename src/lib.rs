//! Mentor Match - pairs mentees with mentors from survey exports
//!
//! Mentors are indexed by a wide window of GMT hour offsets and by their
//! exact industry field; mentees are then assigned greedily, in table
//! order, to the least loaded eligible mentor with spare capacity.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod report;
pub mod tabular;

// Re-export commonly used types
pub use crate::core::{gmt_offset_hours, EligibilityIndex, MatchResult, Matcher};
pub use crate::error::{MatchError, ParseError, Result};
pub use crate::models::{ParticipantRecord, Role};
pub use crate::report::{combined_table, matched_percentage, ReportSummary};
