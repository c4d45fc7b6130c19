// Core algorithm exports
pub mod index;
pub mod matcher;
pub mod timezone;

pub use index::{EligibilityIndex, MentorEntry};
pub use matcher::{AssignmentEngine, MatchResult, Matcher, MentorAssignment};
pub use timezone::gmt_offset_hours;
