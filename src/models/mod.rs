// Model exports
pub mod participant;

pub use participant::{parse_capacity, ParticipantRecord, Role};
