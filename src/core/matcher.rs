use tracing::{debug, info};

use crate::config::{ColumnSettings, MatchingSettings, Settings};
use crate::core::{index::EligibilityIndex, timezone::gmt_offset_hours};
use crate::error::Result;
use crate::models::{parse_capacity, ParticipantRecord};

/// A mentor together with the mentees assigned to it, in assignment order
#[derive(Debug, Clone)]
pub struct MentorAssignment<'a> {
    pub mentor_id: &'a str,
    pub mentor: &'a ParticipantRecord,
    pub mentees: Vec<&'a ParticipantRecord>,
}

/// Outcome of a full matching pass
#[derive(Debug, Clone)]
pub struct MatchResult<'a> {
    /// One entry per distinct mentor, in mentor table order
    pub assignments: Vec<MentorAssignment<'a>>,
    /// Mentees left without a mentor, in mentee table order
    pub unmatched: Vec<&'a ParticipantRecord>,
    pub total_mentees: usize,
}

impl MatchResult<'_> {
    pub fn matched_count(&self) -> usize {
        self.total_mentees - self.unmatched.len()
    }

    /// `(mentor id, mentee ids)` pairs, handy for comparing runs
    pub fn assignment_ids(&self, email_column: &str) -> Vec<(String, Vec<String>)> {
        self.assignments
            .iter()
            .map(|assignment| {
                let mentees = assignment
                    .mentees
                    .iter()
                    .filter_map(|mentee| mentee.get_opt(email_column).map(str::to_string))
                    .collect();
                (assignment.mentor_id.to_string(), mentees)
            })
            .collect()
    }
}

/// Greedy, load-balanced assignment of mentees to indexed mentors
///
/// Each mentee is offered to its candidate mentors in order of current
/// load (ties by identifier) and taken by the first one that still has
/// room and is not the mentee themself.
#[derive(Debug)]
pub struct AssignmentEngine<'i, 'a> {
    index: &'i EligibilityIndex<'a>,
    columns: &'i ColumnSettings,
    default_capacity: u32,
    assigned: Vec<Vec<&'a ParticipantRecord>>,
    unmatched: Vec<&'a ParticipantRecord>,
    seen: usize,
}

impl<'i, 'a> AssignmentEngine<'i, 'a> {
    pub fn new(index: &'i EligibilityIndex<'a>, columns: &'i ColumnSettings, default_capacity: u32) -> Self {
        Self {
            index,
            columns,
            default_capacity,
            assigned: vec![Vec::new(); index.len()],
            unmatched: Vec::new(),
            seen: 0,
        }
    }

    /// Current number of mentees held by the mentor in `slot`
    pub fn load(&self, slot: usize) -> usize {
        self.assigned[slot].len()
    }

    /// Try to place one mentee, returning the chosen mentor's identifier
    pub fn assign(&mut self, mentee: &'a ParticipantRecord) -> Result<Option<&'a str>> {
        self.seen += 1;

        let mentee_id = mentee.get(&self.columns.email)?;
        let offset = gmt_offset_hours(mentee.get(&self.columns.time_zone)?)?;
        let field = mentee.get(&self.columns.mentee_field)?;

        let index = self.index;
        let mut candidates = index.candidates(offset, field);
        if candidates.is_empty() {
            debug!(mentee = mentee_id, offset, field, "No mentor shares time zone window and field");
            self.unmatched.push(mentee);
            return Ok(None);
        }

        candidates.sort_by_key(|&slot| (self.assigned[slot].len(), index.mentor(slot).id));

        for slot in candidates {
            let mentor = index.mentor(slot);
            let capacity = parse_capacity(
                mentor.id,
                mentor.record.get_opt(&self.columns.capacity),
                self.default_capacity,
            )?;
            let load = self.assigned[slot].len();

            if (load as i64) < capacity && mentor.id != mentee_id {
                self.assigned[slot].push(mentee);
                debug!(mentee = mentee_id, mentor = mentor.id, load = load + 1, capacity, "Assigned mentee");
                return Ok(Some(mentor.id));
            }
        }

        debug!(mentee = mentee_id, "Every candidate mentor is full");
        self.unmatched.push(mentee);
        Ok(None)
    }

    pub fn finish(self) -> MatchResult<'a> {
        let index = self.index;
        let assignments = self
            .assigned
            .into_iter()
            .enumerate()
            .map(|(slot, mentees)| {
                let mentor = index.mentor(slot);
                MentorAssignment {
                    mentor_id: mentor.id,
                    mentor: mentor.record,
                    mentees,
                }
            })
            .collect();

        MatchResult {
            assignments,
            unmatched: self.unmatched,
            total_mentees: self.seen,
        }
    }
}

/// Main matching orchestrator
///
/// # Pipeline Stages
/// 1. Index mentors by time zone window and industry field
/// 2. Walk mentees in table order, assigning each greedily
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    matching: MatchingSettings,
    columns: ColumnSettings,
}

impl Matcher {
    pub fn new(matching: MatchingSettings, columns: ColumnSettings) -> Self {
        Self { matching, columns }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.matching.clone(), settings.columns.clone())
    }

    pub fn columns(&self) -> &ColumnSettings {
        &self.columns
    }

    /// Match every mentee against the mentor pool
    ///
    /// Invalid matching settings, or any malformed time zone, capacity or
    /// missing column, abort the whole run.
    pub fn run<'a>(
        &self,
        mentors: &'a [ParticipantRecord],
        mentees: &'a [ParticipantRecord],
    ) -> Result<MatchResult<'a>> {
        self.matching.validate()?;

        let index = EligibilityIndex::build(mentors, &self.columns, self.matching.timezone_buffer_hours)?;
        info!(mentors = index.len(), rows = mentors.len(), "Built mentor eligibility index");

        let mut engine = AssignmentEngine::new(&index, &self.columns, self.matching.default_capacity);
        for mentee in mentees {
            engine.assign(mentee)?;
        }

        let result = engine.finish();
        info!(
            matched = result.matched_count(),
            unmatched = result.unmatched.len(),
            "Assignment pass complete"
        );

        Ok(result)
    }
}
