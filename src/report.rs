//! Summaries and the combined output table for a finished matching pass

use serde::Serialize;
use std::fmt;

use crate::config::ColumnSettings;
use crate::core::MatchResult;
use crate::error::Result;
use crate::models::ParticipantRecord;
use crate::tabular::Table;

/// Share of mentees that received a mentor, or `None` with no mentees
pub fn matched_percentage(unmatched: usize, total: usize) -> Option<f64> {
    if total == 0 {
        return None;
    }
    Some(1.0 - unmatched as f64 / total as f64)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticipantSummary {
    pub name: String,
    pub email: String,
}

impl ParticipantSummary {
    fn from_record(record: &ParticipantRecord, columns: &ColumnSettings) -> Result<Self> {
        Ok(Self {
            name: record.display_name(&[
                columns.first_name.as_str(),
                columns.middle_name.as_str(),
                columns.last_name.as_str(),
            ])?,
            email: record.get(&columns.email)?.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MentorSummary {
    #[serde(flatten)]
    pub mentor: ParticipantSummary,
    pub mentees: Vec<ParticipantSummary>,
}

/// Human-facing result of a run: mentor groups, leftovers and the match rate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub mentors: Vec<MentorSummary>,
    pub unmatched: Vec<String>,
    #[serde(rename = "totalMentees")]
    pub total_mentees: usize,
    #[serde(rename = "matchedPercentage")]
    pub matched_percentage: Option<f64>,
}

impl ReportSummary {
    pub fn build(result: &MatchResult<'_>, columns: &ColumnSettings) -> Result<Self> {
        let mut mentors = Vec::with_capacity(result.assignments.len());
        for assignment in &result.assignments {
            let mentees = assignment
                .mentees
                .iter()
                .map(|mentee| ParticipantSummary::from_record(mentee, columns))
                .collect::<Result<Vec<_>>>()?;

            mentors.push(MentorSummary {
                mentor: ParticipantSummary::from_record(assignment.mentor, columns)?,
                mentees,
            });
        }

        let unmatched = result
            .unmatched
            .iter()
            .map(|mentee| mentee.get(&columns.email).map(str::to_string))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            matched_percentage: matched_percentage(unmatched.len(), result.total_mentees),
            mentors,
            unmatched,
            total_mentees: result.total_mentees,
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for ReportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for group in &self.mentors {
            writeln!(f, "{} {}", group.mentor.name, group.mentor.email)?;
            for mentee in &group.mentees {
                writeln!(f, "\t{} {}", mentee.name, mentee.email)?;
            }
        }

        if self.unmatched.is_empty() {
            writeln!(f, "unmatched mentees: none")?;
        } else {
            writeln!(f, "unmatched mentees: {}", self.unmatched.join(", "))?;
        }

        match self.matched_percentage {
            Some(percentage) => write!(f, "matched percentage: {:?}", percentage),
            None => write!(f, "matched percentage: N/A"),
        }
    }
}

/// One row per mentor/mentee pair, per mentor without mentees and per
/// unmatched mentee, with the missing half left blank
pub fn combined_table(result: &MatchResult<'_>, columns: &ColumnSettings) -> Result<Table> {
    let headers = columns
        .mentor_output
        .iter()
        .map(|column| format!("Mentor {column}"))
        .chain(columns.mentee_output.iter().map(|column| format!("Mentee {column}")))
        .collect();

    let blank_mentor = vec![String::new(); columns.mentor_output.len()];
    let blank_mentee = vec![String::new(); columns.mentee_output.len()];

    let mut rows = Vec::new();
    for assignment in &result.assignments {
        let mentor_half = assignment.mentor.project(&columns.mentor_output)?;

        if assignment.mentees.is_empty() {
            rows.push([mentor_half, blank_mentee.clone()].concat());
            continue;
        }

        for mentee in &assignment.mentees {
            let mentee_half = mentee.project(&columns.mentee_output)?;
            rows.push([mentor_half.clone(), mentee_half].concat());
        }
    }

    for mentee in &result.unmatched {
        let mentee_half = mentee.project(&columns.mentee_output)?;
        rows.push([blank_mentor.clone(), mentee_half].concat());
    }

    Ok(Table { headers, rows })
}
