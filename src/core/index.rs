use std::collections::{BTreeSet, HashMap};
use tracing::{debug, warn};

use crate::config::ColumnSettings;
use crate::core::timezone::gmt_offset_hours;
use crate::error::{ParseError, Result};
use crate::models::ParticipantRecord;

/// A mentor as seen by the index: its identifier and its survey row
#[derive(Debug, Clone, Copy)]
pub struct MentorEntry<'a> {
    pub id: &'a str,
    pub record: &'a ParticipantRecord,
}

/// Lookup tables used to narrow the mentor pool for one mentee
///
/// Mentors are referred to by their slot, the position at which their
/// identifier was first seen in the mentor table. Slots double as the
/// report order.
#[derive(Debug)]
pub struct EligibilityIndex<'a> {
    mentors: Vec<MentorEntry<'a>>,
    slots: HashMap<&'a str, usize>,
    by_timezone: HashMap<i32, BTreeSet<usize>>,
    by_field: HashMap<&'a str, BTreeSet<usize>>,
}

impl<'a> EligibilityIndex<'a> {
    /// Index every mentor under each hour bucket in
    /// `[offset - buffer_hours, offset + buffer_hours]` and under its exact
    /// industry field.
    pub fn build(
        mentors: &'a [ParticipantRecord],
        columns: &ColumnSettings,
        buffer_hours: i32,
    ) -> Result<Self> {
        let mut index = Self {
            mentors: Vec::with_capacity(mentors.len()),
            slots: HashMap::with_capacity(mentors.len()),
            by_timezone: HashMap::new(),
            by_field: HashMap::new(),
        };

        for record in mentors {
            let id = record.get(&columns.email)?;
            let label = record.get(&columns.time_zone)?;
            let offset = gmt_offset_hours(label)?;
            let field = record.get(&columns.mentor_field)?;

            let (Some(first_hour), Some(last_hour)) = (
                offset.checked_sub(buffer_hours),
                offset.checked_add(buffer_hours),
            ) else {
                return Err(ParseError::TimeZone(label.to_string()).into());
            };

            let slot = match index.slots.get(id) {
                Some(&slot) => {
                    warn!(mentor = id, "Duplicate mentor row, later answers take precedence");
                    index.mentors[slot].record = record;
                    slot
                }
                None => {
                    let slot = index.mentors.len();
                    index.mentors.push(MentorEntry { id, record });
                    index.slots.insert(id, slot);
                    slot
                }
            };

            for hour in first_hour..=last_hour {
                index.by_timezone.entry(hour).or_default().insert(slot);
            }
            index.by_field.entry(field).or_default().insert(slot);

            debug!(mentor = id, offset, field, "Indexed mentor");
        }

        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.mentors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mentors.is_empty()
    }

    /// Distinct mentors in first-seen order
    pub fn mentors(&self) -> &[MentorEntry<'a>] {
        &self.mentors
    }

    pub fn mentor(&self, slot: usize) -> MentorEntry<'a> {
        self.mentors[slot]
    }

    pub fn slot_of(&self, id: &str) -> Option<usize> {
        self.slots.get(id).copied()
    }

    /// Slots of mentors whose window covers `offset` and whose field equals `field`
    pub fn candidates(&self, offset: i32, field: &str) -> Vec<usize> {
        match (self.by_timezone.get(&offset), self.by_field.get(field)) {
            (Some(in_timezone), Some(in_field)) => {
                in_timezone.intersection(in_field).copied().collect()
            }
            _ => Vec::new(),
        }
    }

    /// Identifiers of mentors whose window covers `offset`
    pub fn mentors_in_timezone(&self, offset: i32) -> Vec<&'a str> {
        self.ids(self.by_timezone.get(&offset))
    }

    /// Identifiers of mentors declaring exactly `field`
    pub fn mentors_in_field(&self, field: &str) -> Vec<&'a str> {
        self.ids(self.by_field.get(field))
    }

    /// Number of hour buckets containing the mentor `id`
    pub fn timezone_bucket_count(&self, id: &str) -> usize {
        let Some(slot) = self.slot_of(id) else {
            return 0;
        };
        self.by_timezone
            .values()
            .filter(|bucket| bucket.contains(&slot))
            .count()
    }

    fn ids(&self, slots: Option<&BTreeSet<usize>>) -> Vec<&'a str> {
        slots
            .map(|slots| slots.iter().map(|&slot| self.mentors[slot].id).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MatchError;

    fn mentor(email: &str, tz: &str, field: &str) -> ParticipantRecord {
        let columns = ColumnSettings::default();
        ParticipantRecord::from_pairs([
            (columns.email, email),
            (columns.time_zone, tz),
            (columns.mentor_field, field),
        ])
    }

    #[test]
    fn test_each_mentor_in_25_buckets() {
        let mentors = vec![
            mentor("a@x.org", "(GMT)", "Performer"),
            mentor("b@x.org", "(GMT-05:00) Eastern", "Writer"),
            mentor("c@x.org", "(GMT+05:30) Kolkata", "Performer"),
        ];
        let index = EligibilityIndex::build(&mentors, &ColumnSettings::default(), 12).unwrap();

        for id in ["a@x.org", "b@x.org", "c@x.org"] {
            assert_eq!(index.timezone_bucket_count(id), 25, "{id}");
        }
        assert_eq!(index.timezone_bucket_count("nobody@x.org"), 0);
    }

    #[test]
    fn test_window_edges() {
        let mentors = vec![mentor("b@x.org", "(GMT-05:00) Eastern", "Writer")];
        let index = EligibilityIndex::build(&mentors, &ColumnSettings::default(), 12).unwrap();

        assert_eq!(index.mentors_in_timezone(-17), vec!["b@x.org"]);
        assert_eq!(index.mentors_in_timezone(7), vec!["b@x.org"]);
        assert!(index.mentors_in_timezone(-18).is_empty());
        assert!(index.mentors_in_timezone(8).is_empty());
    }

    #[test]
    fn test_field_index_is_exact() {
        let mentors = vec![
            mentor("a@x.org", "(GMT)", "Performer"),
            mentor("b@x.org", "(GMT)", "performer"),
        ];
        let index = EligibilityIndex::build(&mentors, &ColumnSettings::default(), 12).unwrap();

        assert_eq!(index.mentors_in_field("Performer"), vec!["a@x.org"]);
        assert_eq!(index.mentors_in_field("performer"), vec!["b@x.org"]);
        assert!(index.mentors_in_field("Performer ").is_empty());
    }

    #[test]
    fn test_candidates_intersect_timezone_and_field() {
        let mentors = vec![
            mentor("a@x.org", "(GMT)", "Performer"),
            mentor("b@x.org", "(GMT+12:00) Auckland", "Performer"),
            mentor("c@x.org", "(GMT)", "Writer"),
        ];
        let index = EligibilityIndex::build(&mentors, &ColumnSettings::default(), 12).unwrap();

        assert_eq!(index.candidates(0, "Performer"), vec![0, 1]);
        assert_eq!(index.candidates(-5, "Performer"), vec![0]);
        assert!(index.candidates(0, "Director").is_empty());
    }

    #[test]
    fn test_duplicate_mentor_keeps_first_slot() {
        let mentors = vec![
            mentor("a@x.org", "(GMT)", "Performer"),
            mentor("b@x.org", "(GMT)", "Writer"),
            mentor("a@x.org", "(GMT+10:00) Sydney", "Director"),
        ];
        let index = EligibilityIndex::build(&mentors, &ColumnSettings::default(), 12).unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.slot_of("a@x.org"), Some(0));
        assert!(std::ptr::eq(index.mentor(0).record, &mentors[2]));
        assert_eq!(index.mentors_in_field("Performer"), vec!["a@x.org"]);
        assert_eq!(index.mentors_in_field("Director"), vec!["a@x.org"]);
        assert_eq!(index.mentors_in_timezone(22), vec!["a@x.org"]);
    }

    #[test]
    fn test_bad_timezone_aborts() {
        let mentors = vec![mentor("a@x.org", "Pacific", "Performer")];
        let err = EligibilityIndex::build(&mentors, &ColumnSettings::default(), 12).unwrap_err();

        assert!(matches!(err, MatchError::Parse(ParseError::TimeZone(_))));
    }

    #[test]
    fn test_offset_near_i32_limits_is_rejected() {
        for tz in ["(GMT+2147483647:00)", "(GMT-2147483647:00)", "(GMT+2147483640:00)"] {
            let mentors = vec![mentor("a@x.org", tz, "Performer")];
            let err = EligibilityIndex::build(&mentors, &ColumnSettings::default(), 12).unwrap_err();

            assert!(
                matches!(&err, MatchError::Parse(ParseError::TimeZone(label)) if label == tz),
                "{tz}: {err}"
            );
        }
    }

    #[test]
    fn test_missing_column_aborts() {
        let columns = ColumnSettings::default();
        let mentors = vec![ParticipantRecord::from_pairs([(columns.email.clone(), "a@x.org")])];
        let err = EligibilityIndex::build(&mentors, &columns, 12).unwrap_err();

        assert!(matches!(err, MatchError::MissingKey { column } if column == "Time Zone"));
    }
}
