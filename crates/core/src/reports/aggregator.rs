//! Groups assignments by church and derives the shared date and church axes.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use super::types::DataQuality;
use crate::schedule::Assignment;

/// Result of aggregating one schedule's assignments.
///
/// Borrows the input; nothing is cloned or reordered in place.
#[derive(Debug, Clone)]
pub struct Aggregation<'a> {
    dates: Vec<NaiveDate>,
    churches: Vec<String>,
    by_church: BTreeMap<String, Vec<&'a Assignment>>,
    quality: DataQuality,
}

/// Builds [`Aggregation`]s.
pub struct Aggregator;

impl Aggregator {
    /// Aggregates a flat assignment list.
    ///
    /// The output depends only on the set of assignments, not on their order:
    /// dates ascend, church names sort lexicographically, and each church's
    /// assignments are ordered by date, time, service label and id.
    #[must_use]
    pub fn aggregate(assignments: &[Assignment]) -> Aggregation<'_> {
        let mut dates = BTreeSet::new();
        let mut by_church: BTreeMap<String, Vec<&Assignment>> = BTreeMap::new();
        let mut quality = DataQuality::default();

        for assignment in assignments {
            dates.insert(assignment.date);

            if assignment.preacher.is_unresolved() {
                quality.unresolved_preachers += 1;
            }
            if !assignment.status.is_recognized() {
                quality.unrecognized_statuses += 1;
            }

            match assignment.church.name() {
                Some(name) => by_church.entry(name.to_string()).or_default().push(assignment),
                None => quality.unresolved_churches += 1,
            }
        }

        for list in by_church.values_mut() {
            list.sort_by(|a, b| {
                let key_a = (a.date, a.time, &a.service_name, a.id);
                key_a.cmp(&(b.date, b.time, &b.service_name, b.id))
            });
        }

        Aggregation {
            dates: dates.into_iter().collect(),
            churches: by_church.keys().cloned().collect(),
            by_church,
            quality,
        }
    }
}

impl<'a> Aggregation<'a> {
    /// Sorted unique dates across the whole schedule.
    #[must_use]
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Sorted unique church names.
    #[must_use]
    pub fn churches(&self) -> &[String] {
        &self.churches
    }

    /// Chronological assignments of one church; empty for unknown names.
    #[must_use]
    pub fn assignments_for(&self, church: &str) -> &[&'a Assignment] {
        self.by_church.get(church).map_or(&[][..], Vec::as_slice)
    }

    /// The earliest assignment of `church` on `date`, if any.
    #[must_use]
    pub fn assignment_on(&self, church: &str, date: NaiveDate) -> Option<&'a Assignment> {
        let list = self.assignments_for(church);
        let start = list.partition_point(|a| a.date < date);
        list.get(start).copied().filter(|a| a.date == date)
    }

    /// Returns `true` when no church can be placed in a report.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.churches.is_empty()
    }

    /// Data-quality signals seen while grouping.
    #[must_use]
    pub const fn quality(&self) -> DataQuality {
        self.quality
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{AssignmentStatus, ChurchRef, PreacherSlot};
    use chrono::NaiveTime;
    use escala_shared::types::PreacherId;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[test]
    fn test_empty_input_yields_empty_axes() {
        let aggregation = Aggregator::aggregate(&[]);
        assert!(aggregation.is_empty());
        assert!(aggregation.dates().is_empty());
        assert!(aggregation.churches().is_empty());
    }

    #[test]
    fn test_dates_and_churches_sorted_and_unique() {
        let assignments = vec![
            Assignment::new(day(15), "Norte"),
            Assignment::new(day(1), "Central"),
            Assignment::new(day(8), "Norte"),
            Assignment::new(day(1), "Norte"),
        ];
        let aggregation = Aggregator::aggregate(&assignments);

        assert_eq!(aggregation.dates(), &[day(1), day(8), day(15)]);
        assert_eq!(aggregation.churches(), &["Central".to_string(), "Norte".to_string()]);
        assert_eq!(aggregation.assignments_for("Norte").len(), 3);
        assert!(aggregation.assignments_for("Sul").is_empty());
    }

    #[test]
    fn test_church_assignments_are_chronological() {
        let evening = NaiveTime::from_hms_opt(19, 30, 0).unwrap();
        let morning = NaiveTime::from_hms_opt(10, 0, 0).unwrap();
        let assignments = vec![
            Assignment::new(day(8), "Central").with_time(evening),
            Assignment::new(day(1), "Central"),
            Assignment::new(day(8), "Central").with_time(morning),
        ];
        let aggregation = Aggregator::aggregate(&assignments);
        let list = aggregation.assignments_for("Central");

        assert_eq!(list[0].date, day(1));
        assert_eq!(list[1].time, Some(morning));
        assert_eq!(list[2].time, Some(evening));
    }

    #[test]
    fn test_assignment_on_picks_earliest_service() {
        let evening = NaiveTime::from_hms_opt(19, 30, 0).unwrap();
        let morning = NaiveTime::from_hms_opt(10, 0, 0).unwrap();
        let assignments = vec![
            Assignment::new(day(8), "Central")
                .with_time(evening)
                .with_preacher("Maria"),
            Assignment::new(day(8), "Central")
                .with_time(morning)
                .with_preacher("João"),
        ];
        let aggregation = Aggregator::aggregate(&assignments);

        let found = aggregation.assignment_on("Central", day(8)).unwrap();
        assert_eq!(found.preacher.name(), Some("João"));
        assert!(aggregation.assignment_on("Central", day(9)).is_none());
        assert!(aggregation.assignment_on("Norte", day(8)).is_none());
    }

    #[test]
    fn test_quality_signals_counted() {
        let assignments = vec![
            Assignment::new(day(1), "Central")
                .with_preacher_slot(PreacherSlot::Unresolved(Some(PreacherId::new()))),
            Assignment::new(day(1), "ignored").with_church(ChurchRef::Unresolved(None)),
            Assignment::new(day(2), "Central")
                .with_status(AssignmentStatus::Unrecognized("faltou".into())),
        ];
        let aggregation = Aggregator::aggregate(&assignments);
        let quality = aggregation.quality();

        assert_eq!(quality.unresolved_preachers, 1);
        assert_eq!(quality.unresolved_churches, 1);
        assert_eq!(quality.unrecognized_statuses, 1);
        assert_eq!(aggregation.churches(), &["Central".to_string()]);
    }

    #[test]
    fn test_only_unresolved_churches_is_empty() {
        let assignments =
            vec![Assignment::new(day(1), "x").with_church(ChurchRef::Unresolved(None))];
        let aggregation = Aggregator::aggregate(&assignments);
        assert!(aggregation.is_empty());
        assert_eq!(aggregation.dates(), &[day(1)]);
    }
}
