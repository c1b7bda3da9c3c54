//! Church detail page composition.

use std::collections::BTreeSet;

use super::labels::{Labels, PLACEHOLDER};
use super::types::{DetailCounters, DetailPage, DetailRow};
use crate::schedule::{Assignment, AssignmentStatus, PreacherSlot};

/// Builds the dedicated page of one church.
pub struct DetailComposer {
    labels: &'static Labels,
}

impl DetailComposer {
    /// Creates a composer with the given labels.
    #[must_use]
    pub const fn new(labels: &'static Labels) -> Self {
        Self { labels }
    }

    /// Composes the page for `church` from its chronologically sorted assignments.
    #[must_use]
    pub fn compose(&self, church: &str, assignments: &[&Assignment]) -> DetailPage {
        let labels = self.labels;
        let header = [
            labels.date,
            labels.weekday,
            labels.time,
            labels.service,
            labels.preacher,
            labels.theme,
            labels.status,
        ]
        .iter()
        .map(ToString::to_string)
        .collect();

        let rows = assignments.iter().map(|a| self.row(a)).collect();
        let counters = Self::count(assignments);

        let counter_lines = vec![
            (labels.total_assignments.to_string(), counters.total.to_string()),
            (labels.accepted_count.to_string(), counters.accepted.to_string()),
            (labels.pending_count.to_string(), counters.pending.to_string()),
            (
                labels.preacher_count.to_string(),
                counters.distinct_preachers.to_string(),
            ),
        ];

        DetailPage {
            church: church.to_string(),
            header,
            rows,
            counters,
            counter_lines,
        }
    }

    fn row(&self, assignment: &Assignment) -> DetailRow {
        let preacher = match &assignment.preacher {
            PreacherSlot::Assigned(preacher) => preacher.name.clone(),
            PreacherSlot::Unassigned => self.labels.not_assigned.to_string(),
            PreacherSlot::Unresolved(_) => PLACEHOLDER.to_string(),
        };

        DetailRow {
            date: assignment.date,
            day_month_year: assignment.date.format("%d/%m/%Y").to_string(),
            weekday: self.labels.weekday_of(assignment.date).to_string(),
            time: assignment
                .time
                .map_or_else(|| PLACEHOLDER.to_string(), |t| t.format("%H:%M").to_string()),
            service: assignment
                .service_name
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(PLACEHOLDER)
                .to_string(),
            preacher,
            theme: assignment
                .theme
                .as_ref()
                .map_or_else(|| PLACEHOLDER.to_string(), |t| t.title.clone()),
            status: self.labels.assignment_status(&assignment.status),
        }
    }

    fn count(assignments: &[&Assignment]) -> DetailCounters {
        let distinct_preachers: BTreeSet<&str> = assignments
            .iter()
            .filter_map(|a| a.preacher.name())
            .collect();

        DetailCounters {
            total: assignments.len(),
            accepted: assignments
                .iter()
                .filter(|a| a.status == AssignmentStatus::Accepted)
                .count(),
            pending: assignments
                .iter()
                .filter(|a| a.status == AssignmentStatus::Scheduled)
                .count(),
            distinct_preachers: distinct_preachers.len(),
        }
    }
}
