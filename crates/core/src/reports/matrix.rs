//! Summary matrix composition.

use super::aggregator::Aggregation;
use super::labels::{Labels, PLACEHOLDER};
use super::layout::MatrixGroup;
use super::types::{Matrix, MatrixRow};

/// Builds one date × church grid per matrix group.
pub struct MatrixComposer<'r, 'a> {
    aggregation: &'r Aggregation<'a>,
    labels: &'static Labels,
}

impl<'r, 'a> MatrixComposer<'r, 'a> {
    /// Creates a composer over an aggregation.
    #[must_use]
    pub const fn new(aggregation: &'r Aggregation<'a>, labels: &'static Labels) -> Self {
        Self {
            aggregation,
            labels,
        }
    }

    /// Composes the matrix of one group against the shared date axis.
    ///
    /// A cell holds the preacher of the matching (date, church) assignment,
    /// or the placeholder when there is none or nobody usable is assigned.
    #[must_use]
    pub fn compose(&self, group: &MatrixGroup, column_width_mm: f32) -> Matrix {
        let mut header = Vec::with_capacity(group.churches.len() + 2);
        header.push(self.labels.date.to_string());
        header.push(self.labels.weekday.to_string());
        header.extend(group.churches.iter().cloned());

        let rows = self
            .aggregation
            .dates()
            .iter()
            .map(|&date| MatrixRow {
                date,
                day_month: date.format("%d/%m").to_string(),
                weekday: self.labels.weekday_of(date).to_string(),
                cells: group
                    .churches
                    .iter()
                    .map(|church| {
                        self.aggregation
                            .assignment_on(church, date)
                            .and_then(|assignment| assignment.preacher.name())
                            .unwrap_or(PLACEHOLDER)
                            .to_string()
                    })
                    .collect(),
            })
            .collect();

        Matrix {
            group_index: group.index,
            header,
            churches: group.churches.clone(),
            column_width_mm,
            rows,
        }
    }
}
