//! Property-based and scenario tests for report composition.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use escala_shared::types::ScheduleId;
use escala_shared::{Locale, PageGeometry, ReportConfig};
use proptest::prelude::*;

use super::error::ReportError;
use super::labels::PLACEHOLDER;
use super::service::ReportService;
use super::types::{PageContent, ReportDocument, Section};
use crate::schedule::{Assignment, Schedule, ScheduleData, ScheduleStatus};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
}

fn schedule() -> Schedule {
    Schedule {
        id: ScheduleId::new(),
        district_id: None,
        month: 3,
        year: 2025,
        status: ScheduleStatus::Approved,
    }
}

fn church_name(i: usize) -> String {
    format!("Igreja {i:02}")
}

/// `churches` × `dates` fully assigned grid.
fn full_grid(churches: usize, dates: &[u32]) -> Vec<Assignment> {
    (0..churches)
        .flat_map(|c| {
            dates.iter().map(move |&d| {
                Assignment::new(day(d), church_name(c)).with_preacher(format!("Pregador {c}-{d}"))
            })
        })
        .collect()
}

fn compose(assignments: Vec<Assignment>) -> Result<ReportDocument, ReportError> {
    ReportService::compose(
        &ScheduleData::new(schedule(), assignments),
        &ReportConfig::default(),
    )
}

/// Generates assignments over up to `max_churches` churches and 31 days,
/// at most one per (church, date).
fn assignments_strategy(max_churches: usize) -> impl Strategy<Value = Vec<Assignment>> {
    prop::collection::btree_map((0..max_churches, 1u32..=31), any::<bool>(), 1..120).prop_map(
        |raw| {
            raw.into_iter()
                .map(|((church, d), assigned)| {
                    let assignment = Assignment::new(day(d), church_name(church));
                    if assigned {
                        assignment.with_preacher(format!("Pregador {church}"))
                    } else {
                        assignment
                    }
                })
                .collect()
        },
    )
}

// Three churches, four dates: one single-matrix summary page and three detail pages.
#[test]
fn test_scenario_small_district_single_matrix() {
    let document = compose(full_grid(3, &[1, 8, 15, 22])).unwrap();

    assert_eq!(document.summary_pages, 1);
    assert_eq!(document.page_count(), 4);
    assert_eq!(document.matrices().count(), 1);
    assert_eq!(document.detail_pages().count(), 3);
    assert_eq!(document.filename, "escala-march-2025.pdf");

    let matrix = document.matrices().next().unwrap();
    assert_eq!(matrix.rows.len(), 4);
    assert!(
        matrix
            .rows
            .iter()
            .all(|row| row.cells.iter().all(|cell| cell != PLACEHOLDER))
    );
}

// Twelve churches against nine columns per matrix: groups of nine and three on one page.
#[test]
fn test_scenario_twelve_churches_paired_groups() {
    let document = compose(full_grid(12, &[1, 8])).unwrap();

    assert_eq!(document.summary_pages, 1);
    assert_eq!(document.page_count(), 13);

    let sizes: Vec<usize> = document.matrices().map(|m| m.churches.len()).collect();
    assert_eq!(sizes, vec![9, 3]);

    // Paginated groups share one column width.
    let widths: Vec<f32> = document.matrices().map(|m| m.column_width_mm).collect();
    assert!((widths[0] - widths[1]).abs() < f32::EPSILON);

    match &document.pages[0].content {
        PageContent::Summary(page) => assert_eq!(page.matrices.len(), 2),
        PageContent::Detail(_) => panic!("first page must be the summary"),
    }
    assert_eq!(document.pages[0].footer.text, "Summary | Page 1 of 13");
    assert_eq!(document.pages[12].footer.text, "Detail | Page 13 of 13");
}

#[test]
fn test_scenario_empty_schedule_has_no_data() {
    let data = ScheduleData::new(schedule(), Vec::new());
    let id = data.schedule.id;

    let result = ReportService::compose(&data, &ReportConfig::default());
    assert!(matches!(result, Err(ReportError::NoData(got)) if got == id));
}

#[test]
fn test_scenario_unassigned_preacher() {
    let assignments = vec![
        Assignment::new(day(1), "Central").with_preacher("João Silva"),
        Assignment::new(day(8), "Central"),
    ];
    let document = compose(assignments).unwrap();

    let matrix = document.matrices().next().unwrap();
    assert_eq!(matrix.rows[1].cells, vec![PLACEHOLDER]);

    let detail = document.detail_pages().next().unwrap();
    assert_eq!(detail.rows[1].preacher, "Not assigned");
}

#[test]
fn test_header_and_portuguese_filename() {
    let data = ScheduleData::new(schedule(), full_grid(1, &[1])).with_district_name("Distrito Sul");
    let config = ReportConfig {
        locale: Locale::PtBr,
        ..ReportConfig::default()
    };
    let document = ReportService::compose(&data, &config).unwrap();

    assert_eq!(document.filename, "escala-março-2025.pdf");
    assert_eq!(document.header.period, "Março 2025");
    assert_eq!(document.header.district, "Distrito: Distrito Sul");
    assert_eq!(document.header.status, "Situação: Aprovado");
}

#[test]
fn test_invalid_month_rejected() {
    let mut data = ScheduleData::new(schedule(), full_grid(1, &[1]));
    data.schedule.month = 13;
    let result = ReportService::compose(&data, &ReportConfig::default());
    assert!(matches!(result, Err(ReportError::InvalidMonth(13))));
}

#[test]
fn test_invalid_geometry_rejected_before_data() {
    let config = ReportConfig {
        geometry: PageGeometry {
            min_column_width_mm: 0.0,
            ..PageGeometry::default()
        },
        ..ReportConfig::default()
    };
    let data = ScheduleData::new(schedule(), full_grid(2, &[1]));
    let result = ReportService::compose(&data, &config);
    assert!(matches!(result, Err(ReportError::InvalidGeometry(_))));
}

#[test]
fn test_skipped_records_reported() {
    let mut data = ScheduleData::new(schedule(), full_grid(1, &[1]));
    data.skipped_records = 2;
    let document = ReportService::compose(&data, &ReportConfig::default()).unwrap();
    assert_eq!(document.data_quality.skipped_records, 2);
    assert!(!document.data_quality.is_clean());
}

proptest! {
    /// The date axis is exactly the sorted set of input dates.
    #[test]
    fn test_date_axis_matches_input(assignments in assignments_strategy(12)) {
        let expected: Vec<NaiveDate> = assignments
            .iter()
            .map(|a| a.date)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let document = compose(assignments).unwrap();
        for matrix in document.matrices() {
            let dates: Vec<NaiveDate> = matrix.rows.iter().map(|r| r.date).collect();
            prop_assert_eq!(&dates, &expected);
        }
    }

    /// Every church lands in exactly one matrix group and one detail page.
    #[test]
    fn test_every_church_covered_once(assignments in assignments_strategy(30)) {
        let expected: BTreeSet<String> = assignments
            .iter()
            .filter_map(|a| a.church.name().map(str::to_string))
            .collect();

        let document = compose(assignments).unwrap();

        let in_matrices: Vec<String> =
            document.matrices().flat_map(|m| m.churches.iter().cloned()).collect();
        let in_details: Vec<String> = document.detail_pages().map(|p| p.church.clone()).collect();

        prop_assert_eq!(in_matrices.len(), expected.len());
        prop_assert_eq!(in_details.len(), expected.len());
        prop_assert_eq!(in_matrices.into_iter().collect::<BTreeSet<_>>(), expected.clone());
        prop_assert_eq!(in_details.into_iter().collect::<BTreeSet<_>>(), expected);
    }

    /// Summary page count follows the pairing formula.
    #[test]
    fn test_summary_page_count(churches in 1usize..60) {
        let document = compose(full_grid(churches, &[1, 8])).unwrap();
        let max = 9;
        let expected = if churches <= max {
            1
        } else {
            churches.div_ceil(max).div_ceil(2)
        };

        prop_assert_eq!(document.summary_pages, expected);
        prop_assert_eq!(document.page_count(), expected + churches);
        prop_assert!(document
            .pages
            .iter()
            .all(|p| p.footer.total == document.page_count()));
        prop_assert!(document.pages[..expected]
            .iter()
            .all(|p| p.footer.section == Section::Summary));
    }

    /// Composition is deterministic and ignores input order.
    #[test]
    fn test_composition_is_idempotent(assignments in assignments_strategy(20)) {
        let mut reversed = assignments.clone();
        reversed.reverse();
        let data = ScheduleData::new(schedule(), assignments);
        let config = ReportConfig::default();

        let first = ReportService::compose(&data, &config).unwrap();
        let second = ReportService::compose(&data, &config).unwrap();
        prop_assert_eq!(&first, &second);

        let shuffled = ReportService::compose(
            &ScheduleData { assignments: reversed, ..data.clone() },
            &config,
        )
        .unwrap();
        prop_assert_eq!(first.pages, shuffled.pages);
    }

    /// Cells never come out empty.
    #[test]
    fn test_cells_never_empty(assignments in assignments_strategy(15)) {
        let document = compose(assignments).unwrap();
        for matrix in document.matrices() {
            for row in &matrix.rows {
                prop_assert!(row.cells.iter().all(|cell| !cell.is_empty()));
            }
        }
    }
}
