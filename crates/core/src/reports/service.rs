//! Report composition pipeline.

use escala_shared::ReportConfig;
use tracing::{debug, warn};

use super::aggregator::Aggregator;
use super::detail::DetailComposer;
use super::error::ReportError;
use super::footer::FooterAnnotator;
use super::labels::{Labels, PLACEHOLDER};
use super::layout::LayoutPlanner;
use super::matrix::MatrixComposer;
use super::types::{PageContent, ReportDocument, ReportHeader, SummaryPage};
use crate::schedule::ScheduleData;

/// Service for composing schedule reports.
pub struct ReportService;

impl ReportService {
    /// Composes the paginated report of one schedule.
    ///
    /// Pure: the same data and configuration always yield the same document.
    /// Runs aggregation, layout planning, matrix and detail composition, and
    /// footer stamping, in that order.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::NoData`] when no assignment can be placed, and a
    /// configuration error for an invalid geometry or reference month.
    pub fn compose(
        data: &ScheduleData,
        config: &ReportConfig,
    ) -> Result<ReportDocument, ReportError> {
        let schedule = &data.schedule;
        let labels = Labels::for_locale(config.locale);
        let month_name = labels
            .month_name(schedule.month)
            .ok_or(ReportError::InvalidMonth(schedule.month))?;
        let planner = LayoutPlanner::new(&config.geometry, config.pairing)?;

        let aggregation = Aggregator::aggregate(&data.assignments);
        if aggregation.is_empty() {
            return Err(ReportError::NoData(schedule.id));
        }

        let plan = planner.plan(aggregation.churches(), aggregation.dates().len());
        let mut contents =
            Vec::with_capacity(plan.summary_pages() + aggregation.churches().len());

        let matrices = MatrixComposer::new(&aggregation, labels);
        for page in &plan.pages {
            let matrices = page
                .iter()
                .map(|&group| matrices.compose(&plan.groups[group], plan.column_width_mm))
                .collect();
            contents.push(PageContent::Summary(SummaryPage { matrices }));
        }

        let details = DetailComposer::new(labels);
        for church in aggregation.churches() {
            let page = details.compose(church, aggregation.assignments_for(church));
            contents.push(PageContent::Detail(page));
        }

        let pages = FooterAnnotator::new(labels).annotate(contents, plan.summary_pages());

        let mut data_quality = aggregation.quality();
        data_quality.skipped_records = data.skipped_records;
        if !data_quality.is_clean() {
            warn!(
                schedule_id = %schedule.id,
                unresolved_churches = data_quality.unresolved_churches,
                unresolved_preachers = data_quality.unresolved_preachers,
                unrecognized_statuses = data_quality.unrecognized_statuses,
                skipped_records = data_quality.skipped_records,
                "Schedule data is incomplete; affected cells use placeholders"
            );
        }

        debug!(
            schedule_id = %schedule.id,
            mode = ?plan.mode,
            churches = aggregation.churches().len(),
            dates = aggregation.dates().len(),
            groups = plan.groups.len(),
            pages = pages.len(),
            "Report composed"
        );

        let district = data
            .district_name
            .clone()
            .or_else(|| schedule.district_id.map(|id| id.to_string()))
            .unwrap_or_else(|| PLACEHOLDER.to_string());

        Ok(ReportDocument {
            schedule_id: schedule.id,
            filename: Self::filename(month_name, schedule.year),
            header: ReportHeader {
                title: labels.title.to_string(),
                district: format!("{}: {district}", labels.district),
                period: format!("{month_name} {}", schedule.year),
                status: format!(
                    "{}: {}",
                    labels.schedule_status,
                    labels.schedule_status_label(&schedule.status)
                ),
            },
            summary_pages: plan.summary_pages(),
            pages,
            data_quality,
        })
    }

    /// Download name of a report: `escala-{month}-{year}.pdf`.
    #[must_use]
    pub fn filename(month_name: &str, year: i32) -> String {
        format!("escala-{}-{year}.pdf", month_name.to_lowercase())
    }
}
