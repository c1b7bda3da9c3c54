//! Report document types.
//!
//! A [`ReportDocument`] is built fresh for every export and handed to a
//! renderer; nothing here is mutated after composition finishes.

use chrono::NaiveDate;
use escala_shared::types::ScheduleId;

/// Which phase of the report a page belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// Summary matrix pages.
    Summary,
    /// Per-church detail pages.
    Detail,
}

/// Header printed at the top of every page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportHeader {
    /// Report title.
    pub title: String,
    /// District caption and name.
    pub district: String,
    /// Spelled-out month and year, e.g. "March 2025".
    pub period: String,
    /// Schedule status caption and label.
    pub status: String,
}

/// One body row of a summary matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixRow {
    /// Date of the row.
    pub date: NaiveDate,
    /// Day and month, `dd/mm`.
    pub day_month: String,
    /// Weekday abbreviation.
    pub weekday: String,
    /// One cell per church of the group: preacher name or placeholder.
    pub cells: Vec<String>,
}

/// One date × church grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    /// Position of the group in the planned partition.
    pub group_index: usize,
    /// Column headings: date, weekday, then one per church.
    pub header: Vec<String>,
    /// Churches of the group, in column order.
    pub churches: Vec<String>,
    /// Width of every church column.
    pub column_width_mm: f32,
    /// One row per date of the shared axis.
    pub rows: Vec<MatrixRow>,
}

/// A page of the summary phase holding one or two matrices.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryPage {
    /// Matrices stacked top to bottom.
    pub matrices: Vec<Matrix>,
}

/// One row of a church detail table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRow {
    /// Date of the service.
    pub date: NaiveDate,
    /// Formatted date, `dd/mm/yyyy`.
    pub day_month_year: String,
    /// Weekday abbreviation.
    pub weekday: String,
    /// Time of day, `HH:MM`, or placeholder.
    pub time: String,
    /// Service label or placeholder.
    pub service: String,
    /// Preacher name, "not assigned" text, or placeholder when unresolved.
    pub preacher: String,
    /// Theme title or placeholder.
    pub theme: String,
    /// Capitalized status label.
    pub status: String,
}

/// Counters printed under a church detail table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DetailCounters {
    /// All assignments of the church.
    pub total: usize,
    /// Assignments with status accepted.
    pub accepted: usize,
    /// Assignments with status scheduled.
    pub pending: usize,
    /// Distinct named preachers.
    pub distinct_preachers: usize,
}

/// Dedicated page for one church.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailPage {
    /// Church name.
    pub church: String,
    /// Column headings.
    pub header: Vec<String>,
    /// Chronological rows.
    pub rows: Vec<DetailRow>,
    /// Summary counters.
    pub counters: DetailCounters,
    /// Counter captions paired with their formatted values.
    pub counter_lines: Vec<(String, String)>,
}

/// Content of a page, before or after footer stamping.
#[derive(Debug, Clone, PartialEq)]
pub enum PageContent {
    /// Summary matrix page.
    Summary(SummaryPage),
    /// Church detail page.
    Detail(DetailPage),
}

impl PageContent {
    /// Section this content belongs to.
    #[must_use]
    pub const fn section(&self) -> Section {
        match self {
            Self::Summary(_) => Section::Summary,
            Self::Detail(_) => Section::Detail,
        }
    }
}

/// Pagination stamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFooter {
    /// 1-based page index.
    pub index: usize,
    /// Total number of pages in the document.
    pub total: usize,
    /// Section label source.
    pub section: Section,
    /// Rendered footer line.
    pub text: String,
}

/// A composed and stamped page.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Page body.
    pub content: PageContent,
    /// Footer stamp.
    pub footer: PageFooter,
}

/// Data-quality signals collected while composing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DataQuality {
    /// Assignments whose church has no usable name (left out of the report).
    pub unresolved_churches: usize,
    /// Assignments that reference a preacher without a usable name.
    pub unresolved_preachers: usize,
    /// Assignments with a status value outside the known set.
    pub unrecognized_statuses: usize,
    /// Records dropped by the loader before composition.
    pub skipped_records: usize,
}

impl DataQuality {
    /// Returns `true` when no signal was raised.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.unresolved_churches == 0
            && self.unresolved_preachers == 0
            && self.unrecognized_statuses == 0
            && self.skipped_records == 0
    }
}

/// Print-ready paginated schedule report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDocument {
    /// Schedule the report was generated for.
    pub schedule_id: ScheduleId,
    /// Download file name, `escala-{month}-{year}.pdf`.
    pub filename: String,
    /// Header repeated on every page.
    pub header: ReportHeader,
    /// Number of pages in the summary phase.
    pub summary_pages: usize,
    /// All pages in print order.
    pub pages: Vec<Page>,
    /// Data-quality signals.
    pub data_quality: DataQuality,
}

impl ReportDocument {
    /// Total number of pages.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Summary matrices in print order.
    pub fn matrices(&self) -> impl Iterator<Item = &Matrix> {
        self.pages.iter().flat_map(|page| match &page.content {
            PageContent::Summary(summary) => summary.matrices.as_slice(),
            PageContent::Detail(_) => &[],
        })
    }

    /// Church detail pages in print order.
    pub fn detail_pages(&self) -> impl Iterator<Item = &DetailPage> {
        self.pages.iter().filter_map(|page| match &page.content {
            PageContent::Detail(detail) => Some(detail),
            PageContent::Summary(_) => None,
        })
    }
}
