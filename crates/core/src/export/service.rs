//! Export orchestration.

use std::sync::Arc;

use escala_shared::ReportConfig;
use escala_shared::types::ScheduleId;
use tracing::{info, instrument};

use super::error::ExportError;
use super::source::ScheduleSource;
use crate::render::{PdfRenderer, RenderedReport};
use crate::reports::{DataQuality, ReportService};
use crate::storage::{StorageService, StoredReport};

/// Storage segment used when a schedule has no district.
const NO_DISTRICT: &str = "no-district";

/// A rendered report with the facts callers log or return.
#[derive(Debug, Clone)]
pub struct ExportedReport {
    /// Schedule the report belongs to.
    pub schedule_id: ScheduleId,
    /// Storage segment of the schedule's district.
    pub district: String,
    /// Number of pages.
    pub page_count: usize,
    /// Data-quality signals of the composed document.
    pub data_quality: DataQuality,
    /// Serialized document.
    pub rendered: RenderedReport,
}

/// A report written to storage.
#[derive(Debug, Clone)]
pub struct StoredExport {
    /// The exported report.
    pub report: ExportedReport,
    /// Where it was written.
    pub stored: StoredReport,
}

/// Runs the export pipeline for one schedule at a time.
#[derive(Clone)]
pub struct ExportService {
    source: Arc<dyn ScheduleSource>,
    config: ReportConfig,
    renderer: PdfRenderer,
}

impl ExportService {
    /// Creates an export service over a data source.
    #[must_use]
    pub fn new(source: Arc<dyn ScheduleSource>, config: ReportConfig) -> Self {
        let renderer = PdfRenderer::new(config.geometry.clone());
        Self {
            source,
            config,
            renderer,
        }
    }

    /// Report configuration in use.
    #[must_use]
    pub const fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Loads, composes and renders one schedule.
    ///
    /// # Errors
    ///
    /// Returns an error if loading, composition or rendering fails. No
    /// partial document is ever returned.
    #[instrument(skip(self), fields(schedule_id = %id))]
    pub async fn render(&self, id: ScheduleId) -> Result<ExportedReport, ExportError> {
        let data = self.source.load(id).await?;
        let document = ReportService::compose(&data, &self.config)?;
        let rendered = self.renderer.render(&document)?;

        let district = data
            .schedule
            .district_id
            .map_or_else(|| NO_DISTRICT.to_string(), |d| d.to_string());

        info!(
            filename = %rendered.filename,
            pages = document.page_count(),
            summary_pages = document.summary_pages,
            "Report exported"
        );

        Ok(ExportedReport {
            schedule_id: id,
            district,
            page_count: document.page_count(),
            data_quality: document.data_quality,
            rendered,
        })
    }

    /// Renders one schedule and writes it to storage.
    ///
    /// Storage is only touched after rendering succeeded.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or the write fails.
    pub async fn export(
        &self,
        id: ScheduleId,
        storage: &StorageService,
    ) -> Result<StoredExport, ExportError> {
        let report = self.render(id).await?;
        let stored = storage.store(&report.district, &report.rendered).await?;
        Ok(StoredExport { report, stored })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{SourceError, StaticSource};
    use crate::reports::ReportError;
    use crate::schedule::{Assignment, Schedule, ScheduleData, ScheduleStatus};
    use chrono::NaiveDate;
    use escala_shared::types::DistrictId;
    use escala_shared::{StorageConfig, StorageProvider};

    fn data(assignments: Vec<Assignment>) -> ScheduleData {
        let schedule = Schedule {
            id: ScheduleId::new(),
            district_id: Some(DistrictId::new()),
            month: 3,
            year: 2025,
            status: ScheduleStatus::Approved,
        };
        ScheduleData::new(schedule, assignments).with_district_name("Distrito Sul")
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn service(schedules: Vec<ScheduleData>) -> ExportService {
        ExportService::new(
            Arc::new(StaticSource::new(schedules)),
            ReportConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_render_exports_pdf() {
        let data = data(vec![
            Assignment::new(day(1), "Central").with_preacher("João"),
            Assignment::new(day(8), "Norte").with_preacher("Maria"),
        ]);
        let id = data.schedule.id;
        let district = data.schedule.district_id.unwrap().to_string();

        let report = service(vec![data]).render(id).await.unwrap();

        assert_eq!(report.page_count, 3);
        assert_eq!(report.district, district);
        assert_eq!(report.rendered.filename, "escala-march-2025.pdf");
        assert!(report.rendered.bytes.starts_with(b"%PDF"));
        assert!(report.data_quality.is_clean());
    }

    #[tokio::test]
    async fn test_unknown_schedule_is_not_found() {
        let id = ScheduleId::new();
        let err = service(Vec::new()).render(id).await.unwrap_err();
        assert!(matches!(err, ExportError::Source(SourceError::NotFound(got)) if got == id));
    }

    #[tokio::test]
    async fn test_empty_schedule_never_touches_storage() {
        let dir = tempfile::tempdir().unwrap();
        let storage =
            StorageService::from_config(StorageConfig::new(StorageProvider::local_fs(dir.path())))
                .unwrap();
        let data = data(Vec::new());
        let id = data.schedule.id;

        let err = service(vec![data]).export(id, &storage).await.unwrap_err();

        assert!(matches!(err, ExportError::Report(ReportError::NoData(_))));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_export_stores_under_district() {
        let dir = tempfile::tempdir().unwrap();
        let storage =
            StorageService::from_config(StorageConfig::new(StorageProvider::local_fs(dir.path())))
                .unwrap();
        let data = data(vec![Assignment::new(day(1), "Central").with_preacher("João")]);
        let id = data.schedule.id;
        let district = data.schedule.district_id.unwrap();

        let outcome = service(vec![data]).export(id, &storage).await.unwrap();

        assert_eq!(
            outcome.stored.storage_key,
            format!("reports/{district}/escala-march-2025.pdf")
        );
        assert_eq!(outcome.stored.size, outcome.report.rendered.bytes.len() as u64);
    }
}
