//! Schedule report routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, Utc};
use escala_shared::AppError;
use escala_shared::types::ScheduleId;
use serde::Serialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::{AppState, error::error_response};

/// Header carrying the page count of a downloaded report.
const PAGES_HEADER: &str = "x-report-pages";

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/schedules/{schedule_id}/report",
        get(download_report).post(store_report),
    )
}

// ============================================================================
// Response Types
// ============================================================================

/// Response for a stored report.
#[derive(Debug, Serialize)]
pub struct StoredReportResponse {
    /// Schedule the report belongs to.
    pub schedule_id: Uuid,
    /// Download file name.
    pub filename: String,
    /// Number of pages.
    pub pages: usize,
    /// Storage key.
    pub storage_key: String,
    /// Stored size in bytes.
    pub size: u64,
    /// Presigned download URL, when the provider supports one.
    pub download_url: Option<String>,
    /// Expiry of the download URL.
    pub expires_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/schedules/{schedule_id}/report`
/// Render a schedule report and stream it as a PDF attachment.
async fn download_report(
    State(state): State<AppState>,
    Path(schedule_id): Path<Uuid>,
) -> Response {
    let id = ScheduleId::from_uuid(schedule_id);

    let report = match state.export.render(id).await {
        Ok(report) => report,
        Err(e) => return error_response(&AppError::from(e)),
    };

    let disposition = HeaderValue::from_str(&content_disposition(&report.rendered.filename))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    (
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static(report.rendered.content_type),
            ),
            (header::CONTENT_DISPOSITION, disposition),
            (
                header::HeaderName::from_static(PAGES_HEADER),
                HeaderValue::from(report.page_count),
            ),
        ],
        report.rendered.bytes,
    )
        .into_response()
}

/// POST `/schedules/{schedule_id}/report`
/// Render a schedule report and write it to object storage.
async fn store_report(
    State(state): State<AppState>,
    Path(schedule_id): Path<Uuid>,
) -> Response {
    let Some(storage) = &state.storage else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "error": "storage_not_configured",
                "message": "Report storage is not configured"
            })),
        )
            .into_response();
    };

    let id = ScheduleId::from_uuid(schedule_id);
    match state.export.export(id, storage).await {
        Ok(outcome) => {
            info!(
                schedule_id = %id,
                storage_key = %outcome.stored.storage_key,
                "Report stored via API"
            );
            let (download_url, expires_at) = outcome
                .stored
                .download
                .map_or((None, None), |d| (Some(d.url), Some(d.expires_at)));

            (
                StatusCode::CREATED,
                Json(StoredReportResponse {
                    schedule_id,
                    filename: outcome.report.rendered.filename,
                    pages: outcome.report.page_count,
                    storage_key: outcome.stored.storage_key,
                    size: outcome.stored.size,
                    download_url,
                    expires_at,
                }),
            )
                .into_response()
        }
        Err(e) => error_response(&AppError::from(e)),
    }
}

/// `attachment` disposition with an ASCII fallback and an RFC 5987 UTF-8 name.
fn content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii_graphic() && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let encoded: String = filename
        .bytes()
        .map(|b| {
            if b.is_ascii_alphanumeric() || b"-._~".contains(&b) {
                char::from(b).to_string()
            } else {
                format!("%{b:02X}")
            }
        })
        .collect();

    format!("attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}")
}
