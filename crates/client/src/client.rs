//! Remote schedule API client.

use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

use async_trait::async_trait;
use escala_core::export::{ScheduleSource, SourceError};
use escala_core::schedule::{Assignment, Schedule, ScheduleData};
use escala_shared::ApiConfig;
use escala_shared::types::{DistrictId, ScheduleId};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use uuid::Uuid;

use crate::dto::{
    AssignmentDto, ChurchDto, DistrictDto, Listing, NameLookup, PreacherDto, ScheduleDto, ThemeDto,
};

/// Upper bound on listing pages, in case the backend ignores `skip`.
const MAX_LISTING_PAGES: usize = 1000;

/// Client for the schedule backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
    page_limit: u32,
}

impl ApiClient {
    /// Creates a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SourceError::transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone().filter(|t| !t.is_empty()),
            page_limit: config.page_limit,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, SourceError> {
        let url = format!("{}{path}", self.base_url);
        let mut request = self.http.get(&url).query(query);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SourceError::transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SourceError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| SourceError::decode(e.to_string()))
    }

    /// Fetches schedule metadata.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::NotFound`] on 404 and a transport, status or
    /// decode error otherwise.
    pub async fn fetch_schedule(&self, id: ScheduleId) -> Result<Schedule, SourceError> {
        match self
            .get_json::<ScheduleDto>(&format!("/escalas/{id}"), &[])
            .await
        {
            Ok(dto) => Ok(dto.into_schedule()),
            Err(SourceError::Status { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Err(SourceError::NotFound(id))
            }
            Err(e) => Err(e),
        }
    }

    /// Fetches a district's display name. Failures are logged, not raised.
    pub async fn fetch_district_name(&self, id: DistrictId) -> Option<String> {
        match self
            .get_json::<DistrictDto>(&format!("/distritos/{id}"), &[])
            .await
        {
            Ok(dto) => dto.name.filter(|n| !n.trim().is_empty()),
            Err(e) => {
                warn!(district_id = %id, error = %e, "District name unavailable");
                None
            }
        }
    }

    /// Fetches the assignments of a schedule.
    ///
    /// Pages through the listing with `skip`/`limit` until a short page comes
    /// back, then resolves references that arrived as bare ids. Returns the
    /// usable assignments and the number of records skipped for lacking a
    /// parseable date.
    ///
    /// # Errors
    ///
    /// Returns a transport, status or decode error. A listing that never
    /// ends is a decode error; no partial list is returned.
    pub async fn fetch_assignments(
        &self,
        id: ScheduleId,
    ) -> Result<(Vec<Assignment>, usize), SourceError> {
        let records = self.fetch_assignment_records(id).await?;
        let names = self.resolve_names(&records).await;

        let total = records.len();
        let assignments: Vec<Assignment> = records
            .into_iter()
            .filter_map(|record| record.into_assignment(&names))
            .collect();
        let skipped = total - assignments.len();

        if skipped > 0 {
            warn!(schedule_id = %id, skipped, "Skipped assignments without a usable date");
        }

        Ok((assignments, skipped))
    }

    async fn fetch_assignment_records(
        &self,
        id: ScheduleId,
    ) -> Result<Vec<AssignmentDto>, SourceError> {
        let limit = self.page_limit.max(1);
        let page_size = usize::try_from(limit).unwrap_or(usize::MAX);
        let mut records = Vec::new();

        for page in 0..MAX_LISTING_PAGES {
            let query = [
                ("escala_id", id.to_string()),
                ("skip", (page * page_size).to_string()),
                ("limit", limit.to_string()),
            ];
            let batch = self
                .get_json::<Listing<AssignmentDto>>("/pregacoes/", &query)
                .await?
                .into_items();

            let len = batch.len();
            records.extend(batch);
            if len < page_size {
                debug!(
                    schedule_id = %id,
                    pages = page + 1,
                    records = records.len(),
                    "Assignments listed"
                );
                return Ok(records);
            }
        }

        Err(SourceError::decode(format!(
            "assignment listing for {id} did not end after {MAX_LISTING_PAGES} pages"
        )))
    }

    /// Looks up names of churches, preachers and themes sent as bare ids.
    ///
    /// Each id is fetched once. Failed lookups leave the reference unresolved.
    async fn resolve_names(&self, records: &[AssignmentDto]) -> NameLookup {
        let churches: BTreeSet<Uuid> =
            records.iter().filter_map(AssignmentDto::unnamed_church).collect();
        let preachers: BTreeSet<Uuid> =
            records.iter().filter_map(AssignmentDto::unnamed_preacher).collect();
        let themes: BTreeSet<Uuid> =
            records.iter().filter_map(AssignmentDto::unnamed_theme).collect();

        let mut names = NameLookup::default();
        for id in churches {
            if let Some(name) = self
                .lookup::<ChurchDto>("igrejas", id)
                .await
                .and_then(|dto| dto.name)
            {
                names.churches.insert(id, name);
            }
        }
        for id in preachers {
            if let Some(name) = self
                .lookup::<PreacherDto>("pregadores", id)
                .await
                .and_then(|dto| dto.display_name().map(str::to_string))
            {
                names.preachers.insert(id, name);
            }
        }
        for id in themes {
            if let Some(title) = self
                .lookup::<ThemeDto>("tematicas", id)
                .await
                .and_then(|dto| dto.title)
            {
                names.themes.insert(id, title);
            }
        }

        retain_non_blank(&mut names.churches);
        retain_non_blank(&mut names.preachers);
        retain_non_blank(&mut names.themes);
        names
    }

    async fn lookup<T: DeserializeOwned>(&self, collection: &str, id: Uuid) -> Option<T> {
        match self.get_json::<T>(&format!("/{collection}/{id}"), &[]).await {
            Ok(dto) => Some(dto),
            Err(e) => {
                warn!(collection, id = %id, error = %e, "Reference name unavailable");
                None
            }
        }
    }
}

fn retain_non_blank(names: &mut HashMap<Uuid, String>) {
    names.retain(|_, name| !name.trim().is_empty());
}

#[async_trait]
impl ScheduleSource for ApiClient {
    async fn load(&self, id: ScheduleId) -> Result<ScheduleData, SourceError> {
        let schedule = self.fetch_schedule(id).await?;
        let district_name = match schedule.district_id {
            Some(district_id) => self.fetch_district_name(district_id).await,
            None => None,
        };
        let (assignments, skipped_records) = self.fetch_assignments(id).await?;

        debug!(
            schedule_id = %id,
            assignments = assignments.len(),
            skipped_records,
            "Schedule loaded"
        );

        Ok(ScheduleData {
            schedule,
            district_name,
            assignments,
            skipped_records,
        })
    }
}
