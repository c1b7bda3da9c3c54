//! Schedule data sources.

use async_trait::async_trait;
use escala_shared::types::ScheduleId;

use super::error::SourceError;
use crate::schedule::ScheduleData;

/// Loads everything one export needs in a single awaited call.
///
/// Implementations resolve references as far as the upstream allows and
/// leave the rest as unresolved variants; they never fail on a dangling
/// church or preacher.
#[async_trait]
pub trait ScheduleSource: Send + Sync {
    /// Fetches a schedule, its district name and its assignments.
    async fn load(&self, id: ScheduleId) -> Result<ScheduleData, SourceError>;
}

/// In-memory source, for tests and offline rendering.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    schedules: Vec<ScheduleData>,
}

impl StaticSource {
    /// Creates a source serving the given schedules.
    #[must_use]
    pub const fn new(schedules: Vec<ScheduleData>) -> Self {
        Self { schedules }
    }
}

#[async_trait]
impl ScheduleSource for StaticSource {
    async fn load(&self, id: ScheduleId) -> Result<ScheduleData, SourceError> {
        self.schedules
            .iter()
            .find(|data| data.schedule.id == id)
            .cloned()
            .ok_or(SourceError::NotFound(id))
    }
}
