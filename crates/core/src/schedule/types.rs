//! Schedule and assignment data types.
//!
//! These are read-only inputs to report generation. References that the
//! backend may leave dangling are explicit sum types so that every consumer
//! has to decide what an unresolved church or preacher looks like.

use chrono::{NaiveDate, NaiveTime};
use escala_shared::types::{
    AssignmentId, ChurchId, DistrictId, PreacherId, ScheduleId, ThemeId,
};

/// Lifecycle status of a single assignment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AssignmentStatus {
    /// Created by the schedule generator, awaiting the preacher's answer.
    Scheduled,
    /// Accepted by the preacher.
    Accepted,
    /// Declined by the preacher.
    Declined,
    /// The sermon took place.
    Completed,
    /// Cancelled.
    Cancelled,
    /// A value this engine does not know, kept verbatim.
    Unrecognized(String),
}

impl AssignmentStatus {
    /// Parses a status value, accepting both English and Portuguese spellings.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "scheduled" | "agendado" => Self::Scheduled,
            "accepted" | "aceito" => Self::Accepted,
            "declined" | "recusado" => Self::Declined,
            "completed" | "realizado" => Self::Completed,
            "cancelled" | "canceled" | "cancelado" => Self::Cancelled,
            _ => Self::Unrecognized(raw.trim().to_string()),
        }
    }

    /// Returns `false` for values outside the known enumeration.
    #[must_use]
    pub const fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

/// Lifecycle status of a monthly schedule.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScheduleStatus {
    /// Still being edited.
    Draft,
    /// Approved by the district pastor.
    Approved,
    /// Closed.
    Finalized,
    /// A value this engine does not know, kept verbatim.
    Unrecognized(String),
}

impl ScheduleStatus {
    /// Parses a status value, accepting both English and Portuguese spellings.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "draft" | "rascunho" => Self::Draft,
            "approved" | "aprovado" => Self::Approved,
            "finalized" | "finalizado" => Self::Finalized,
            _ => Self::Unrecognized(raw.trim().to_string()),
        }
    }
}

/// A church known by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Church {
    /// Backend identifier, when provided.
    pub id: Option<ChurchId>,
    /// Display name; never blank.
    pub name: String,
}

/// Church an assignment belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChurchRef {
    /// Resolved to a display name.
    Named(Church),
    /// The backend sent no usable name.
    Unresolved(Option<ChurchId>),
}

impl ChurchRef {
    /// Builds a reference from possibly-missing parts. Blank names are unresolved.
    #[must_use]
    pub fn resolve(id: Option<ChurchId>, name: Option<&str>) -> Self {
        match non_blank(name) {
            Some(name) => Self::Named(Church {
                id,
                name: name.to_string(),
            }),
            None => Self::Unresolved(id),
        }
    }

    /// Display name, if resolved.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Named(church) => Some(&church.name),
            Self::Unresolved(_) => None,
        }
    }
}

/// A preacher known by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preacher {
    /// Backend identifier, when provided.
    pub id: Option<PreacherId>,
    /// Display name; never blank.
    pub name: String,
}

/// Who preaches in an assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreacherSlot {
    /// A preacher with a display name.
    Assigned(Preacher),
    /// A preacher is referenced but their name could not be resolved.
    Unresolved(Option<PreacherId>),
    /// Nobody has been assigned yet.
    Unassigned,
}

impl PreacherSlot {
    /// Builds a slot from possibly-missing parts.
    ///
    /// A usable name wins; an id without a name is unresolved; nothing at all
    /// means unassigned.
    #[must_use]
    pub fn resolve(id: Option<PreacherId>, name: Option<&str>) -> Self {
        match (non_blank(name), id) {
            (Some(name), id) => Self::Assigned(Preacher {
                id,
                name: name.to_string(),
            }),
            (None, Some(id)) => Self::Unresolved(Some(id)),
            (None, None) => Self::Unassigned,
        }
    }

    /// Display name, if assigned and resolved.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Assigned(preacher) => Some(&preacher.name),
            Self::Unresolved(_) | Self::Unassigned => None,
        }
    }

    /// Returns `true` for a dangling preacher reference.
    #[must_use]
    pub const fn is_unresolved(&self) -> bool {
        matches!(self, Self::Unresolved(_))
    }
}

/// Sermon theme attached to an assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Backend identifier, when provided.
    pub id: Option<ThemeId>,
    /// Theme title; never blank.
    pub title: String,
}

impl Theme {
    /// Builds a theme, treating a blank title as no theme.
    #[must_use]
    pub fn resolve(id: Option<ThemeId>, title: Option<&str>) -> Option<Self> {
        non_blank(title).map(|title| Self {
            id,
            title: title.to_string(),
        })
    }
}

/// One scheduled preaching slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// Backend identifier, when provided.
    pub id: Option<AssignmentId>,
    /// Calendar day of the service.
    pub date: NaiveDate,
    /// Time of day of the service.
    pub time: Option<NaiveTime>,
    /// Service label, e.g. "Culto Divino".
    pub service_name: Option<String>,
    /// Church the service takes place in.
    pub church: ChurchRef,
    /// Assigned preacher.
    pub preacher: PreacherSlot,
    /// Sermon theme.
    pub theme: Option<Theme>,
    /// Lifecycle status.
    pub status: AssignmentStatus,
}

impl Assignment {
    /// Creates a scheduled, unassigned assignment for a church on a date.
    #[must_use]
    pub fn new(date: NaiveDate, church: impl Into<String>) -> Self {
        let church: String = church.into();
        Self {
            id: None,
            date,
            time: None,
            service_name: None,
            church: ChurchRef::resolve(None, Some(&church)),
            preacher: PreacherSlot::Unassigned,
            theme: None,
            status: AssignmentStatus::Scheduled,
        }
    }

    /// Set the assignment id.
    #[must_use]
    pub fn with_id(mut self, id: AssignmentId) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the service time.
    #[must_use]
    pub fn with_time(mut self, time: NaiveTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Set the service label.
    #[must_use]
    pub fn with_service(mut self, name: impl Into<String>) -> Self {
        self.service_name = Some(name.into());
        self
    }

    /// Assign a preacher by name.
    #[must_use]
    pub fn with_preacher(mut self, name: impl Into<String>) -> Self {
        self.preacher = PreacherSlot::Assigned(Preacher {
            id: None,
            name: name.into(),
        });
        self
    }

    /// Set the preacher slot.
    #[must_use]
    pub fn with_preacher_slot(mut self, slot: PreacherSlot) -> Self {
        self.preacher = slot;
        self
    }

    /// Set the church reference.
    #[must_use]
    pub fn with_church(mut self, church: ChurchRef) -> Self {
        self.church = church;
        self
    }

    /// Attach a theme by title.
    #[must_use]
    pub fn with_theme(mut self, title: impl Into<String>) -> Self {
        self.theme = Some(Theme {
            id: None,
            title: title.into(),
        });
        self
    }

    /// Set the status.
    #[must_use]
    pub fn with_status(mut self, status: AssignmentStatus) -> Self {
        self.status = status;
        self
    }
}

/// Monthly container of assignments for one district.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    /// Schedule identifier.
    pub id: ScheduleId,
    /// District the schedule belongs to.
    pub district_id: Option<DistrictId>,
    /// Reference month, 1-12.
    pub month: u32,
    /// Reference year.
    pub year: i32,
    /// Lifecycle status.
    pub status: ScheduleStatus,
}

/// Everything fetched for one export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleData {
    /// Schedule metadata.
    pub schedule: Schedule,
    /// District display name, when it could be fetched.
    pub district_name: Option<String>,
    /// Assignments of the schedule, in any order.
    pub assignments: Vec<Assignment>,
    /// Records dropped by the loader because they could not be placed on a date.
    pub skipped_records: usize,
}

impl ScheduleData {
    /// Bundles a schedule with its assignments.
    #[must_use]
    pub fn new(schedule: Schedule, assignments: Vec<Assignment>) -> Self {
        Self {
            schedule,
            district_name: None,
            assignments,
            skipped_records: 0,
        }
    }

    /// Set the district display name.
    #[must_use]
    pub fn with_district_name(mut self, name: impl Into<String>) -> Self {
        self.district_name = Some(name.into());
        self
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
