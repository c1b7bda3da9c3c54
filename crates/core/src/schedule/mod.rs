//! Schedule domain: assignments, schedules and their references.

pub mod types;

pub use types::{
    Assignment, AssignmentStatus, Church, ChurchRef, Preacher, PreacherSlot, Schedule,
    ScheduleData, ScheduleStatus, Theme,
};
