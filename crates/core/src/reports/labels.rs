//! Localised report text.

use chrono::{Datelike, NaiveDate};
use escala_shared::Locale;

use crate::schedule::{AssignmentStatus, ScheduleStatus};

/// Cell text for a missing or unresolved value, in every locale.
pub const PLACEHOLDER: &str = "—";

/// Every piece of fixed text a report prints.
#[derive(Debug)]
pub struct Labels {
    /// Report title.
    pub title: &'static str,
    /// District caption.
    pub district: &'static str,
    /// Schedule status caption.
    pub schedule_status: &'static str,
    /// Month names, January first.
    pub months: [&'static str; 12],
    /// Three-letter weekday abbreviations, Monday first.
    pub weekdays: [&'static str; 7],
    /// Date column heading.
    pub date: &'static str,
    /// Weekday column heading.
    pub weekday: &'static str,
    /// Time column heading.
    pub time: &'static str,
    /// Service column heading.
    pub service: &'static str,
    /// Preacher column heading.
    pub preacher: &'static str,
    /// Theme column heading.
    pub theme: &'static str,
    /// Status column heading.
    pub status: &'static str,
    /// Detail text for an assignment nobody preaches yet.
    pub not_assigned: &'static str,
    /// Summary section label.
    pub summary: &'static str,
    /// Detail section label.
    pub detail: &'static str,
    /// Footer page word.
    pub page: &'static str,
    /// Footer "of" word.
    pub of: &'static str,
    /// Counter: total assignments.
    pub total_assignments: &'static str,
    /// Counter: accepted assignments.
    pub accepted_count: &'static str,
    /// Counter: pending assignments.
    pub pending_count: &'static str,
    /// Counter: distinct preachers.
    pub preacher_count: &'static str,
    /// Assignment statuses: scheduled, accepted, declined, completed, cancelled.
    pub assignment_statuses: [&'static str; 5],
    /// Schedule statuses: draft, approved, finalized.
    pub schedule_statuses: [&'static str; 3],
}

static EN: Labels = Labels {
    title: "Preaching Schedule",
    district: "District",
    schedule_status: "Status",
    months: [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ],
    weekdays: ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"],
    date: "Date",
    weekday: "Day",
    time: "Time",
    service: "Service",
    preacher: "Preacher",
    theme: "Theme",
    status: "Status",
    not_assigned: "Not assigned",
    summary: "Summary",
    detail: "Detail",
    page: "Page",
    of: "of",
    total_assignments: "Total assignments",
    accepted_count: "Accepted",
    pending_count: "Pending",
    preacher_count: "Preachers",
    assignment_statuses: ["Scheduled", "Accepted", "Declined", "Completed", "Cancelled"],
    schedule_statuses: ["Draft", "Approved", "Finalized"],
};

static PT_BR: Labels = Labels {
    title: "Escala de Pregação",
    district: "Distrito",
    schedule_status: "Situação",
    months: [
        "Janeiro",
        "Fevereiro",
        "Março",
        "Abril",
        "Maio",
        "Junho",
        "Julho",
        "Agosto",
        "Setembro",
        "Outubro",
        "Novembro",
        "Dezembro",
    ],
    weekdays: ["Seg", "Ter", "Qua", "Qui", "Sex", "Sáb", "Dom"],
    date: "Data",
    weekday: "Dia",
    time: "Horário",
    service: "Culto",
    preacher: "Pregador",
    theme: "Temática",
    status: "Status",
    not_assigned: "Não designado",
    summary: "Resumo",
    detail: "Detalhe",
    page: "Página",
    of: "de",
    total_assignments: "Total de pregações",
    accepted_count: "Aceitas",
    pending_count: "Pendentes",
    preacher_count: "Pregadores",
    assignment_statuses: ["Agendado", "Aceito", "Recusado", "Realizado", "Cancelado"],
    schedule_statuses: ["Rascunho", "Aprovado", "Finalizado"],
};

impl Labels {
    /// Labels for a locale.
    #[must_use]
    pub fn for_locale(locale: Locale) -> &'static Self {
        match locale {
            Locale::En => &EN,
            Locale::PtBr => &PT_BR,
        }
    }

    /// Spelled-out month name for `1..=12`.
    #[must_use]
    pub fn month_name(&self, month: u32) -> Option<&'static str> {
        let index = usize::try_from(month.checked_sub(1)?).ok()?;
        self.months.get(index).copied()
    }

    /// Three-letter weekday abbreviation of a date.
    #[must_use]
    pub fn weekday_of(&self, date: NaiveDate) -> &'static str {
        self.weekdays[date.weekday().num_days_from_monday() as usize]
    }

    /// Capitalized label for an assignment status.
    #[must_use]
    pub fn assignment_status(&self, status: &AssignmentStatus) -> String {
        let known = match status {
            AssignmentStatus::Scheduled => 0,
            AssignmentStatus::Accepted => 1,
            AssignmentStatus::Declined => 2,
            AssignmentStatus::Completed => 3,
            AssignmentStatus::Cancelled => 4,
            AssignmentStatus::Unrecognized(raw) => return capitalize(raw),
        };
        self.assignment_statuses[known].to_string()
    }

    /// Capitalized label for a schedule status.
    #[must_use]
    pub fn schedule_status_label(&self, status: &ScheduleStatus) -> String {
        let known = match status {
            ScheduleStatus::Draft => 0,
            ScheduleStatus::Approved => 1,
            ScheduleStatus::Finalized => 2,
            ScheduleStatus::Unrecognized(raw) => return capitalize(raw),
        };
        self.schedule_statuses[known].to_string()
    }
}

/// Upper-cases the first character and lower-cases the rest.
#[must_use]
pub fn capitalize(value: &str) -> String {
    let mut chars = value.trim().chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => PLACEHOLDER.to_string(),
    }
}
