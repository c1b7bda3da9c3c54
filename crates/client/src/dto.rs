//! Wire types of the remote schedule API.
//!
//! Every field is optional on the wire. Conversion into domain types decides
//! what a missing value means.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime};
use escala_core::schedule::{
    Assignment, AssignmentStatus, ChurchRef, PreacherSlot, Schedule, ScheduleStatus, Theme,
};
use escala_shared::types::{AssignmentId, ChurchId, DistrictId, PreacherId, ScheduleId, ThemeId};
use serde::Deserialize;
use uuid::Uuid;

/// `GET /escalas/{id}`
#[derive(Debug, Deserialize)]
pub(crate) struct ScheduleDto {
    pub id: Uuid,
    #[serde(default, alias = "distrito_id")]
    pub district_id: Option<String>,
    #[serde(alias = "mes_referencia")]
    pub month: u32,
    #[serde(alias = "ano_referencia")]
    pub year: i32,
    #[serde(default)]
    pub status: Option<String>,
}

impl ScheduleDto {
    pub fn into_schedule(self) -> Schedule {
        Schedule {
            id: ScheduleId::from_uuid(self.id),
            district_id: parse_id(self.district_id.as_deref()).map(DistrictId::from_uuid),
            month: self.month,
            year: self.year,
            status: ScheduleStatus::parse(self.status.as_deref().unwrap_or_default()),
        }
    }
}

/// `GET /distritos/{id}`
#[derive(Debug, Deserialize)]
pub(crate) struct DistrictDto {
    #[serde(default, alias = "nome")]
    pub name: Option<String>,
}

/// Either a bare array or a wrapped page of items.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Listing<T> {
    Plain(Vec<T>),
    Wrapped {
        #[serde(alias = "data")]
        items: Vec<T>,
    },
}

impl<T> Listing<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Plain(items) | Self::Wrapped { items } => items,
        }
    }
}

/// `GET /igrejas/{id}` and nested `igreja`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ChurchDto {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, alias = "nome")]
    pub name: Option<String>,
}

/// `GET /pregadores/{id}` and nested `pregador`.
///
/// Preachers carry `nome_completo` and sometimes a short `nome` as well.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct PreacherDto {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub nome_completo: Option<String>,
    #[serde(default)]
    pub nome: Option<String>,
}

impl PreacherDto {
    pub fn display_name(&self) -> Option<&str> {
        [&self.name, &self.nome_completo, &self.nome]
            .into_iter()
            .filter_map(Option::as_deref)
            .find(|n| !n.trim().is_empty())
    }
}

/// `GET /tematicas/{id}` and nested `tematica`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ThemeDto {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, alias = "titulo")]
    pub title: Option<String>,
}

/// `GET /pregacoes/?escala_id={id}`
#[derive(Debug, Deserialize)]
pub(crate) struct AssignmentDto {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, alias = "data_pregacao")]
    pub date: Option<String>,
    #[serde(default, alias = "horario_pregacao")]
    pub time: Option<String>,
    #[serde(default, alias = "nome_culto")]
    pub service_name: Option<String>,
    #[serde(default, alias = "igreja")]
    pub church: Option<ChurchDto>,
    #[serde(default, alias = "igreja_id")]
    pub church_id: Option<String>,
    #[serde(default, alias = "pregador")]
    pub preacher: Option<PreacherDto>,
    #[serde(default, alias = "pregador_id")]
    pub preacher_id: Option<String>,
    #[serde(default, alias = "tematica")]
    pub theme: Option<ThemeDto>,
    #[serde(default, alias = "tematica_id")]
    pub theme_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Display names fetched separately for references sent as bare ids.
#[derive(Debug, Default)]
pub(crate) struct NameLookup {
    pub churches: HashMap<Uuid, String>,
    pub preachers: HashMap<Uuid, String>,
    pub themes: HashMap<Uuid, String>,
}

impl AssignmentDto {
    fn church_id(&self) -> Option<Uuid> {
        let nested = self.church.as_ref().and_then(|c| c.id.as_deref());
        parse_id(nested.or(self.church_id.as_deref()))
    }

    fn preacher_id(&self) -> Option<Uuid> {
        let nested = self.preacher.as_ref().and_then(|p| p.id.as_deref());
        parse_id(nested.or(self.preacher_id.as_deref()))
    }

    fn theme_id(&self) -> Option<Uuid> {
        let nested = self.theme.as_ref().and_then(|t| t.id.as_deref());
        parse_id(nested.or(self.theme_id.as_deref()))
    }

    /// Church id whose name was not sent inline.
    pub fn unnamed_church(&self) -> Option<Uuid> {
        let named = self.church.as_ref().and_then(|c| non_blank(c.name.as_deref()));
        named.is_none().then(|| self.church_id()).flatten()
    }

    /// Preacher id whose name was not sent inline.
    pub fn unnamed_preacher(&self) -> Option<Uuid> {
        let named = self.preacher.as_ref().and_then(PreacherDto::display_name);
        named.is_none().then(|| self.preacher_id()).flatten()
    }

    /// Theme id whose title was not sent inline.
    pub fn unnamed_theme(&self) -> Option<Uuid> {
        let named = self.theme.as_ref().and_then(|t| non_blank(t.title.as_deref()));
        named.is_none().then(|| self.theme_id()).flatten()
    }

    /// Converts to a domain assignment. `None` when the date is unusable.
    ///
    /// Inline names win; ids without one are looked up in `names`.
    pub fn into_assignment(self, names: &NameLookup) -> Option<Assignment> {
        let date = parse_date(self.date.as_deref()?)?;

        let church_id = self.church_id();
        let preacher_id = self.preacher_id();
        let theme_id = self.theme_id();

        let church = self.church.unwrap_or_default();
        let church_name = non_blank(church.name.as_deref())
            .or_else(|| church_id.and_then(|id| names.churches.get(&id)).map(String::as_str));

        let preacher = self.preacher.unwrap_or_default();
        let preacher_name = preacher
            .display_name()
            .or_else(|| preacher_id.and_then(|id| names.preachers.get(&id)).map(String::as_str));

        let theme = self.theme.unwrap_or_default();
        let theme_title = non_blank(theme.title.as_deref())
            .or_else(|| theme_id.and_then(|id| names.themes.get(&id)).map(String::as_str));

        Some(Assignment {
            id: parse_id(self.id.as_deref()).map(AssignmentId::from_uuid),
            date,
            time: self.time.as_deref().and_then(parse_time),
            service_name: self.service_name.filter(|s| !s.trim().is_empty()),
            church: ChurchRef::resolve(church_id.map(ChurchId::from_uuid), church_name),
            preacher: PreacherSlot::resolve(preacher_id.map(PreacherId::from_uuid), preacher_name),
            theme: Theme::resolve(theme_id.map(ThemeId::from_uuid), theme_title),
            status: AssignmentStatus::parse(self.status.as_deref().unwrap_or_default()),
        })
    }
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.filter(|s| !s.trim().is_empty())
}

fn parse_id(raw: Option<&str>) -> Option<Uuid> {
    raw.and_then(|s| Uuid::parse_str(s.trim()).ok())
}

/// Accepts `YYYY-MM-DD` and full timestamps starting with one.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw.get(..10).unwrap_or(raw), "%Y-%m-%d").ok()
}

fn parse_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn assignment(value: serde_json::Value) -> Option<Assignment> {
        serde_json::from_value::<AssignmentDto>(value)
            .unwrap()
            .into_assignment(&NameLookup::default())
    }

    #[test]
    fn test_portuguese_record() {
        let a = assignment(json!({
            "id": "018f2b6e-7c1a-7d4e-9a7b-1c2d3e4f5a6b",
            "data_pregacao": "2025-03-01",
            "horario_pregacao": "09:30:00",
            "nome_culto": "Culto Divino",
            "igreja": { "id": "018f2b6e-7c1a-7d4e-9a7b-1c2d3e4f5a6c", "nome": "Central" },
            "pregador": { "nome_completo": "João da Silva", "nome": "João" },
            "tematica": { "titulo": "Esperança" },
            "status": "aceito"
        }))
        .unwrap();

        assert_eq!(a.date, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(a.time, NaiveTime::from_hms_opt(9, 30, 0));
        assert_eq!(a.service_name.as_deref(), Some("Culto Divino"));
        assert_eq!(a.church.name(), Some("Central"));
        assert_eq!(a.preacher.name(), Some("João da Silva"));
        assert_eq!(a.theme.unwrap().title, "Esperança");
        assert_eq!(a.status, AssignmentStatus::Accepted);
        assert!(a.id.is_some());
    }

    #[test]
    fn test_english_record_with_null_preacher() {
        let a = assignment(json!({
            "date": "2025-03-08T00:00:00Z",
            "church": { "name": "Norte" },
            "preacher": null,
            "theme": null,
            "status": "scheduled"
        }))
        .unwrap();

        assert_eq!(a.date, NaiveDate::from_ymd_opt(2025, 3, 8).unwrap());
        assert_eq!(a.preacher, PreacherSlot::Unassigned);
        assert!(a.theme.is_none());
        assert!(a.time.is_none());
    }

    #[test]
    fn test_dangling_preacher_id_is_unresolved() {
        let a = assignment(json!({
            "date": "2025-03-08",
            "church": { "name": "Norte" },
            "pregador_id": "018f2b6e-7c1a-7d4e-9a7b-1c2d3e4f5a6d",
            "status": "agendado"
        }))
        .unwrap();

        assert!(a.preacher.is_unresolved());
    }

    #[test]
    fn test_missing_church_name_is_unresolved() {
        let a = assignment(json!({
            "date": "2025-03-08",
            "igreja_id": "018f2b6e-7c1a-7d4e-9a7b-1c2d3e4f5a6c",
            "status": "faltou"
        }))
        .unwrap();

        assert!(a.church.name().is_none());
        assert!(!a.status.is_recognized());
    }

    #[test]
    fn test_id_only_record_uses_looked_up_names() {
        let church = Uuid::parse_str("018f2b6e-7c1a-7d4e-9a7b-1c2d3e4f5a6c").unwrap();
        let preacher = Uuid::parse_str("018f2b6e-7c1a-7d4e-9a7b-1c2d3e4f5a6d").unwrap();
        let dto: AssignmentDto = serde_json::from_value(json!({
            "data_pregacao": "2025-03-01",
            "igreja_id": church.to_string(),
            "pregador_id": preacher.to_string(),
            "tematica_id": null,
            "status": "aceito"
        }))
        .unwrap();

        assert_eq!(dto.unnamed_church(), Some(church));
        assert_eq!(dto.unnamed_preacher(), Some(preacher));
        assert_eq!(dto.unnamed_theme(), None);

        let mut names = NameLookup::default();
        names.churches.insert(church, "Central".to_string());
        names.preachers.insert(preacher, "João da Silva".to_string());
        let a = dto.into_assignment(&names).unwrap();

        assert_eq!(a.church.name(), Some("Central"));
        assert_eq!(a.preacher.name(), Some("João da Silva"));
        assert!(a.theme.is_none());
    }

    #[test]
    fn test_inline_names_need_no_lookup() {
        let dto: AssignmentDto = serde_json::from_value(json!({
            "date": "2025-03-01",
            "church": { "id": "018f2b6e-7c1a-7d4e-9a7b-1c2d3e4f5a6c", "name": "Central" },
            "preacher": { "id": "018f2b6e-7c1a-7d4e-9a7b-1c2d3e4f5a6d", "nome": "João" }
        }))
        .unwrap();

        assert!(dto.unnamed_church().is_none());
        assert!(dto.unnamed_preacher().is_none());
    }

    #[rstest]
    #[case(json!({ "church": { "name": "Norte" } }))]
    #[case(json!({ "date": "03/08/2025", "church": { "name": "Norte" } }))]
    #[case(json!({ "date": "", "church": { "name": "Norte" } }))]
    fn test_unusable_date_is_skipped(#[case] value: serde_json::Value) {
        assert!(assignment(value).is_none());
    }

    #[test]
    fn test_schedule_aliases() {
        let dto: ScheduleDto = serde_json::from_value(json!({
            "id": "018f2b6e-7c1a-7d4e-9a7b-1c2d3e4f5a6b",
            "distrito_id": "018f2b6e-7c1a-7d4e-9a7b-1c2d3e4f5a6e",
            "mes_referencia": 3,
            "ano_referencia": 2025,
            "status": "aprovado"
        }))
        .unwrap();
        let schedule = dto.into_schedule();

        assert_eq!(schedule.month, 3);
        assert_eq!(schedule.year, 2025);
        assert_eq!(schedule.status, ScheduleStatus::Approved);
        assert!(schedule.district_id.is_some());
    }

    #[test]
    fn test_listing_shapes() {
        let plain: Listing<ThemeDto> = serde_json::from_value(json!([{ "title": "a" }])).unwrap();
        assert_eq!(plain.into_items().len(), 1);

        let wrapped: Listing<ThemeDto> =
            serde_json::from_value(json!({ "items": [{ "title": "a" }, { "title": "b" }] }))
                .unwrap();
        assert_eq!(wrapped.into_items().len(), 2);
    }
}
