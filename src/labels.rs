//! Display Labels
//!
//! Spanish labels, chip colors, date rendering and chart bars shared by
//! the pages.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::models::{
    IncidentStatus, IncidentType, NotificationKind, Priority, RouteStatus, RouteType, Task, TaskStatus,
    TaskType,
};

const GREY: &str = "#757575";
const BLUE: &str = "#2196f3";
const GREEN: &str = "#4caf50";
const ORANGE: &str = "#ff9800";
const RED: &str = "#f44336";
const DARK_RED: &str = "#d32f2f";

/// Human-facing label and chip color
pub trait Labeled {
    fn label(&self) -> &'static str;

    fn color(&self) -> &'static str {
        GREY
    }
}

impl Labeled for IncidentType {
    fn label(&self) -> &'static str {
        match self {
            IncidentType::Acumulacion => "Acumulación de Residuos",
            IncidentType::Contenedor => "Contenedor Dañado",
            IncidentType::Derrame => "Derrame",
            IncidentType::Otro => "Otro",
            IncidentType::Unknown => "Desconocido",
        }
    }
}

impl Labeled for IncidentStatus {
    fn label(&self) -> &'static str {
        match self {
            IncidentStatus::Reportada => "Reportada",
            IncidentStatus::EnProceso => "En Proceso",
            IncidentStatus::Resuelta => "Resuelta",
            IncidentStatus::Cancelada => "Cancelada",
            IncidentStatus::Unknown => "Desconocido",
        }
    }

    fn color(&self) -> &'static str {
        match self {
            IncidentStatus::EnProceso => BLUE,
            IncidentStatus::Resuelta => GREEN,
            IncidentStatus::Cancelada => RED,
            _ => GREY,
        }
    }
}

impl Labeled for Priority {
    fn label(&self) -> &'static str {
        match self {
            Priority::Baja => "Baja",
            Priority::Media => "Media",
            Priority::Alta => "Alta",
            Priority::Critica => "Crítica",
            Priority::Unknown => "Desconocida",
        }
    }

    fn color(&self) -> &'static str {
        match self {
            Priority::Baja => GREEN,
            Priority::Media => ORANGE,
            Priority::Alta => RED,
            Priority::Critica => DARK_RED,
            Priority::Unknown => GREY,
        }
    }
}

impl Labeled for RouteStatus {
    fn label(&self) -> &'static str {
        match self {
            RouteStatus::Planificada => "Planificada",
            RouteStatus::EnProgreso => "En Progreso",
            RouteStatus::Completada => "Completada",
            RouteStatus::Cancelada => "Cancelada",
            RouteStatus::Unknown => "Desconocido",
        }
    }

    fn color(&self) -> &'static str {
        match self {
            RouteStatus::EnProgreso => BLUE,
            RouteStatus::Completada => GREEN,
            RouteStatus::Cancelada => RED,
            _ => GREY,
        }
    }
}

impl Labeled for RouteType {
    fn label(&self) -> &'static str {
        match self {
            RouteType::Residencial => "Residencial",
            RouteType::Comercial => "Comercial",
            RouteType::Industrial => "Industrial",
            RouteType::Mixta => "Mixta",
            RouteType::Unknown => "Desconocido",
        }
    }
}

impl Labeled for TaskStatus {
    fn label(&self) -> &'static str {
        match self {
            TaskStatus::Pendiente => "Pendiente",
            TaskStatus::EnProgreso => "En Progreso",
            TaskStatus::Completada => "Completada",
            TaskStatus::Cancelada => "Cancelada",
            TaskStatus::Unknown => "Desconocido",
        }
    }

    fn color(&self) -> &'static str {
        match self {
            TaskStatus::EnProgreso => BLUE,
            TaskStatus::Completada => GREEN,
            TaskStatus::Cancelada => RED,
            _ => GREY,
        }
    }
}

impl Labeled for TaskType {
    fn label(&self) -> &'static str {
        match self {
            TaskType::Recoleccion => "Recolección",
            TaskType::Mantenimiento => "Mantenimiento",
            TaskType::Limpieza => "Limpieza",
            TaskType::Inspeccion => "Inspección",
            TaskType::Otro => "Otro",
            TaskType::Unknown => "Desconocido",
        }
    }
}

impl Labeled for NotificationKind {
    fn label(&self) -> &'static str {
        match self {
            NotificationKind::Info => "Información",
            NotificationKind::Success => "Éxito",
            NotificationKind::Warning => "Advertencia",
            NotificationKind::Error => "Error",
            NotificationKind::Unknown => "Aviso",
        }
    }

    fn color(&self) -> &'static str {
        match self {
            NotificationKind::Info => BLUE,
            NotificationKind::Success => GREEN,
            NotificationKind::Warning => ORANGE,
            NotificationKind::Error => RED,
            NotificationKind::Unknown => GREY,
        }
    }
}

// ========================
// Dates
// ========================

const MONTHS: [&str; 12] = [
    "enero", "febrero", "marzo", "abril", "mayo", "junio", "julio", "agosto", "septiembre", "octubre",
    "noviembre", "diciembre",
];

/// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates (read as UTC midnight)
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw.get(..10)?, "%Y-%m-%d").ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}

fn plural(n: i64, word: &str) -> String {
    format!("Hace {} {}{}", n, word, if n > 1 { "s" } else { "" })
}

/// "Hace 5 minutos" style for the last week, a short date beyond that
pub fn relative_time(raw: &str, now: DateTime<Utc>) -> String {
    let Some(at) = parse_timestamp(raw) else {
        return raw.to_string();
    };
    let minutes = (now - at).num_minutes();
    let hours = minutes / 60;
    let days = hours / 24;

    if minutes < 1 {
        "Hace un momento".to_string()
    } else if minutes < 60 {
        plural(minutes, "minuto")
    } else if hours < 24 {
        plural(hours, "hora")
    } else if days < 7 {
        plural(days, "día")
    } else {
        short_date(at)
    }
}

/// e.g. "3 mar 2025"
pub fn short_date(at: DateTime<Utc>) -> String {
    let month = MONTHS[at.month0() as usize];
    format!("{} {} {}", at.day(), &month[..3], at.year())
}

/// e.g. "3 de marzo de 2025"; unparseable input is shown as-is
pub fn long_date(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(at) => format!("{} de {} de {}", at.day(), MONTHS[at.month0() as usize], at.year()),
        None => raw.to_string(),
    }
}

/// `HH:MM` from a time or timestamp string
pub fn clock_time(raw: &str) -> String {
    if let Some(at) = DateTime::parse_from_rfc3339(raw.trim()).ok() {
        return at.format("%H:%M").to_string();
    }
    raw.trim().get(..5).unwrap_or(raw).to_string()
}

/// Minutes as "1 h 25 min" or "40 min"
pub fn duration_minutes(minutes: f64) -> String {
    let total = minutes.max(0.0).round() as i64;
    match (total / 60, total % 60) {
        (0, m) => format!("{} min", m),
        (h, 0) => format!("{} h", h),
        (h, m) => format!("{} h {} min", h, m),
    }
}

/// Past its deadline and not completed
pub fn is_overdue(task: &Task, now: DateTime<Utc>) -> bool {
    if task.estado == TaskStatus::Completada {
        return false;
    }
    task.fecha_limite
        .as_deref()
        .and_then(parse_timestamp)
        .is_some_and(|deadline| deadline < now)
}

// ========================
// Charts
// ========================

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: u64,
    /// Width relative to the largest bar, 0-100
    pub percent: u8,
    /// Share of the total, 0-100
    pub share: u8,
}

/// Horizontal bar rows for a breakdown, largest first
pub fn bars(breakdown: &BTreeMap<String, u64>) -> Vec<Bar> {
    let max = breakdown.values().copied().max().unwrap_or(0);
    let total: u64 = breakdown.values().sum();
    let mut rows: Vec<Bar> = breakdown
        .iter()
        .map(|(label, &value)| Bar {
            label: label.clone(),
            value,
            percent: if max == 0 { 0 } else { ((value * 100) / max) as u8 },
            share: if total == 0 { 0 } else { ((value * 100) / total) as u8 },
        })
        .collect();
    rows.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.label.cmp(&b.label)));
    rows
}

/// Wire value of a breakdown key to its label when it names a known state
pub fn breakdown_label(key: &str) -> String {
    let quoted = format!("\"{}\"", key);
    if let Ok(status) = serde_json::from_str::<IncidentStatus>(&quoted) {
        if status != IncidentStatus::Unknown {
            return status.label().to_string();
        }
    }
    if let Ok(kind) = serde_json::from_str::<IncidentType>(&quoted) {
        if kind != IncidentType::Unknown {
            return kind.label().to_string();
        }
    }
    key.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_relative_time_buckets() {
        assert_eq!(relative_time("2025-03-15T11:59:30Z", now()), "Hace un momento");
        assert_eq!(relative_time("2025-03-15T11:59:00Z", now()), "Hace 1 minuto");
        assert_eq!(relative_time("2025-03-15T11:15:00Z", now()), "Hace 45 minutos");
        assert_eq!(relative_time("2025-03-15T09:00:00Z", now()), "Hace 3 horas");
        assert_eq!(relative_time("2025-03-14T10:00:00Z", now()), "Hace 1 día");
        assert_eq!(relative_time("2025-03-01T10:00:00-05:00", now()), "1 mar 2025");
        assert_eq!(relative_time("ayer", now()), "ayer");
    }

    #[test]
    fn test_long_date() {
        assert_eq!(long_date("2025-03-09"), "9 de marzo de 2025");
        assert_eq!(long_date("2025-12-01T08:00:00Z"), "1 de diciembre de 2025");
    }

    #[test]
    fn test_clock_and_duration() {
        assert_eq!(clock_time("07:30:00"), "07:30");
        assert_eq!(duration_minutes(85.0), "1 h 25 min");
        assert_eq!(duration_minutes(40.2), "40 min");
        assert_eq!(duration_minutes(120.0), "2 h");
    }

    #[test]
    fn test_overdue() {
        let mut task: Task = serde_json::from_str(
            r#"{"id": 1, "estado": "PENDIENTE", "prioridad": "ALTA", "tipo": "LIMPIEZA", "fecha_limite": "2025-03-10"}"#,
        )
        .unwrap();
        assert!(is_overdue(&task, now()));
        task.estado = TaskStatus::Completada;
        assert!(!is_overdue(&task, now()));
        task.estado = TaskStatus::Pendiente;
        task.fecha_limite = None;
        assert!(!is_overdue(&task, now()));
    }

    #[test]
    fn test_bars_scale_to_largest() {
        let mut breakdown = BTreeMap::new();
        breakdown.insert("REPORTADA".to_string(), 6);
        breakdown.insert("RESUELTA".to_string(), 3);
        breakdown.insert("CANCELADA".to_string(), 3);
        let rows = bars(&breakdown);
        assert_eq!(rows[0].label, "REPORTADA");
        assert_eq!(rows[0].percent, 100);
        assert_eq!(rows[0].share, 50);
        assert_eq!(rows[1].label, "CANCELADA");
        assert_eq!(rows[2].percent, 50);
        assert!(bars(&BTreeMap::new()).is_empty());
    }

    #[test]
    fn test_labels_and_colors() {
        assert_eq!(Priority::Critica.color(), "#d32f2f");
        assert_eq!(IncidentStatus::Reportada.color(), "#757575");
        assert_eq!(RouteType::Mixta.color(), "#757575");
        assert_eq!(breakdown_label("EN_PROCESO"), "En Proceso");
        assert_eq!(breakdown_label("DERRAME"), "Derrame");
        assert_eq!(breakdown_label("zona-norte"), "zona-norte");
    }
}
