//! Report Records
//!
//! Aggregate statistics and export requests over a date range.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    #[serde(default)]
    pub total_incidencias: u64,
    #[serde(default)]
    pub incidencias_por_estado: BTreeMap<String, u64>,
    #[serde(default)]
    pub incidencias_por_tipo: BTreeMap<String, u64>,
    #[serde(default)]
    pub total_rutas: u64,
    #[serde(default)]
    pub rutas_activas: u64,
    #[serde(default)]
    pub total_tareas: u64,
    #[serde(default)]
    pub tareas_completadas: u64,
    #[serde(default)]
    pub tareas_pendientes: u64,
}

impl Statistics {
    /// Share of tasks completed, 0-100
    pub fn task_completion_percent(&self) -> u8 {
        if self.total_tareas == 0 {
            return 0;
        }
        ((self.tareas_completadas.min(self.total_tareas) * 100) / self.total_tareas) as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// The thirty days ending at `today`
    pub fn last_30_days(today: NaiveDate) -> Self {
        Self { start: today - Duration::days(30), end: today }
    }

    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("start_date", self.start.format("%Y-%m-%d").to_string()),
            ("end_date", self.end.format("%Y-%m-%d").to_string()),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Pdf,
    Excel,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Excel => "excel",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Excel => "xlsx",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Excel => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }
}

/// Downloaded report bytes plus the name offered to the browser
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedReport {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_30_days_query() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        let range = DateRange::last_30_days(today);
        assert_eq!(
            range.to_query(),
            vec![("start_date", "2025-03-01".to_string()), ("end_date", "2025-03-31".to_string())]
        );
    }

    #[test]
    fn test_completion_percent() {
        let stats = Statistics { total_tareas: 8, tareas_completadas: 6, ..Default::default() };
        assert_eq!(stats.task_completion_percent(), 75);
        assert_eq!(Statistics::default().task_completion_percent(), 0);
    }
}
