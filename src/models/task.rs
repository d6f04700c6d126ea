//! Task Entity
//!
//! Operational work item. Progress and status are set independently;
//! no transition rules are enforced here.

use serde::{Deserialize, Serialize};
use super::common::PersonRef;
use super::incident::Priority;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Pendiente,
    EnProgreso,
    Completada,
    Cancelada,
    #[default]
    #[serde(other)]
    Unknown,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Pendiente,
        TaskStatus::EnProgreso,
        TaskStatus::Completada,
        TaskStatus::Cancelada,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pendiente => "PENDIENTE",
            TaskStatus::EnProgreso => "EN_PROGRESO",
            TaskStatus::Completada => "COMPLETADA",
            TaskStatus::Cancelada => "CANCELADA",
            TaskStatus::Unknown => "UNKNOWN",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskType {
    Recoleccion,
    Mantenimiento,
    Limpieza,
    Inspeccion,
    Otro,
    #[default]
    #[serde(other)]
    Unknown,
}

impl TaskType {
    pub const ALL: [TaskType; 5] = [
        TaskType::Recoleccion,
        TaskType::Mantenimiento,
        TaskType::Limpieza,
        TaskType::Inspeccion,
        TaskType::Otro,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Recoleccion => "RECOLECCION",
            TaskType::Mantenimiento => "MANTENIMIENTO",
            TaskType::Limpieza => "LIMPIEZA",
            TaskType::Inspeccion => "INSPECCION",
            TaskType::Otro => "OTRO",
            TaskType::Unknown => "UNKNOWN",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRef {
    #[serde(default)]
    pub nombre: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    #[serde(default)]
    pub titulo: String,
    #[serde(default)]
    pub descripcion: String,
    #[serde(default)]
    pub estado: TaskStatus,
    #[serde(default)]
    pub prioridad: Priority,
    #[serde(default)]
    pub tipo: TaskType,
    #[serde(default)]
    pub asignado_a: Option<PersonRef>,
    #[serde(default)]
    pub ruta: Option<RouteRef>,
    #[serde(default)]
    pub fecha_limite: Option<String>,
    /// Percent, 0-100
    #[serde(default)]
    pub progreso: i32,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Task {
    pub fn progress_percent(&self) -> u8 {
        self.progreso.clamp(0, 100) as u8
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTask {
    pub titulo: String,
    pub descripcion: String,
    pub tipo: TaskType,
    pub prioridad: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fecha_limite: Option<String>,
}

impl Default for NewTask {
    fn default() -> Self {
        Self {
            titulo: String::new(),
            descripcion: String::new(),
            tipo: TaskType::Recoleccion,
            prioridad: Priority::Media,
            fecha_limite: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_progress_is_clamped() {
        let json = r#"{"id": 4, "titulo": "Barrido", "estado": "EN_PROGRESO", "prioridad": "ALTA",
            "tipo": "LIMPIEZA", "progreso": 140, "ruta": {"nombre": "Centro"}}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.progress_percent(), 100);
        assert_eq!(task.ruta.unwrap().nombre, "Centro");
    }

    #[test]
    fn test_list_row_without_enums_still_parses() {
        let json = r#"[{"id": 7, "titulo": "Sin tipo"}, {"id": 8, "estado": "PENDIENTE", "prioridad": "BAJA", "tipo": "OTRO"}]"#;
        let tasks: Vec<Task> = serde_json::from_str(json).unwrap();
        assert_eq!(tasks[0].estado, TaskStatus::Unknown);
        assert_eq!(tasks[0].prioridad, Priority::Unknown);
        assert_eq!(tasks[0].tipo, TaskType::Unknown);
        assert_eq!(tasks[1].tipo, TaskType::Otro);
    }

    #[test]
    fn test_new_task_without_due_date() {
        let payload = serde_json::to_value(NewTask { titulo: "Inspección".into(), ..Default::default() }).unwrap();
        assert_eq!(payload["tipo"], "RECOLECCION");
        assert!(payload.get("fecha_limite").is_none());
    }
}
