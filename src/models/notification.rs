//! Notification Entity

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    /// Rows that omit the kind still list, shown as a plain notice
    #[serde(default, alias = "notification_type")]
    pub tipo: NotificationKind,
    #[serde(default, alias = "title")]
    pub titulo: String,
    #[serde(default, alias = "message")]
    pub mensaje: String,
    #[serde(default, alias = "is_read")]
    pub leida: bool,
    /// Backend sends either a label or a numeric level
    #[serde(default, deserialize_with = "super::common::string_or_number")]
    pub prioridad: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct UnreadCount {
    pub unread_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct MarkedAsRead {
    #[serde(default)]
    pub marked_as_read: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_priority() {
        let json = r#"{"id": 1, "tipo": "WARNING", "titulo": "Ruta", "mensaje": "Retraso", "leida": false, "prioridad": 3}"#;
        let n: Notification = serde_json::from_str(json).unwrap();
        assert_eq!(n.prioridad, "3");
        assert_eq!(n.tipo, NotificationKind::Warning);
    }

    #[test]
    fn test_list_tolerates_missing_kind_and_english_fields() {
        let json = r#"[
            {"id": 1, "titulo": "Ruta", "mensaje": "x", "leida": false},
            {"id": 2, "notification_type": "SUCCESS", "title": "Tarea", "message": "Lista", "is_read": true}
        ]"#;
        let rows: Vec<Notification> = serde_json::from_str(json).unwrap();
        assert_eq!(rows[0].tipo, NotificationKind::Unknown);
        assert_eq!(rows[1].tipo, NotificationKind::Success);
        assert_eq!(rows[1].titulo, "Tarea");
        assert_eq!(rows[1].mensaje, "Lista");
        assert!(rows[1].leida);
    }
}
