//! Incident Entity
//!
//! Citizen-reported waste problem at a geolocation.

use serde::{Deserialize, Serialize};
use super::common::{GeoPoint, PersonRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IncidentType {
    Acumulacion,
    Contenedor,
    Derrame,
    Otro,
    #[serde(other)]
    Unknown,
}

impl IncidentType {
    pub const ALL: [IncidentType; 4] = [
        IncidentType::Acumulacion,
        IncidentType::Contenedor,
        IncidentType::Derrame,
        IncidentType::Otro,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentType::Acumulacion => "ACUMULACION",
            IncidentType::Contenedor => "CONTENEDOR",
            IncidentType::Derrame => "DERRAME",
            IncidentType::Otro => "OTRO",
            IncidentType::Unknown => "UNKNOWN",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IncidentStatus {
    Reportada,
    EnProceso,
    Resuelta,
    Cancelada,
    #[serde(other)]
    Unknown,
}

impl IncidentStatus {
    pub const ALL: [IncidentStatus; 4] = [
        IncidentStatus::Reportada,
        IncidentStatus::EnProceso,
        IncidentStatus::Resuelta,
        IncidentStatus::Cancelada,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentStatus::Reportada => "REPORTADA",
            IncidentStatus::EnProceso => "EN_PROCESO",
            IncidentStatus::Resuelta => "RESUELTA",
            IncidentStatus::Cancelada => "CANCELADA",
            IncidentStatus::Unknown => "UNKNOWN",
        }
    }
}

/// Shared by incidents and tasks; tasks never use `Critica`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Baja,
    Media,
    Alta,
    Critica,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Priority {
    pub const ALL: [Priority; 4] = [Priority::Baja, Priority::Media, Priority::Alta, Priority::Critica];
    pub const TASK_LEVELS: [Priority; 3] = [Priority::Baja, Priority::Media, Priority::Alta];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Baja => "BAJA",
            Priority::Media => "MEDIA",
            Priority::Alta => "ALTA",
            Priority::Critica => "CRITICA",
            Priority::Unknown => "UNKNOWN",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub id: i64,
    pub tipo: IncidentType,
    #[serde(default)]
    pub descripcion: String,
    pub estado: IncidentStatus,
    pub prioridad: Priority,
    #[serde(default)]
    pub ubicacion: Option<GeoPoint>,
    #[serde(default)]
    pub direccion: String,
    #[serde(default)]
    pub reportado_por: Option<PersonRef>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Create payload; the backend assigns id, status and reporter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewIncident {
    pub tipo: IncidentType,
    pub descripcion: String,
    pub prioridad: Priority,
    pub direccion: String,
    pub ubicacion: GeoPoint,
}

impl Default for NewIncident {
    /// Form defaults centred on Latacunga
    fn default() -> Self {
        Self {
            tipo: IncidentType::Acumulacion,
            descripcion: String::new(),
            prioridad: Priority::Media,
            direccion: String::new(),
            ubicacion: GeoPoint::new(-78.6156, -0.9346),
        }
    }
}

/// Query-string filters for the incident list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncidentFilter {
    pub estado: Option<IncidentStatus>,
    pub tipo: Option<IncidentType>,
    pub zona: Option<String>,
}

impl IncidentFilter {
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(estado) = self.estado {
            query.push(("estado", estado.as_str().to_string()));
        }
        if let Some(tipo) = self.tipo {
            query.push(("tipo", tipo.as_str().to_string()));
        }
        if let Some(zona) = self.zona.as_ref().filter(|z| !z.is_empty()) {
            query.push(("zona", zona.clone()));
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incident_from_backend() {
        let json = r#"{
            "id": 12, "tipo": "ACUMULACION", "descripcion": "Basura en la esquina",
            "estado": "REPORTADA", "prioridad": "MEDIA",
            "ubicacion": {"type": "Point", "coordinates": [-78.6156, -0.9346]},
            "direccion": "Av. Amazonas", "created_at": "2025-03-01T10:00:00Z"
        }"#;
        let incident: Incident = serde_json::from_str(json).unwrap();
        assert_eq!(incident.estado, IncidentStatus::Reportada);
        assert_eq!(incident.ubicacion.unwrap().lat(), -0.9346);
    }

    #[test]
    fn test_unknown_enum_values_do_not_fail() {
        let json = r#"{"id": 1, "tipo": "ESCOMBROS", "estado": "ARCHIVADA", "prioridad": "URGENTE"}"#;
        let incident: Incident = serde_json::from_str(json).unwrap();
        assert_eq!(incident.tipo, IncidentType::Unknown);
        assert_eq!(incident.estado, IncidentStatus::Unknown);
        assert_eq!(incident.prioridad, Priority::Unknown);
    }

    #[test]
    fn test_new_incident_payload() {
        let payload = serde_json::to_value(NewIncident::default()).unwrap();
        assert_eq!(payload["tipo"], "ACUMULACION");
        assert_eq!(payload["prioridad"], "MEDIA");
        assert_eq!(payload["ubicacion"]["coordinates"][0], -78.6156);
        assert!(payload.get("estado").is_none());
    }

    #[test]
    fn test_filter_query() {
        let filter = IncidentFilter {
            estado: Some(IncidentStatus::EnProceso),
            tipo: None,
            zona: Some(String::new()),
        };
        assert_eq!(filter.to_query(), vec![("estado", "EN_PROCESO".to_string())]);
    }
}
