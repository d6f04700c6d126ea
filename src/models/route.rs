//! Collection Route and Zone
//!
//! Planned vehicle paths as managed through the REST collection.

use serde::{Deserialize, Serialize};
use super::common::{GeoLine, PersonRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RouteStatus {
    Planificada,
    EnProgreso,
    Completada,
    Cancelada,
    #[serde(other)]
    Unknown,
}

impl RouteStatus {
    pub const ALL: [RouteStatus; 4] = [
        RouteStatus::Planificada,
        RouteStatus::EnProgreso,
        RouteStatus::Completada,
        RouteStatus::Cancelada,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RouteStatus::Planificada => "PLANIFICADA",
            RouteStatus::EnProgreso => "EN_PROGRESO",
            RouteStatus::Completada => "COMPLETADA",
            RouteStatus::Cancelada => "CANCELADA",
            RouteStatus::Unknown => "UNKNOWN",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RouteType {
    Residencial,
    Comercial,
    Industrial,
    Mixta,
    #[serde(other)]
    Unknown,
}

impl RouteType {
    pub const ALL: [RouteType; 4] = [
        RouteType::Residencial,
        RouteType::Comercial,
        RouteType::Industrial,
        RouteType::Mixta,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RouteType::Residencial => "RESIDENCIAL",
            RouteType::Comercial => "COMERCIAL",
            RouteType::Industrial => "INDUSTRIAL",
            RouteType::Mixta => "MIXTA",
            RouteType::Unknown => "UNKNOWN",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    #[serde(default)]
    pub placa: String,
    #[serde(default)]
    pub tipo: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub id: i64,
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub descripcion: String,
    pub estado: RouteStatus,
    pub tipo_ruta: RouteType,
    #[serde(default)]
    pub vehiculo: Option<Vehicle>,
    #[serde(default)]
    pub conductor: Option<PersonRef>,
    #[serde(default)]
    pub puntos_ruta: Option<GeoLine>,
    #[serde(default)]
    pub distancia_km: Option<f64>,
    /// Minutes
    #[serde(default)]
    pub duracion_estimada: Option<f64>,
    #[serde(default)]
    pub hora_inicio: Option<String>,
    #[serde(default)]
    pub hora_fin: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: i64,
    pub nombre: String,
    #[serde(default)]
    pub tipo: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewRoute {
    pub nombre: String,
    pub descripcion: String,
    pub tipo_ruta: RouteType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zona_id: Option<i64>,
}

impl Default for NewRoute {
    fn default() -> Self {
        Self {
            nombre: String::new(),
            descripcion: String::new(),
            tipo_ruta: RouteType::Residencial,
            zona_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_with_geometry() {
        let json = r#"{
            "id": 3, "nombre": "Centro Norte", "estado": "EN_PROGRESO", "tipo_ruta": "COMERCIAL",
            "vehiculo": {"placa": "XBA-1234", "tipo": "Recolector"},
            "conductor": {"display_name": "Luis"},
            "puntos_ruta": {"type": "LineString", "coordinates": [[-78.61, -0.93], [-78.62, -0.94]]},
            "distancia_km": 12.5, "duracion_estimada": 95
        }"#;
        let route: Route = serde_json::from_str(json).unwrap();
        assert_eq!(route.estado, RouteStatus::EnProgreso);
        assert_eq!(route.puntos_ruta.unwrap().to_lat_lngs().len(), 2);
        assert_eq!(route.duracion_estimada, Some(95.0));
    }

    #[test]
    fn test_new_route_omits_missing_zone() {
        let payload = serde_json::to_value(NewRoute { nombre: "R1".into(), ..Default::default() }).unwrap();
        assert_eq!(payload["tipo_ruta"], "RESIDENCIAL");
        assert!(payload.get("zona_id").is_none());
    }
}
