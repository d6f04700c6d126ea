//! Route Planner Records
//!
//! Shapes served by the route-generation backend: zone-keyed generated
//! routes with ordered waypoints, and driver assignments.

use serde::{Deserialize, Serialize};
use super::common::LatLng;

/// Summary of a generated route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedRoute {
    pub id: i64,
    #[serde(default)]
    pub zona: String,
    #[serde(default)]
    pub estado: String,
    #[serde(default)]
    pub suma_gravedad: f64,
    #[serde(default)]
    pub camiones_usados: u32,
    #[serde(default)]
    pub duracion_estimada: Option<String>,
    #[serde(default)]
    pub costo_total_metros: f64,
    #[serde(default)]
    pub fecha_generacion: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteIncident {
    pub id: i64,
    #[serde(default)]
    pub tipo: String,
    #[serde(default)]
    pub gravedad: i32,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub descripcion: String,
    #[serde(default)]
    pub estado: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub id: i64,
    pub orden: i32,
    #[serde(default)]
    pub camion_tipo: String,
    #[serde(default)]
    pub camion_id: String,
    #[serde(default)]
    pub tipo_punto: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub incidencia_id: Option<i64>,
}

/// `GET /rutas/{id}/detalles`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDetail {
    pub ruta: GeneratedRoute,
    #[serde(default)]
    pub incidencias: Vec<RouteIncident>,
    #[serde(default)]
    pub puntos: Vec<Waypoint>,
}

impl RouteDetail {
    /// Waypoints in visiting order, ready for the map polyline
    pub fn path(&self) -> Vec<LatLng> {
        let mut points: Vec<&Waypoint> = self.puntos.iter().collect();
        points.sort_by_key(|p| p.orden);
        points.iter().map(|p| LatLng::new(p.lat, p.lon)).collect()
    }

    /// Distinct trucks used by the waypoints, in first-seen order
    pub fn trucks(&self) -> Vec<String> {
        let mut trucks: Vec<String> = Vec::new();
        for p in &self.puntos {
            if !p.camion_id.is_empty() && !trucks.contains(&p.camion_id) {
                trucks.push(p.camion_id.clone());
            }
        }
        trucks
    }
}

/// `GET /rutas/zona/{zona}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ZoneRoutes {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub rutas: Vec<GeneratedRoute>,
}

/// One route assigned to the signed-in driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverRoute {
    #[serde(alias = "id")]
    pub ruta_id: i64,
    #[serde(default)]
    pub asignacion_id: Option<i64>,
    #[serde(default)]
    pub zona: Option<String>,
    #[serde(default)]
    pub estado: String,
    #[serde(default)]
    pub fecha_asignacion: Option<String>,
    #[serde(default)]
    pub fecha_inicio: Option<String>,
    #[serde(default)]
    pub fecha_finalizacion: Option<String>,
    #[serde(default)]
    pub notas: Option<String>,
}

/// `GET /conductores/mis-rutas/todas`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DriverRoutes {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub asignado: u32,
    #[serde(default)]
    pub iniciado: u32,
    #[serde(default)]
    pub completado: u32,
    #[serde(default)]
    pub rutas: Vec<DriverRoute>,
}

/// `GET /conductores/mis-rutas/actual`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CurrentRoute {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub ruta_actual: Option<DriverRoute>,
}

/// Answer to starting or finishing a route
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AssignmentResult {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub asignacion_id: Option<i64>,
    pub ruta_id: i64,
    #[serde(default)]
    pub fecha_inicio: Option<String>,
    #[serde(default)]
    pub fecha_finalizacion: Option<String>,
    #[serde(default)]
    pub estado: String,
}

/// A driver assignment as listed per route
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Assignment {
    pub id: i64,
    pub ruta_id: i64,
    #[serde(default, deserialize_with = "super::common::string_or_number")]
    pub conductor_id: String,
    #[serde(default)]
    pub estado: String,
    #[serde(default)]
    pub fecha_inicio: Option<String>,
    #[serde(default)]
    pub fecha_finalizacion: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn waypoint(id: i64, orden: i32, camion: &str, lat: f64) -> Waypoint {
        Waypoint {
            id,
            orden,
            camion_tipo: "grande".into(),
            camion_id: camion.into(),
            tipo_punto: "incidencia".into(),
            lat,
            lon: -78.6,
            incidencia_id: None,
        }
    }

    #[test]
    fn test_path_follows_order() {
        let detail = RouteDetail {
            ruta: serde_json::from_str(r#"{"id": 1, "zona": "centro"}"#).unwrap(),
            incidencias: vec![],
            puntos: vec![waypoint(1, 2, "C1", -0.92), waypoint(2, 0, "C1", -0.90), waypoint(3, 1, "C2", -0.91)],
        };
        let lats: Vec<f64> = detail.path().iter().map(|p| p.lat).collect();
        assert_eq!(lats, vec![-0.90, -0.91, -0.92]);
        assert_eq!(detail.trucks(), vec!["C1", "C2"]);
    }

    #[test]
    fn test_driver_routes_counters() {
        let json = r#"{"total": 3, "asignado": 1, "iniciado": 1, "completado": 1,
            "rutas": [{"id": 10, "estado": "asignado"}, {"ruta_id": 11, "estado": "iniciado"}]}"#;
        let routes: DriverRoutes = serde_json::from_str(json).unwrap();
        assert_eq!(routes.total, 3);
        assert_eq!(routes.rutas[0].ruta_id, 10);
        assert_eq!(routes.rutas[1].ruta_id, 11);
    }

    #[test]
    fn test_current_route_may_be_empty() {
        let current: CurrentRoute =
            serde_json::from_str(r#"{"message": "Sin ruta activa", "ruta_actual": null}"#).unwrap();
        assert!(current.ruta_actual.is_none());
    }
}
