//! Endpoint Registry
//!
//! Symbolic operations mapped to URL paths relative to the API base.
//! Ids are rendered verbatim; the backend rejects bad ones.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters kept literal in a free-text path segment
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

fn segment(raw: &str) -> String {
    utf8_percent_encode(raw, SEGMENT).to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    // ========================
    // Auth
    // ========================
    AuthLogin,
    AuthRegister,
    AuthLogout,
    AuthRefresh,
    AuthProfile,
    AuthOtpRequest,
    AuthOtpVerify,

    // ========================
    // Collections
    // ========================
    Incidents,
    Incident(i64),
    Routes,
    Route(i64),
    RouteOptimize(i64),
    Zones,
    Tasks,
    Task(i64),
    TaskStart(i64),
    TaskComplete(i64),
    Notifications,
    Notification(i64),
    NotificationMarkRead(i64),
    NotificationsMarkAllRead,
    NotificationsUnreadCount,
    ReportsStatistics,
    ReportsGenerate,

    // ========================
    // Route planner
    // ========================
    RutasGenerar(String),
    RutasObtener(i64),
    RutasDetalles(i64),
    RutasPorZona(String),
    ConductoresMisRutasTodas,
    ConductoresMisRutasActual,
    ConductoresIniciarRuta,
    ConductoresFinalizarRuta,
    ConductoresAsignacionesRuta(i64),
}

impl Endpoint {
    /// Path beginning with '/'
    pub fn path(&self) -> String {
        match self {
            Endpoint::AuthLogin => "/auth/login/".to_string(),
            Endpoint::AuthRegister => "/auth/register/".to_string(),
            Endpoint::AuthLogout => "/auth/logout/".to_string(),
            Endpoint::AuthRefresh => "/auth/refresh/".to_string(),
            Endpoint::AuthProfile => "/auth/profile/".to_string(),
            Endpoint::AuthOtpRequest => "/auth/otp/request/".to_string(),
            Endpoint::AuthOtpVerify => "/auth/otp/verify/".to_string(),

            Endpoint::Incidents => "/incidents/".to_string(),
            Endpoint::Incident(id) => format!("/incidents/{}/", id),
            Endpoint::Routes => "/routes/".to_string(),
            Endpoint::Route(id) => format!("/routes/{}/", id),
            Endpoint::RouteOptimize(id) => format!("/routes/{}/optimize/", id),
            Endpoint::Zones => "/zones/".to_string(),
            Endpoint::Tasks => "/tasks/".to_string(),
            Endpoint::Task(id) => format!("/tasks/{}/", id),
            Endpoint::TaskStart(id) => format!("/tasks/{}/start/", id),
            Endpoint::TaskComplete(id) => format!("/tasks/{}/complete/", id),
            Endpoint::Notifications => "/notifications/".to_string(),
            Endpoint::Notification(id) => format!("/notifications/{}/", id),
            Endpoint::NotificationMarkRead(id) => format!("/notifications/{}/mark_as_read/", id),
            Endpoint::NotificationsMarkAllRead => "/notifications/mark_all_as_read/".to_string(),
            Endpoint::NotificationsUnreadCount => "/notifications/unread_count/".to_string(),
            Endpoint::ReportsStatistics => "/reports/statistics/".to_string(),
            Endpoint::ReportsGenerate => "/reports/generate/".to_string(),

            Endpoint::RutasGenerar(zona) => format!("/rutas/generar/{}", segment(zona)),
            Endpoint::RutasObtener(id) => format!("/rutas/{}", id),
            Endpoint::RutasDetalles(id) => format!("/rutas/{}/detalles", id),
            Endpoint::RutasPorZona(zona) => format!("/rutas/zona/{}", segment(zona)),
            Endpoint::ConductoresMisRutasTodas => "/conductores/mis-rutas/todas".to_string(),
            Endpoint::ConductoresMisRutasActual => "/conductores/mis-rutas/actual".to_string(),
            Endpoint::ConductoresIniciarRuta => "/conductores/iniciar-ruta".to_string(),
            Endpoint::ConductoresFinalizarRuta => "/conductores/finalizar-ruta".to_string(),
            Endpoint::ConductoresAsignacionesRuta(id) => format!("/conductores/asignaciones/ruta/{}", id),
        }
    }

    /// Auth endpoints never trigger the refresh-and-retry path
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            Endpoint::AuthLogin
                | Endpoint::AuthRegister
                | Endpoint::AuthRefresh
                | Endpoint::AuthOtpRequest
                | Endpoint::AuthOtpVerify
        )
    }
}

/// Append an encoded query string; empty queries leave the path untouched
pub fn with_query(path: &str, query: &[(&str, String)]) -> String {
    if query.is_empty() {
        return path.to_string();
    }
    let encoded: Vec<String> = query
        .iter()
        .map(|(k, v)| format!("{}={}", segment(k), segment(v)))
        .collect();
    format!("{}?{}", path, encoded.join("&"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_paths_keep_trailing_slash() {
        assert_eq!(Endpoint::AuthLogin.path(), "/auth/login/");
        assert_eq!(Endpoint::Incident(42).path(), "/incidents/42/");
        assert_eq!(Endpoint::NotificationMarkRead(3).path(), "/notifications/3/mark_as_read/");
        assert_eq!(Endpoint::TaskComplete(9).path(), "/tasks/9/complete/");
    }

    #[test]
    fn test_ids_are_not_validated() {
        assert_eq!(Endpoint::RutasDetalles(-1).path(), "/rutas/-1/detalles");
        assert_eq!(Endpoint::Route(0).path(), "/routes/0/");
    }

    #[test]
    fn test_zone_segment_is_encoded() {
        assert_eq!(Endpoint::RutasGenerar("centro".into()).path(), "/rutas/generar/centro");
        assert_eq!(
            Endpoint::RutasPorZona("La Matriz/Norte".into()).path(),
            "/rutas/zona/La%20Matriz%2FNorte"
        );
    }

    #[test]
    fn test_with_query() {
        let q = vec![("estado", "EN_PROCESO".to_string()), ("zona", "san felipe".to_string())];
        assert_eq!(with_query("/incidents/", &q), "/incidents/?estado=EN_PROCESO&zona=san%20felipe");
        assert_eq!(with_query("/incidents/", &[]), "/incidents/");
    }

    #[test]
    fn test_auth_classification() {
        assert!(Endpoint::AuthRefresh.is_auth());
        assert!(!Endpoint::AuthProfile.is_auth());
        assert!(!Endpoint::Incidents.is_auth());
    }
}
