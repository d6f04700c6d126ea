//! Route Planner Service
//!
//! Zone route generation and driver assignments. Same base URL and
//! bearer contract as the collection endpoints; paths carry no trailing
//! slash.

use serde::Serialize;

use super::{ApiClient, CancelToken, Endpoint};
use crate::error::ApiResult;
use crate::models::{
    Assignment, AssignmentResult, CurrentRoute, DriverRoutes, GeneratedRoute, Listing, RouteDetail,
    ZoneRoutes,
};

// ========================
// Argument Structs
// ========================

#[derive(Serialize)]
struct StartArgs {
    ruta_id: i64,
}

#[derive(Serialize)]
struct FinishArgs<'a> {
    ruta_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    notas: Option<&'a str>,
}

// ========================
// Generated routes
// ========================

/// Ask the backend to compute a route for `zona`
pub async fn generate_route(client: &ApiClient, zona: &str, cancel: &CancelToken) -> ApiResult<GeneratedRoute> {
    client.post_empty(&Endpoint::RutasGenerar(zona.to_string()), cancel).await
}

pub async fn get_route(client: &ApiClient, id: i64, cancel: &CancelToken) -> ApiResult<GeneratedRoute> {
    client.get(&Endpoint::RutasObtener(id), cancel).await
}

pub async fn route_details(client: &ApiClient, id: i64, cancel: &CancelToken) -> ApiResult<RouteDetail> {
    client.get(&Endpoint::RutasDetalles(id), cancel).await
}

pub async fn routes_by_zone(client: &ApiClient, zona: &str, cancel: &CancelToken) -> ApiResult<ZoneRoutes> {
    client.get(&Endpoint::RutasPorZona(zona.to_string()), cancel).await
}

// ========================
// Driver assignments
// ========================

/// All routes assigned to the signed-in driver, optionally one state only
pub async fn my_routes(client: &ApiClient, estado: Option<&str>, cancel: &CancelToken) -> ApiResult<DriverRoutes> {
    let query: Vec<(&str, String)> = estado
        .filter(|e| !e.is_empty())
        .map(|e| vec![("estado", e.to_string())])
        .unwrap_or_default();
    client
        .get_with_query(&Endpoint::ConductoresMisRutasTodas, &query, cancel)
        .await
}

pub async fn current_route(client: &ApiClient, cancel: &CancelToken) -> ApiResult<CurrentRoute> {
    client.get(&Endpoint::ConductoresMisRutasActual, cancel).await
}

pub async fn start_route(client: &ApiClient, ruta_id: i64, cancel: &CancelToken) -> ApiResult<AssignmentResult> {
    client
        .post(&Endpoint::ConductoresIniciarRuta, &StartArgs { ruta_id }, cancel)
        .await
}

pub async fn finish_route(
    client: &ApiClient,
    ruta_id: i64,
    notas: Option<&str>,
    cancel: &CancelToken,
) -> ApiResult<AssignmentResult> {
    let notas = notas.map(str::trim).filter(|n| !n.is_empty());
    client
        .post(&Endpoint::ConductoresFinalizarRuta, &FinishArgs { ruta_id, notas }, cancel)
        .await
}

pub async fn assignments_for_route(client: &ApiClient, ruta_id: i64, cancel: &CancelToken) -> ApiResult<Vec<Assignment>> {
    let listing: Listing<Assignment> = client
        .get(&Endpoint::ConductoresAsignacionesRuta(ruta_id), cancel)
        .await?;
    Ok(listing.into_items())
}
