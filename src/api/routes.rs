//! Collection Route Service

use futures::future::try_join;

use super::{ApiClient, CancelToken, Endpoint};
use crate::error::ApiResult;
use crate::models::{Listing, NewRoute, Route, RouteStatus, StatusPatch, Zone};

pub async fn list(client: &ApiClient, cancel: &CancelToken) -> ApiResult<Vec<Route>> {
    let listing: Listing<Route> = client.get(&Endpoint::Routes, cancel).await?;
    Ok(listing.into_items())
}

pub async fn zones(client: &ApiClient, cancel: &CancelToken) -> ApiResult<Vec<Zone>> {
    let listing: Listing<Zone> = client.get(&Endpoint::Zones, cancel).await?;
    Ok(listing.into_items())
}

/// Both requests in flight together; either failure fails the pair
pub async fn load_routes_and_zones(client: &ApiClient, cancel: &CancelToken) -> ApiResult<(Vec<Route>, Vec<Zone>)> {
    try_join(list(client, cancel), zones(client, cancel)).await
}

pub async fn create(client: &ApiClient, route: &NewRoute, cancel: &CancelToken) -> ApiResult<Route> {
    client.post(&Endpoint::Routes, route, cancel).await
}

pub async fn update_status(client: &ApiClient, id: i64, estado: RouteStatus, cancel: &CancelToken) -> ApiResult<Route> {
    client.patch(&Endpoint::Route(id), &StatusPatch { estado }, cancel).await
}

/// Backend re-orders the route's points; the answer shape is not relied on
pub async fn optimize(client: &ApiClient, id: i64, cancel: &CancelToken) -> ApiResult<serde_json::Value> {
    client.post_empty(&Endpoint::RouteOptimize(id), cancel).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{client_with, FakeTransport};
    use crate::api::Method;
    use crate::error::ApiError;
    use serde_json::json;

    #[tokio::test]
    async fn test_joint_load() {
        let fake = FakeTransport::new();
        fake.on(
            Method::Get,
            "/routes/",
            200,
            json!({"count": 1, "results": [{"id": 1, "nombre": "Centro", "estado": "PLANIFICADA", "tipo_ruta": "MIXTA"}]}),
        );
        fake.on(Method::Get, "/zones/", 200, json!([{"id": 1, "nombre": "La Matriz"}, {"id": 2, "nombre": "San Felipe"}]));
        let client = client_with(fake.clone());

        let (routes, zones) = load_routes_and_zones(&client, &CancelToken::new()).await.unwrap();
        assert_eq!(routes.len(), 1);
        assert_eq!(zones.len(), 2);
    }

    #[tokio::test]
    async fn test_joint_load_fails_if_either_fails() {
        let fake = FakeTransport::new();
        fake.on(Method::Get, "/routes/", 200, json!([]));
        fake.on(Method::Get, "/zones/", 500, json!({"detail": "boom"}));
        let client = client_with(fake.clone());

        let err = load_routes_and_zones(&client, &CancelToken::new()).await.unwrap_err();
        assert_eq!(err, ApiError::Http { status: 500, message: "boom".into() });
    }

    #[tokio::test]
    async fn test_optimize_posts_without_body() {
        let fake = FakeTransport::new();
        fake.on(Method::Post, "/routes/4/optimize/", 200, json!({"message": "ok"}));
        let client = client_with(fake.clone());

        optimize(&client, 4, &CancelToken::new()).await.unwrap();
        assert_eq!(fake.requests()[0].body, None);
    }
}
