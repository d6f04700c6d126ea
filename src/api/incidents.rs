//! Incident Service

use super::{ApiClient, CancelToken, Endpoint};
use crate::error::ApiResult;
use crate::models::{Incident, IncidentFilter, IncidentStatus, Listing, NewIncident, StatusPatch};

pub async fn list(client: &ApiClient, filter: &IncidentFilter, cancel: &CancelToken) -> ApiResult<Vec<Incident>> {
    let listing: Listing<Incident> = client
        .get_with_query(&Endpoint::Incidents, &filter.to_query(), cancel)
        .await?;
    Ok(listing.into_items())
}

pub async fn get(client: &ApiClient, id: i64, cancel: &CancelToken) -> ApiResult<Incident> {
    client.get(&Endpoint::Incident(id), cancel).await
}

pub async fn create(client: &ApiClient, incident: &NewIncident, cancel: &CancelToken) -> ApiResult<Incident> {
    client.post(&Endpoint::Incidents, incident, cancel).await
}

pub async fn update_status(
    client: &ApiClient,
    id: i64,
    estado: IncidentStatus,
    cancel: &CancelToken,
) -> ApiResult<Incident> {
    client.patch(&Endpoint::Incident(id), &StatusPatch { estado }, cancel).await
}

pub async fn delete(client: &ApiClient, id: i64, cancel: &CancelToken) -> ApiResult<()> {
    client.delete(&Endpoint::Incident(id), cancel).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{client_with, FakeTransport};
    use crate::api::Method;
    use crate::models::{GeoPoint, IncidentType, Priority};
    use serde_json::json;

    fn incident_json(id: i64, estado: &str) -> serde_json::Value {
        json!({
            "id": id, "tipo": "ACUMULACION", "descripcion": "Basura acumulada",
            "prioridad": "MEDIA", "estado": estado,
            "ubicacion": {"type": "Point", "coordinates": [-78.6156, -0.9346]},
            "direccion": "Parque Vicente León"
        })
    }

    #[tokio::test]
    async fn test_list_unwraps_envelope() {
        let fake = FakeTransport::new();
        fake.on(
            Method::Get,
            "/incidents/",
            200,
            json!({"count": 2, "next": null, "previous": null,
                   "results": [incident_json(1, "REPORTADA"), incident_json(2, "RESUELTA")]}),
        );
        let client = client_with(fake.clone());

        let rows = list(&client, &IncidentFilter::default(), &CancelToken::new()).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].estado, IncidentStatus::Resuelta);
    }

    #[tokio::test]
    async fn test_list_sends_filters() {
        let fake = FakeTransport::new();
        fake.on(Method::Get, "/incidents/?estado=EN_PROCESO", 200, json!([incident_json(4, "EN_PROCESO")]));
        let client = client_with(fake.clone());
        let filter = IncidentFilter { estado: Some(IncidentStatus::EnProceso), ..Default::default() };

        let rows = list(&client, &filter, &CancelToken::new()).await.unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_create_then_reload_shows_reported() {
        let fake = FakeTransport::new();
        fake.on(Method::Get, "/incidents/", 200, json!([]));
        fake.on(Method::Post, "/incidents/", 201, incident_json(31, "REPORTADA"));
        fake.on(Method::Get, "/incidents/", 200, json!([incident_json(31, "REPORTADA")]));
        let client = client_with(fake.clone());
        let cancel = CancelToken::new();

        let before = list(&client, &IncidentFilter::default(), &cancel).await.unwrap();
        let form = NewIncident {
            tipo: IncidentType::Acumulacion,
            prioridad: Priority::Media,
            descripcion: "Basura acumulada".into(),
            ubicacion: GeoPoint::new(-78.6156, -0.9346),
            ..Default::default()
        };
        create(&client, &form, &cancel).await.unwrap();
        let after = list(&client, &IncidentFilter::default(), &cancel).await.unwrap();

        let body = fake.last_body(Method::Post, "/incidents/").unwrap();
        assert_eq!(body["tipo"], "ACUMULACION");
        assert_eq!(body["prioridad"], "MEDIA");
        assert_eq!(body["ubicacion"]["coordinates"], json!([-78.6156, -0.9346]));
        assert!(before.is_empty());
        assert_eq!(after.len(), 1);
        assert_eq!(after[0].estado, IncidentStatus::Reportada);
    }

    #[tokio::test]
    async fn test_status_change_patches_estado() {
        let fake = FakeTransport::new();
        fake.on(Method::Patch, "/incidents/9/", 200, incident_json(9, "RESUELTA"));
        let client = client_with(fake.clone());

        let updated = update_status(&client, 9, IncidentStatus::Resuelta, &CancelToken::new())
            .await
            .unwrap();
        assert_eq!(updated.estado, IncidentStatus::Resuelta);
        assert_eq!(fake.last_body(Method::Patch, "/incidents/9/"), Some(json!({"estado": "RESUELTA"})));
    }
}
