//! Task Service

use super::{ApiClient, CancelToken, Endpoint};
use crate::error::ApiResult;
use crate::models::{Listing, NewTask, StatusPatch, Task, TaskStatus};

pub async fn list(client: &ApiClient, cancel: &CancelToken) -> ApiResult<Vec<Task>> {
    let listing: Listing<Task> = client.get(&Endpoint::Tasks, cancel).await?;
    Ok(listing.into_items())
}

pub async fn create(client: &ApiClient, task: &NewTask, cancel: &CancelToken) -> ApiResult<Task> {
    client.post(&Endpoint::Tasks, task, cancel).await
}

pub async fn update_status(client: &ApiClient, id: i64, estado: TaskStatus, cancel: &CancelToken) -> ApiResult<Task> {
    client.patch(&Endpoint::Task(id), &StatusPatch { estado }, cancel).await
}

pub async fn start(client: &ApiClient, id: i64, cancel: &CancelToken) -> ApiResult<serde_json::Value> {
    client.post_empty(&Endpoint::TaskStart(id), cancel).await
}

pub async fn complete(client: &ApiClient, id: i64, cancel: &CancelToken) -> ApiResult<serde_json::Value> {
    client.post_empty(&Endpoint::TaskComplete(id), cancel).await
}

pub async fn delete(client: &ApiClient, id: i64, cancel: &CancelToken) -> ApiResult<()> {
    client.delete(&Endpoint::Task(id), cancel).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{client_with, FakeTransport};
    use crate::api::Method;
    use serde_json::json;

    #[tokio::test]
    async fn test_list_bare_array() {
        let fake = FakeTransport::new();
        fake.on(
            Method::Get,
            "/tasks/",
            200,
            json!([{"id": 1, "titulo": "Recolección Centro", "estado": "PENDIENTE", "prioridad": "ALTA", "tipo": "RECOLECCION", "progreso": 0}]),
        );
        let client = client_with(fake.clone());

        let rows = list(&client, &CancelToken::new()).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].estado, TaskStatus::Pendiente);
    }

    #[tokio::test]
    async fn test_create_omits_missing_deadline() {
        let fake = FakeTransport::new();
        fake.on(
            Method::Post,
            "/tasks/",
            201,
            json!({"id": 8, "titulo": "Limpieza mercado", "estado": "PENDIENTE", "prioridad": "MEDIA", "tipo": "RECOLECCION"}),
        );
        let client = client_with(fake.clone());
        let form = NewTask { titulo: "Limpieza mercado".into(), ..Default::default() };

        create(&client, &form, &CancelToken::new()).await.unwrap();
        let body = fake.last_body(Method::Post, "/tasks/").unwrap();
        assert!(body.get("fecha_limite").is_none());
        assert_eq!(body["tipo"], "RECOLECCION");
    }

    #[tokio::test]
    async fn test_actions_hit_their_paths() {
        let fake = FakeTransport::new();
        fake.on(Method::Post, "/tasks/3/start/", 200, json!({}));
        fake.on(Method::Post, "/tasks/3/complete/", 200, json!({}));
        fake.on_raw(Method::Delete, "/tasks/3/", 204, Vec::new());
        let client = client_with(fake.clone());
        let cancel = CancelToken::new();

        start(&client, 3, &cancel).await.unwrap();
        complete(&client, 3, &cancel).await.unwrap();
        delete(&client, 3, &cancel).await.unwrap();
        assert_eq!(fake.requests().len(), 3);
    }
}
