//! Notification Service

use super::{ApiClient, CancelToken, Endpoint};
use crate::error::ApiResult;
use crate::models::{Listing, MarkedAsRead, Notification, UnreadCount};

pub async fn list(client: &ApiClient, cancel: &CancelToken) -> ApiResult<Vec<Notification>> {
    let listing: Listing<Notification> = client.get(&Endpoint::Notifications, cancel).await?;
    Ok(listing.into_items())
}

pub async fn mark_as_read(client: &ApiClient, id: i64, cancel: &CancelToken) -> ApiResult<serde_json::Value> {
    client.post_empty(&Endpoint::NotificationMarkRead(id), cancel).await
}

pub async fn mark_all_as_read(client: &ApiClient, cancel: &CancelToken) -> ApiResult<MarkedAsRead> {
    client.post_empty(&Endpoint::NotificationsMarkAllRead, cancel).await
}

pub async fn delete(client: &ApiClient, id: i64, cancel: &CancelToken) -> ApiResult<()> {
    client.delete(&Endpoint::Notification(id), cancel).await
}

pub async fn unread_count(client: &ApiClient, cancel: &CancelToken) -> ApiResult<u64> {
    let count: UnreadCount = client.get(&Endpoint::NotificationsUnreadCount, cancel).await?;
    Ok(count.unread_count)
}
