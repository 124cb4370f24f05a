use serde::Serialize;
use serde_json::json;
use std::fmt::Display;
use std::sync::Arc;

use crate::domain::entities::ApiResponse;
use crate::domain::errors::ApiError;
use crate::interface_adapters::clients::ApiClient;

pub struct NotificationService {
    api: Arc<ApiClient>,
}

impl NotificationService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn get_all<Q>(&self, params: &Q) -> Result<ApiResponse, ApiError>
    where
        Q: Serialize + ?Sized,
    {
        self.api.get_with("/notifications", params).await
    }

    pub async fn get_unread(&self) -> Result<ApiResponse, ApiError> {
        self.api.get("/notifications/unread").await
    }

    pub async fn mark_as_read(&self, id: impl Display) -> Result<ApiResponse, ApiError> {
        self.api
            .patch_empty(&format!("/notifications/{id}/mark-as-read"))
            .await
    }

    pub async fn mark_all_as_read(&self) -> Result<ApiResponse, ApiError> {
        self.api.patch_empty("/notifications/mark-all-as-read").await
    }

    pub async fn delete(&self, id: impl Display) -> Result<ApiResponse, ApiError> {
        self.api.delete(&format!("/notifications/{id}")).await
    }

    pub async fn delete_all(&self) -> Result<ApiResponse, ApiError> {
        self.api.delete("/notifications/delete-all").await
    }

    pub async fn get_unread_count(&self) -> Result<ApiResponse, ApiError> {
        self.api.get("/notifications/unread-count").await
    }

    // Pass `DEFAULT_LATEST_LIMIT` for the usual page.
    pub async fn get_latest(&self, limit: u32) -> Result<ApiResponse, ApiError> {
        self.api
            .get_with("/notifications/latest", &json!({ "limit": limit }))
            .await
    }
}
