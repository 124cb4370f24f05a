use serde::Serialize;
use serde_json::json;
use std::fmt::Display;
use std::sync::Arc;

use crate::domain::entities::ApiResponse;
use crate::domain::errors::ApiError;
use crate::interface_adapters::clients::ApiClient;

pub struct StaffService {
    api: Arc<ApiClient>,
}

impl StaffService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn get_all<Q>(&self, params: &Q) -> Result<ApiResponse, ApiError>
    where
        Q: Serialize + ?Sized,
    {
        self.api.get_with("/staff", params).await
    }

    pub async fn get_by_id(&self, id: impl Display) -> Result<ApiResponse, ApiError> {
        self.api.get(&format!("/staff/{id}")).await
    }

    pub async fn create<B>(&self, data: &B) -> Result<ApiResponse, ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.api.post("/staff", data).await
    }

    pub async fn update<B>(&self, id: impl Display, data: &B) -> Result<ApiResponse, ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.api.put(&format!("/staff/{id}"), data).await
    }

    pub async fn delete(&self, id: impl Display) -> Result<ApiResponse, ApiError> {
        self.api.delete(&format!("/staff/{id}")).await
    }

    pub async fn reset_password(&self, id: impl Display) -> Result<ApiResponse, ApiError> {
        self.api.post_empty(&format!("/staff/{id}/reset-password")).await
    }

    pub async fn toggle_status(
        &self,
        id: impl Display,
        is_active: bool,
    ) -> Result<ApiResponse, ApiError> {
        self.api
            .patch(
                &format!("/staff/{id}/status"),
                &json!({ "is_active": is_active }),
            )
            .await
    }

    pub async fn get_activity_logs<Q>(
        &self,
        id: impl Display,
        params: &Q,
    ) -> Result<ApiResponse, ApiError>
    where
        Q: Serialize + ?Sized,
    {
        self.api
            .get_with(&format!("/staff/{id}/activities"), params)
            .await
    }

    pub async fn change_role(&self, id: impl Display, role: &str) -> Result<ApiResponse, ApiError> {
        self.api
            .patch(&format!("/staff/{id}/role"), &json!({ "role": role }))
            .await
    }
}
