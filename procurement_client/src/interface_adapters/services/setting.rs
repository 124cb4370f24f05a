use serde::Serialize;
use std::fmt::Display;
use std::sync::Arc;

use crate::domain::entities::ApiResponse;
use crate::domain::errors::ApiError;
use crate::interface_adapters::clients::ApiClient;

// System, user and notification settings plus database backups.
pub struct SettingService {
    api: Arc<ApiClient>,
}

impl SettingService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn get_system_settings(&self) -> Result<ApiResponse, ApiError> {
        self.api.get("/settings/system").await
    }

    pub async fn update_system_settings<B>(&self, data: &B) -> Result<ApiResponse, ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.api.put("/settings/system", data).await
    }

    pub async fn get_user_settings(&self) -> Result<ApiResponse, ApiError> {
        self.api.get("/settings/user").await
    }

    pub async fn update_user_settings<B>(&self, data: &B) -> Result<ApiResponse, ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.api.put("/settings/user", data).await
    }

    pub async fn get_notification_settings(&self) -> Result<ApiResponse, ApiError> {
        self.api.get("/settings/notifications").await
    }

    pub async fn update_notification_settings<B>(&self, data: &B) -> Result<ApiResponse, ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.api.put("/settings/notifications", data).await
    }

    pub async fn get_backup_list(&self) -> Result<ApiResponse, ApiError> {
        self.api.get("/settings/backups").await
    }

    pub async fn create_backup(&self) -> Result<ApiResponse, ApiError> {
        self.api.post_empty("/settings/backups").await
    }

    pub async fn download_backup(&self, id: impl Display) -> Result<ApiResponse, ApiError> {
        self.api.get(&format!("/settings/backups/{id}/download")).await
    }

    pub async fn restore_backup(&self, id: impl Display) -> Result<ApiResponse, ApiError> {
        self.api
            .post_empty(&format!("/settings/backups/{id}/restore"))
            .await
    }
}
