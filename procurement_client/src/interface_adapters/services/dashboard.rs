use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

use crate::domain::entities::ApiResponse;
use crate::domain::errors::ApiError;
use crate::interface_adapters::clients::ApiClient;

pub struct DashboardService {
    api: Arc<ApiClient>,
}

impl DashboardService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn get_admin_dashboard_data(&self) -> Result<ApiResponse, ApiError> {
        self.api.get("/dashboard/admin").await
    }

    pub async fn get_super_admin_dashboard_data(&self) -> Result<ApiResponse, ApiError> {
        self.api.get("/dashboard/superadmin").await
    }

    pub async fn get_permohonan_statistics<Q>(&self, params: &Q) -> Result<ApiResponse, ApiError>
    where
        Q: Serialize + ?Sized,
    {
        self.api
            .get_with("/dashboard/permohonan-statistics", params)
            .await
    }

    pub async fn get_permohonan_trends<Q>(&self, params: &Q) -> Result<ApiResponse, ApiError>
    where
        Q: Serialize + ?Sized,
    {
        self.api.get_with("/dashboard/permohonan-trends", params).await
    }

    // This month against the previous one.
    pub async fn get_monthly_comparison(&self) -> Result<ApiResponse, ApiError> {
        self.api.get("/dashboard/monthly-comparison").await
    }

    pub async fn get_latest_permohonan(&self, limit: u32) -> Result<ApiResponse, ApiError> {
        self.api
            .get_with("/dashboard/latest-permohonan", &json!({ "limit": limit }))
            .await
    }

    pub async fn get_staff_activities(&self, limit: u32) -> Result<ApiResponse, ApiError> {
        self.api
            .get_with("/dashboard/staff-activities", &json!({ "limit": limit }))
            .await
    }

    pub async fn get_recap_data<Q>(&self, params: &Q) -> Result<ApiResponse, ApiError>
    where
        Q: Serialize + ?Sized,
    {
        self.api.get_with("/dashboard/recap", params).await
    }
}
