use serde::Serialize;
use std::sync::Arc;

use crate::domain::entities::ApiResponse;
use crate::domain::errors::ApiError;
use crate::interface_adapters::clients::ApiClient;

/// Report listings and their PDF/Excel exports (`/reports`).
///
/// Downloads return the raw [`ApiResponse`]; read the file with
/// [`ApiResponse::bytes`].
pub struct ReportService {
    api: Arc<ApiClient>,
}

impl ReportService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn get_permohonan_report<Q>(&self, params: &Q) -> Result<ApiResponse, ApiError>
    where
        Q: Serialize + ?Sized,
    {
        self.api.get_with("/reports/permohonan", params).await
    }

    pub async fn get_statistics_report<Q>(&self, params: &Q) -> Result<ApiResponse, ApiError>
    where
        Q: Serialize + ?Sized,
    {
        self.api.get_with("/reports/statistics", params).await
    }

    pub async fn get_staff_activity_report<Q>(&self, params: &Q) -> Result<ApiResponse, ApiError>
    where
        Q: Serialize + ?Sized,
    {
        self.api.get_with("/reports/staff-activity", params).await
    }

    pub async fn get_monthly_report<Q>(&self, params: &Q) -> Result<ApiResponse, ApiError>
    where
        Q: Serialize + ?Sized,
    {
        self.api.get_with("/reports/monthly", params).await
    }

    pub async fn get_yearly_report<Q>(&self, params: &Q) -> Result<ApiResponse, ApiError>
    where
        Q: Serialize + ?Sized,
    {
        self.api.get_with("/reports/yearly", params).await
    }

    pub async fn download_permohonan_report<Q>(&self, params: &Q) -> Result<ApiResponse, ApiError>
    where
        Q: Serialize + ?Sized,
    {
        self.api.get_with("/reports/permohonan/download", params).await
    }

    pub async fn download_statistics_report<Q>(&self, params: &Q) -> Result<ApiResponse, ApiError>
    where
        Q: Serialize + ?Sized,
    {
        self.api.get_with("/reports/statistics/download", params).await
    }

    pub async fn download_monthly_report<Q>(&self, params: &Q) -> Result<ApiResponse, ApiError>
    where
        Q: Serialize + ?Sized,
    {
        self.api.get_with("/reports/monthly/download", params).await
    }

    pub async fn download_yearly_report<Q>(&self, params: &Q) -> Result<ApiResponse, ApiError>
    where
        Q: Serialize + ?Sized,
    {
        self.api.get_with("/reports/yearly/download", params).await
    }

    // `report_type` is a path segment such as `permohonan` or `monthly`.
    pub async fn export_to_excel<Q>(
        &self,
        report_type: &str,
        params: &Q,
    ) -> Result<ApiResponse, ApiError>
    where
        Q: Serialize + ?Sized,
    {
        self.api
            .get_with(&format!("/reports/{report_type}/excel"), params)
            .await
    }
}
