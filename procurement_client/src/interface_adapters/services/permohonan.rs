use serde::Serialize;
use std::fmt::Display;
use std::sync::Arc;
use tracing::instrument;

use crate::domain::entities::ApiResponse;
use crate::domain::errors::ApiError;
use crate::interface_adapters::clients::ApiClient;
use crate::use_cases::csrf::CsrfTokenAcquirer;

/// Procurement requests (`/pengadaan`).
///
/// Mutating calls make sure the CSRF cookie exists first. A failed priming
/// attempt does not stop the request; the server decides.
pub struct PermohonanService {
    api: Arc<ApiClient>,
    csrf: Arc<CsrfTokenAcquirer>,
}

impl PermohonanService {
    pub fn new(api: Arc<ApiClient>, csrf: Arc<CsrfTokenAcquirer>) -> Self {
        Self { api, csrf }
    }

    pub async fn get_all<Q>(&self, params: &Q) -> Result<ApiResponse, ApiError>
    where
        Q: Serialize + ?Sized,
    {
        self.api.get_with("/pengadaan", params).await
    }

    pub async fn get_by_id(&self, id: impl Display) -> Result<ApiResponse, ApiError> {
        self.api.get(&format!("/pengadaan/{id}")).await
    }

    #[instrument(skip_all)]
    pub async fn create<B>(&self, data: &B) -> Result<ApiResponse, ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.csrf.ensure_token().await;
        self.api.post("/pengadaan", data).await
    }

    #[instrument(skip_all, fields(id = %id))]
    pub async fn update<B>(&self, id: impl Display, data: &B) -> Result<ApiResponse, ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.csrf.ensure_token().await;
        self.api.put(&format!("/pengadaan/{id}"), data).await
    }

    #[instrument(skip_all, fields(id = %id))]
    pub async fn delete(&self, id: impl Display) -> Result<ApiResponse, ApiError> {
        self.csrf.ensure_token().await;
        self.api.delete(&format!("/pengadaan/{id}")).await
    }

    // Receipt PDF.
    pub async fn download_kwitansi(&self, id: impl Display) -> Result<ApiResponse, ApiError> {
        self.api.get(&format!("/pengadaan/{id}/kwitansi")).await
    }

    pub async fn get_rekap_data<Q>(&self, params: &Q) -> Result<ApiResponse, ApiError>
    where
        Q: Serialize + ?Sized,
    {
        self.api.get_with("/pengadaan/rekap", params).await
    }

    pub async fn get_riwayat_edit<Q>(&self, params: &Q) -> Result<ApiResponse, ApiError>
    where
        Q: Serialize + ?Sized,
    {
        self.api.get_with("/pengadaan/riwayat-edit", params).await
    }

    pub async fn get_statistics(&self) -> Result<ApiResponse, ApiError> {
        self.api.get("/pengadaan/statistics").await
    }

    pub async fn verify<B>(&self, id: impl Display, data: &B) -> Result<ApiResponse, ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.api.post(&format!("/pengadaan/{id}/verify"), data).await
    }

    pub async fn reject<B>(&self, id: impl Display, data: &B) -> Result<ApiResponse, ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.api.post(&format!("/pengadaan/{id}/reject"), data).await
    }
}
