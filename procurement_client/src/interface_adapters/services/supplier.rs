use serde::Serialize;
use serde_json::json;
use std::fmt::Display;
use std::sync::Arc;

use crate::domain::entities::ApiResponse;
use crate::domain::errors::ApiError;
use crate::interface_adapters::clients::ApiClient;

pub struct SupplierService {
    api: Arc<ApiClient>,
}

impl SupplierService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn get_all<Q>(&self, params: &Q) -> Result<ApiResponse, ApiError>
    where
        Q: Serialize + ?Sized,
    {
        self.api.get_with("/supplier", params).await
    }

    pub async fn get_by_id(&self, id: impl Display) -> Result<ApiResponse, ApiError> {
        self.api.get(&format!("/supplier/{id}")).await
    }

    pub async fn create<B>(&self, data: &B) -> Result<ApiResponse, ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.api.post("/supplier", data).await
    }

    pub async fn update<B>(&self, id: impl Display, data: &B) -> Result<ApiResponse, ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.api.put(&format!("/supplier/{id}"), data).await
    }

    pub async fn delete(&self, id: impl Display) -> Result<ApiResponse, ApiError> {
        self.api.delete(&format!("/supplier/{id}")).await
    }

    pub async fn get_transaction_history<Q>(
        &self,
        id: impl Display,
        params: &Q,
    ) -> Result<ApiResponse, ApiError>
    where
        Q: Serialize + ?Sized,
    {
        self.api
            .get_with(&format!("/supplier/{id}/transactions"), params)
            .await
    }

    pub async fn get_by_category(&self, category_id: impl Display) -> Result<ApiResponse, ApiError> {
        self.api
            .get(&format!("/supplier/by-category/{category_id}"))
            .await
    }

    pub async fn get_top_rated(&self) -> Result<ApiResponse, ApiError> {
        self.api.get("/supplier/top-rated").await
    }

    // Matches on supplier name or product.
    pub async fn search(&self, query: &str) -> Result<ApiResponse, ApiError> {
        self.api
            .get_with("/supplier/search", &json!({ "q": query }))
            .await
    }
}
