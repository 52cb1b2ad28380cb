use serde::Serialize;

use super::Id;
use crate::{ApiClient, ApiError, Payload};

/// Filter for `/products/non-composite`: parts that can go into a BOM.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NonCompositeQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// Keyword search over name and code.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductSearch {
    pub q: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

pub struct ProductApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ProductApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_products(&self) -> Result<Payload, ApiError> {
        self.client.get("/products").await
    }

    pub async fn get_non_composite_products(
        &self,
        query: &NonCompositeQuery,
    ) -> Result<Payload, ApiError> {
        self.client.get_with("/products/non-composite", query).await
    }

    pub async fn get_product(&self, id: Id) -> Result<Payload, ApiError> {
        self.client.get(&format!("/products/{}", id)).await
    }

    pub async fn create_product<D: Serialize + ?Sized>(&self, data: &D) -> Result<Payload, ApiError> {
        self.client.post("/products", data).await
    }

    pub async fn update_product<D: Serialize + ?Sized>(
        &self,
        id: Id,
        data: &D,
    ) -> Result<Payload, ApiError> {
        self.client.put(&format!("/products/{}", id), data).await
    }

    pub async fn delete_product(&self, id: Id) -> Result<Payload, ApiError> {
        self.client.delete(&format!("/products/{}", id)).await
    }

    pub async fn search_products(&self, query: &ProductSearch) -> Result<Payload, ApiError> {
        self.client.get_with("/products/search", query).await
    }

    pub async fn get_low_stock_products(&self) -> Result<Payload, ApiError> {
        self.client.get("/products/low-stock").await
    }
}
