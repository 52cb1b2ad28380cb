use serde::Serialize;

use super::Id;
use crate::{ApiClient, ApiError, Payload};

pub struct CategoryApi<'a> {
    client: &'a ApiClient,
}

impl<'a> CategoryApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_categories(&self) -> Result<Payload, ApiError> {
        self.client.get("/categories").await
    }

    pub async fn get_category_tree(&self) -> Result<Payload, ApiError> {
        self.client.get("/categories/tree").await
    }

    pub async fn get_category(&self, id: Id) -> Result<Payload, ApiError> {
        self.client.get(&format!("/categories/{}", id)).await
    }

    pub async fn create_category<D: Serialize + ?Sized>(&self, data: &D) -> Result<Payload, ApiError> {
        self.client.post("/categories", data).await
    }

    pub async fn update_category<D: Serialize + ?Sized>(
        &self,
        id: Id,
        data: &D,
    ) -> Result<Payload, ApiError> {
        self.client.put(&format!("/categories/{}", id), data).await
    }

    pub async fn delete_category(&self, id: Id) -> Result<Payload, ApiError> {
        self.client.delete(&format!("/categories/{}", id)).await
    }

    /// How many products and BOM lines still reference the category.
    pub async fn get_category_usage(&self, id: Id) -> Result<Payload, ApiError> {
        self.client.get(&format!("/categories/{}/usage", id)).await
    }
}
