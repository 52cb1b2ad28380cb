use serde::Serialize;

use super::Id;
use crate::{ApiClient, ApiError, Payload};

pub struct OrderApi<'a> {
    client: &'a ApiClient,
}

impl<'a> OrderApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_orders(&self) -> Result<Payload, ApiError> {
        self.client.get("/orders").await
    }

    pub async fn get_order(&self, id: Id) -> Result<Payload, ApiError> {
        self.client.get(&format!("/orders/{}", id)).await
    }

    pub async fn create_order<D: Serialize + ?Sized>(&self, data: &D) -> Result<Payload, ApiError> {
        self.client.post("/orders", data).await
    }

    pub async fn update_order<D: Serialize + ?Sized>(
        &self,
        id: Id,
        data: &D,
    ) -> Result<Payload, ApiError> {
        self.client.put(&format!("/orders/{}", id), data).await
    }

    pub async fn delete_order(&self, id: Id) -> Result<Payload, ApiError> {
        self.client.delete(&format!("/orders/{}", id)).await
    }

    /// Mark the order fulfilled; the server books the stock movement.
    pub async fn complete_order(&self, id: Id) -> Result<Payload, ApiError> {
        self.client
            .post(&format!("/orders/{}/complete", id), &serde_json::json!({}))
            .await
    }

    pub async fn cancel_order(&self, id: Id) -> Result<Payload, ApiError> {
        self.client
            .post(&format!("/orders/{}/cancel", id), &serde_json::json!({}))
            .await
    }
}
