use serde::Serialize;

use super::Id;
use crate::{ApiClient, ApiError, Payload};

pub struct ProductionApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ProductionApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_production_plans(&self) -> Result<Payload, ApiError> {
        self.client.get("/production").await
    }

    pub async fn create_production_plan<D: Serialize + ?Sized>(
        &self,
        data: &D,
    ) -> Result<Payload, ApiError> {
        self.client.post("/production", data).await
    }

    pub async fn update_production_plan<D: Serialize + ?Sized>(
        &self,
        id: Id,
        data: &D,
    ) -> Result<Payload, ApiError> {
        self.client.put(&format!("/production/{}", id), data).await
    }

    pub async fn delete_production_plan(&self, id: Id) -> Result<Payload, ApiError> {
        self.client.delete(&format!("/production/{}", id)).await
    }
}
