use serde::Serialize;

use crate::{ApiClient, ApiError, Payload};

pub struct InventoryApi<'a> {
    client: &'a ApiClient,
}

impl<'a> InventoryApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Ask whether current stock covers a build request.
    pub async fn check_inventory<D: Serialize + ?Sized>(&self, data: &D) -> Result<Payload, ApiError> {
        self.client.post("/inventory/check", data).await
    }
}
