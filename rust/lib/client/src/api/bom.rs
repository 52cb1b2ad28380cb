use serde::Serialize;

use super::Id;
use crate::{ApiClient, ApiError, Payload};

/// Filter for the BOM listing.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BomQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<Id>,
    /// Expand nested assemblies into their leaf materials.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expand: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_cost: Option<f64>,
}

pub struct BomApi<'a> {
    client: &'a ApiClient,
}

impl<'a> BomApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_bom(&self, query: &BomQuery) -> Result<Payload, ApiError> {
        self.client.get_with("/bom", query).await
    }

    pub async fn create_bom_item<D: Serialize + ?Sized>(&self, data: &D) -> Result<Payload, ApiError> {
        self.client.post("/bom", data).await
    }

    pub async fn update_bom_item<D: Serialize + ?Sized>(
        &self,
        id: Id,
        data: &D,
    ) -> Result<Payload, ApiError> {
        self.client.put(&format!("/bom/{}", id), data).await
    }

    pub async fn delete_bom_item(&self, id: Id) -> Result<Payload, ApiError> {
        self.client.delete(&format!("/bom/{}", id)).await
    }

    /// Drop every BOM line of a product.
    pub async fn delete_product_bom(&self, product_id: Id) -> Result<Payload, ApiError> {
        self.client.delete(&format!("/bom/product/{}", product_id)).await
    }
}
