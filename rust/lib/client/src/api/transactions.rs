use serde::Serialize;

use super::Id;
use crate::{ApiClient, ApiError, Payload};

/// Filter for the stock movement ledger.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TransactionQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<Id>,
    /// `in` or `out`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

pub struct TransactionApi<'a> {
    client: &'a ApiClient,
}

impl<'a> TransactionApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_transactions(&self, query: &TransactionQuery) -> Result<Payload, ApiError> {
        self.client.get_with("/transactions", query).await
    }

    pub async fn create_transaction<D: Serialize + ?Sized>(
        &self,
        data: &D,
    ) -> Result<Payload, ApiError> {
        self.client.post("/transactions", data).await
    }

    pub async fn get_recent_transactions(&self) -> Result<Payload, ApiError> {
        self.client.get("/transactions/recent").await
    }
}
