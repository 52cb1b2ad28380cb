use crate::{ApiCall, ApiClient, ApiError, Payload};

pub struct ReportApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ReportApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Spreadsheet export of every BOM. Resolves to [`Payload::Binary`].
    pub async fn export_bom_excel(&self) -> Result<Payload, ApiError> {
        self.client
            .execute(ApiCall::get("/reports/bom/export").binary())
            .await
    }

    pub async fn get_material_requirements(&self) -> Result<Payload, ApiError> {
        self.client.get("/reports/material-requirements").await
    }

    pub async fn get_cost_analysis(&self) -> Result<Payload, ApiError> {
        self.client.get("/reports/cost-analysis").await
    }

    pub async fn get_purchase_list(&self) -> Result<Payload, ApiError> {
        self.client.get("/reports/purchase-list").await
    }
}
