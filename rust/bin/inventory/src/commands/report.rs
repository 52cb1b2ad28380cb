//! Report commands.

use std::path::Path;

use anyhow::{bail, Result};
use inventory_client::{ApiClient, Payload};
use tracing::info;

/// Download the BOM workbook and write it to `out`.
pub async fn bom_export(client: &ApiClient, out: &Path) -> Result<()> {
    let bytes = match client.reports().export_bom_excel().await? {
        Payload::Binary(bytes) => bytes,
        Payload::Raw(raw) => raw.body,
        Payload::Json(body) => bail!("Expected a workbook, server sent JSON: {}", body),
    };
    tokio::fs::write(out, &bytes).await?;
    info!(path = %out.display(), bytes = bytes.len(), "BOM export written");
    println!("Wrote {} bytes to {}", bytes.len(), out.display());
    Ok(())
}

pub async fn material_requirements(client: &ApiClient) -> Result<Payload> {
    Ok(client.reports().get_material_requirements().await?)
}

pub async fn cost_analysis(client: &ApiClient) -> Result<Payload> {
    Ok(client.reports().get_cost_analysis().await?)
}

pub async fn purchase_list(client: &ApiClient) -> Result<Payload> {
    Ok(client.reports().get_purchase_list().await?)
}
