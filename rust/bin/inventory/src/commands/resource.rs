//! Resource commands.
//!
//! `inventory get products`, `inventory create order -f order.json`, etc.
//! Translates resource names to the client's operation groups.

use anyhow::{bail, Result};
use clap::Args;
use inventory_client::api::{BomQuery, Id, NonCompositeQuery, ProductSearch, TransactionQuery};
use inventory_client::{ApiClient, Payload};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Products,
    Categories,
    Bom,
    Orders,
    Production,
    Transactions,
}

/// Map a singular/plural resource name to its group.
pub fn resource(name: &str) -> Result<Resource> {
    match name.to_lowercase().as_str() {
        "product" | "products" => Ok(Resource::Products),
        "category" | "categories" => Ok(Resource::Categories),
        "bom" | "boms" => Ok(Resource::Bom),
        "order" | "orders" => Ok(Resource::Orders),
        "production" | "plan" | "plans" => Ok(Resource::Production),
        "transaction" | "transactions" => Ok(Resource::Transactions),
        _ => Err(anyhow::anyhow!("Unknown resource type: {}", name)),
    }
}

/// Filters accepted by `get`. Each applies to the resources that
/// support it and is ignored elsewhere.
#[derive(Args, Debug, Default, Clone)]
pub struct Filter {
    /// Search text (products).
    #[arg(long)]
    pub q: Option<String>,
    /// Maximum results (products).
    #[arg(long)]
    pub limit: Option<u32>,
    /// Only products below their stock threshold.
    #[arg(long)]
    pub low_stock: bool,
    /// Only products that are not assemblies.
    #[arg(long)]
    pub non_composite: bool,
    /// Category tree instead of the flat list.
    #[arg(long)]
    pub tree: bool,
    /// Where a category is used (with an id).
    #[arg(long)]
    pub usage: bool,
    /// Product filter (bom, transactions).
    #[arg(long)]
    pub product_id: Option<Id>,
    /// Expand nested BOMs.
    #[arg(long)]
    pub expand: bool,
    /// Shipping cost to include in BOM costing.
    #[arg(long)]
    pub shipping_cost: Option<f64>,
    /// Transaction direction, e.g. `in` or `out`.
    #[arg(long = "type")]
    pub kind: Option<String>,
    /// Latest transactions only.
    #[arg(long)]
    pub recent: bool,
}

/// GET a resource (list or single).
pub async fn get(client: &ApiClient, name: &str, id: Option<Id>, filter: &Filter) -> Result<Payload> {
    let payload = match (resource(name)?, id) {
        (Resource::Products, Some(id)) => client.products().get_product(id).await?,
        (Resource::Products, None) => {
            let products = client.products();
            if filter.low_stock {
                products.get_low_stock_products().await?
            } else if filter.non_composite {
                products
                    .get_non_composite_products(&NonCompositeQuery {
                        q: filter.q.clone(),
                        limit: filter.limit,
                    })
                    .await?
            } else if let Some(q) = &filter.q {
                products
                    .search_products(&ProductSearch {
                        q: q.clone(),
                        limit: filter.limit,
                    })
                    .await?
            } else {
                products.get_products().await?
            }
        }
        (Resource::Categories, Some(id)) if filter.usage => {
            client.categories().get_category_usage(id).await?
        }
        (Resource::Categories, Some(id)) => client.categories().get_category(id).await?,
        (Resource::Categories, None) if filter.tree => client.categories().get_category_tree().await?,
        (Resource::Categories, None) => client.categories().get_categories().await?,
        (Resource::Bom, id) => {
            client
                .bom()
                .get_bom(&BomQuery {
                    product_id: id.or(filter.product_id),
                    expand: filter.expand.then_some(true),
                    shipping_cost: filter.shipping_cost,
                })
                .await?
        }
        (Resource::Orders, Some(id)) => client.orders().get_order(id).await?,
        (Resource::Orders, None) => client.orders().get_orders().await?,
        (Resource::Production, None) => client.production().get_production_plans().await?,
        (Resource::Transactions, None) if filter.recent => {
            client.transactions().get_recent_transactions().await?
        }
        (Resource::Transactions, None) => {
            client
                .transactions()
                .get_transactions(&TransactionQuery {
                    product_id: filter.product_id,
                    kind: filter.kind.clone(),
                })
                .await?
        }
        (Resource::Production | Resource::Transactions, Some(_)) => {
            bail!("{} cannot be fetched by id.", name)
        }
    };
    Ok(payload)
}

/// CREATE a resource.
pub async fn create(client: &ApiClient, name: &str, body: &str) -> Result<Payload> {
    let data = parse_body(body)?;
    let payload = match resource(name)? {
        Resource::Products => client.products().create_product(&data).await?,
        Resource::Categories => client.categories().create_category(&data).await?,
        Resource::Bom => client.bom().create_bom_item(&data).await?,
        Resource::Orders => client.orders().create_order(&data).await?,
        Resource::Production => client.production().create_production_plan(&data).await?,
        Resource::Transactions => client.transactions().create_transaction(&data).await?,
    };
    Ok(payload)
}

/// UPDATE a resource (PUT).
pub async fn update(client: &ApiClient, name: &str, id: Id, body: &str) -> Result<Payload> {
    let data = parse_body(body)?;
    let payload = match resource(name)? {
        Resource::Products => client.products().update_product(id, &data).await?,
        Resource::Categories => client.categories().update_category(id, &data).await?,
        Resource::Bom => client.bom().update_bom_item(id, &data).await?,
        Resource::Orders => client.orders().update_order(id, &data).await?,
        Resource::Production => client.production().update_production_plan(id, &data).await?,
        Resource::Transactions => bail!("Transactions are append-only."),
    };
    Ok(payload)
}

/// DELETE a resource. `whole_product` removes every BOM line of the
/// product `id` instead of a single line.
pub async fn delete(client: &ApiClient, name: &str, id: Id, whole_product: bool) -> Result<Payload> {
    let payload = match resource(name)? {
        Resource::Products => client.products().delete_product(id).await?,
        Resource::Categories => client.categories().delete_category(id).await?,
        Resource::Bom if whole_product => client.bom().delete_product_bom(id).await?,
        Resource::Bom => client.bom().delete_bom_item(id).await?,
        Resource::Orders => client.orders().delete_order(id).await?,
        Resource::Production => client.production().delete_production_plan(id).await?,
        Resource::Transactions => bail!("Transactions are append-only."),
    };
    Ok(payload)
}

/// Complete or cancel an order.
pub async fn order_action(client: &ApiClient, id: Id, complete: bool) -> Result<Payload> {
    let orders = client.orders();
    let payload = if complete {
        orders.complete_order(id).await?
    } else {
        orders.cancel_order(id).await?
    };
    Ok(payload)
}

/// Check stock availability for a request body.
pub async fn check(client: &ApiClient, body: &str) -> Result<Payload> {
    let data = parse_body(body)?;
    Ok(client.inventory().check_inventory(&data).await?)
}

pub fn parse_body(body: &str) -> Result<Value> {
    serde_json::from_str(body).map_err(|e| anyhow::anyhow!("Invalid JSON: {}", e))
}

/// Print a resolved payload to stdout.
pub fn print(payload: &Payload) -> Result<()> {
    match payload {
        Payload::Json(body) => println!("{}", serde_json::to_string_pretty(body)?),
        Payload::Raw(raw) => match raw.data() {
            Some(data) => println!("{}", serde_json::to_string_pretty(&data)?),
            None => println!("HTTP {} (empty body)", raw.status),
        },
        Payload::Binary(bytes) => println!("<{} bytes>", bytes.len()),
    }
    Ok(())
}
