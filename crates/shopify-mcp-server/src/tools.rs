//! The Shopify tool catalog

pub mod analytics;
pub mod collections;
pub mod customers;
pub mod inventory;
pub mod orders;
pub mod products;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::ServerError;
use crate::graphql::ShopifyClient;
use crate::operations::{Operation, Toolbox};

/// Build every tool, each sharing the given client
pub fn catalog(client: &ShopifyClient) -> Result<Toolbox, ServerError> {
    Ok(Toolbox::new(vec![
        Operation::new::<products::GetProducts>(client.clone())?,
        Operation::new::<products::GetProductById>(client.clone())?,
        Operation::new::<products::CreateProduct>(client.clone())?,
        Operation::new::<customers::GetCustomers>(client.clone())?,
        Operation::new::<customers::UpdateCustomer>(client.clone())?,
        Operation::new::<customers::GetCustomerOrders>(client.clone())?,
        Operation::new::<orders::GetOrders>(client.clone())?,
        Operation::new::<orders::GetOrderById>(client.clone())?,
        Operation::new::<orders::SearchOrders>(client.clone())?,
        Operation::new::<orders::UpdateOrder>(client.clone())?,
        Operation::new::<inventory::GetLocations>(client.clone())?,
        Operation::new::<inventory::GetInventoryLevels>(client.clone())?,
        Operation::new::<collections::GetCollections>(client.clone())?,
        Operation::new::<analytics::RunShopifyqlQuery>(client.clone())?,
        Operation::new::<analytics::GetSalesReport>(client.clone())?,
        Operation::new::<analytics::GetProductPerformance>(client.clone())?,
        Operation::new::<analytics::GetCustomerAnalytics>(client.clone())?,
    ]))
}

/// A metafield to set on the updated resource
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MetafieldInput {
    /// Existing metafield ID, when updating a metafield in place
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    key: Option<String>,

    value: String,

    /// Metafield type, e.g. `single_line_text_field`
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
}

/// A metafield as returned by the API
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Metafield {
    id: String,
    namespace: String,
    key: String,
    value: String,
    #[serde(rename = "type")]
    kind: Option<String>,
}

/// Page size for list tools when none is given
pub(crate) fn default_limit() -> u32 {
    10
}

/// Join search terms into one search query, or `None` when there are none
pub(crate) fn search_query(terms: impl IntoIterator<Item = String>) -> Option<String> {
    let terms: Vec<String> = terms.into_iter().filter(|t| !t.is_empty()).collect();
    (!terms.is_empty()).then(|| terms.join(" AND "))
}

/// Strip surrounding whitespace, treating blank strings as absent
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
