//! Location and inventory tools

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{default_limit, non_blank};
use crate::errors::ToolError;
use crate::graphql::Request;
use crate::operations::Executable;
use crate::types::{Connection, nullable_connection, numeric_id};

const GET_LOCATIONS: &str = r#"
query GetLocations($first: Int!, $includeInactive: Boolean!) {
  locations(first: $first, includeInactive: $includeInactive) {
    edges {
      node {
        id
        name
        isActive
        fulfillsOnlineOrders
        address {
          address1 address2 city province provinceCode country countryCode zip phone
        }
      }
    }
  }
}
"#;

const GET_INVENTORY_LEVELS: &str = r#"
query GetInventoryLevels($first: Int!, $query: String) {
  inventoryItems(first: $first, query: $query) {
    edges {
      node {
        id
        sku
        tracked
        variant {
          id
          title
          product { id title }
        }
        inventoryLevels(first: 50) {
          edges {
            node {
              id
              location { id name }
              quantities(names: ["available", "on_hand", "committed", "reserved", "incoming"]) {
                name
                quantity
              }
            }
          }
        }
      }
    }
  }
}
"#;

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct LocationAddress {
    address1: Option<String>,
    address2: Option<String>,
    city: Option<String>,
    province: Option<String>,
    province_code: Option<String>,
    country: Option<String>,
    country_code: Option<String>,
    zip: Option<String>,
    phone: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    id: String,
    name: String,
    is_active: bool,
    fulfills_online_orders: Option<bool>,
    address: Option<LocationAddress>,
}

pub struct GetLocations;

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetLocationsInput {
    /// Also return deactivated locations
    #[serde(default)]
    include_inactive: bool,

    /// Maximum number of locations to return
    #[schemars(range(min = 1, max = 50))]
    #[serde(default = "default_limit")]
    limit: u32,
}

#[derive(Debug, Deserialize)]
pub struct LocationsData {
    locations: Connection<Location>,
}

#[derive(Debug, Serialize)]
pub struct LocationsOutput {
    locations: Vec<Location>,
    count: usize,
}

impl Executable for GetLocations {
    type Input = GetLocationsInput;
    type Data = LocationsData;
    type Output = LocationsOutput;

    const NAME: &'static str = "get-locations";
    const DESCRIPTION: &'static str = "Get the store's inventory locations";
    const ACTION: &'static str = "fetch locations";

    fn request(input: &Self::Input) -> Result<Request, ToolError> {
        Ok(Request::new(
            GET_LOCATIONS,
            json!({
                "first": input.limit,
                "includeInactive": input.include_inactive,
            }),
        ))
    }

    fn respond(_input: Self::Input, data: Self::Data) -> Result<Self::Output, ToolError> {
        let locations = data.locations.into_nodes();
        Ok(LocationsOutput {
            count: locations.len(),
            locations,
        })
    }
}

#[derive(Debug, Deserialize)]
struct Named {
    id: String,
    title: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VariantRef {
    id: String,
    title: Option<String>,
    product: Option<Named>,
}

#[derive(Debug, Deserialize)]
struct Quantity {
    name: String,
    quantity: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InventoryLevelNode {
    id: String,
    location: Named,
    #[serde(default)]
    quantities: Vec<Quantity>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InventoryItemNode {
    id: String,
    sku: Option<String>,
    #[serde(default)]
    tracked: bool,
    variant: Option<VariantRef>,
    #[serde(default, deserialize_with = "nullable_connection")]
    inventory_levels: Connection<InventoryLevelNode>,
}

/// Stock at one location, with every named quantity present
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InventoryLevel {
    id: String,
    location_id: String,
    location_name: Option<String>,
    available: i64,
    on_hand: i64,
    committed: i64,
    reserved: i64,
    incoming: i64,
}

impl From<InventoryLevelNode> for InventoryLevel {
    fn from(node: InventoryLevelNode) -> Self {
        let quantity = |name: &str| {
            node.quantities
                .iter()
                .find(|q| q.name == name)
                .map_or(0, |q| q.quantity)
        };

        Self {
            available: quantity("available"),
            on_hand: quantity("on_hand"),
            committed: quantity("committed"),
            reserved: quantity("reserved"),
            incoming: quantity("incoming"),
            id: node.id,
            location_id: node.location.id,
            location_name: node.location.name,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    id: String,
    sku: Option<String>,
    tracked: bool,
    variant_id: Option<String>,
    variant_title: Option<String>,
    product_id: Option<String>,
    product_title: Option<String>,
    levels: Vec<InventoryLevel>,
    total_available: i64,
    total_on_hand: i64,
}

impl InventoryItem {
    fn new(node: InventoryItemNode, location: Option<&str>) -> Self {
        let levels: Vec<InventoryLevel> = node
            .inventory_levels
            .map_nodes(InventoryLevel::from)
            .into_iter()
            .filter(|level| location.is_none_or(|id| same_id(&level.location_id, id)))
            .collect();

        let (variant_id, variant_title, product) = match node.variant {
            Some(variant) => (Some(variant.id), variant.title, variant.product),
            None => (None, None, None),
        };

        Self {
            id: node.id,
            sku: node.sku,
            tracked: node.tracked,
            variant_id,
            variant_title,
            product_id: product.as_ref().map(|p| p.id.clone()),
            product_title: product.and_then(|p| p.title),
            total_available: levels.iter().map(|l| l.available).sum(),
            total_on_hand: levels.iter().map(|l| l.on_hand).sum(),
            levels,
        }
    }
}

/// Compare ids by numeric tail, so bare and global ids match
fn same_id(a: &str, b: &str) -> bool {
    let tail = |id: &str| id.rsplit('/').next().unwrap_or(id).trim().to_string();
    tail(a) == tail(b)
}

pub struct GetInventoryLevels;

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetInventoryLevelsInput {
    /// Only the inventory item with this SKU; takes precedence over `productId`
    sku: Option<String>,

    /// Only inventory items of this product, numeric or `gid://shopify/Product/<id>`
    product_id: Option<String>,

    /// Only report stock at this location, numeric or `gid://shopify/Location/<id>`
    location_id: Option<String>,

    /// Maximum number of inventory items to return
    #[schemars(range(min = 1, max = 50))]
    #[serde(default = "default_limit")]
    limit: u32,
}

impl GetInventoryLevelsInput {
    fn search_query(&self) -> Result<Option<String>, ToolError> {
        if let Some(sku) = non_blank(self.sku.as_deref()) {
            return Ok(Some(format!("sku:{sku}")));
        }
        non_blank(self.product_id.as_deref())
            .map(|id| numeric_id("Product", "productId", id).map(|id| format!("product_id:{id}")))
            .transpose()
    }

    fn location(&self) -> Option<&str> {
        non_blank(self.location_id.as_deref())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItemsData {
    inventory_items: Connection<InventoryItemNode>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InventoryFilters {
    sku: Option<String>,
    product_id: Option<String>,
    location_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryLevelsOutput {
    inventory_items: Vec<InventoryItem>,
    count: usize,
    filters: InventoryFilters,
}

impl Executable for GetInventoryLevels {
    type Input = GetInventoryLevelsInput;
    type Data = InventoryItemsData;
    type Output = InventoryLevelsOutput;

    const NAME: &'static str = "get-inventory-levels";
    const DESCRIPTION: &'static str = "Get inventory quantities per location, filtered by SKU, \
        product or location";
    const ACTION: &'static str = "fetch inventory levels";

    fn request(input: &Self::Input) -> Result<Request, ToolError> {
        if let Some(location) = input.location() {
            numeric_id("Location", "locationId", location)?;
        }

        Ok(Request::new(
            GET_INVENTORY_LEVELS,
            json!({
                "first": input.limit,
                "query": input.search_query()?,
            }),
        ))
    }

    fn respond(input: Self::Input, data: Self::Data) -> Result<Self::Output, ToolError> {
        let location = input.location();
        let inventory_items: Vec<InventoryItem> = data
            .inventory_items
            .map_nodes(|node| InventoryItem::new(node, location));

        Ok(InventoryLevelsOutput {
            count: inventory_items.len(),
            inventory_items,
            filters: InventoryFilters {
                sku: input.sku,
                product_id: input.product_id,
                location_id: input.location_id,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_json_snapshot;
    use rstest::rstest;
    use serde_json::Value;

    use super::*;

    fn input<T: serde::de::DeserializeOwned>(value: Value) -> T {
        serde_json::from_value(value).unwrap()
    }

    fn level(location: u32, quantities: Value) -> Value {
        json!({"node": {
            "id": format!("gid://shopify/InventoryLevel/{location}"),
            "location": {"id": format!("gid://shopify/Location/{location}"), "name": format!("Warehouse {location}")},
            "quantities": quantities
        }})
    }

    fn inventory_data() -> InventoryItemsData {
        input(json!({"inventoryItems": {"edges": [{"node": {
            "id": "gid://shopify/InventoryItem/5",
            "sku": "SHIRT-S",
            "tracked": true,
            "variant": {
                "id": "gid://shopify/ProductVariant/2",
                "title": "Small",
                "product": {"id": "gid://shopify/Product/1", "title": "Shirt"}
            },
            "inventoryLevels": {"edges": [
                level(1, json!([
                    {"name": "available", "quantity": 4},
                    {"name": "on_hand", "quantity": 6},
                    {"name": "committed", "quantity": 2}
                ])),
                level(2, json!([
                    {"name": "available", "quantity": 3},
                    {"name": "on_hand", "quantity": 3},
                    {"name": "incoming", "quantity": 10}
                ]))
            ]}
        }}]}}))
    }

    #[test]
    fn lists_locations() {
        let request = GetLocations::request(&input(json!({"includeInactive": true}))).unwrap();
        assert_eq!(
            request.variables,
            json!({"first": 10, "includeInactive": true})
        );

        let output = GetLocations::respond(
            input(json!({})),
            input(json!({"locations": {"edges": [{"node": {
                "id": "gid://shopify/Location/1",
                "name": "Warehouse",
                "isActive": true,
                "fulfillsOnlineOrders": true,
                "address": {"city": "Berlin", "countryCode": "DE"}
            }}]}})),
        )
        .unwrap();
        let output = serde_json::to_value(output).unwrap();
        assert_eq!(output["count"], json!(1));
        assert_eq!(output["locations"][0]["address"]["countryCode"], json!("DE"));
    }

    #[test]
    fn empty_location_lists_have_zero_count() {
        let output =
            GetLocations::respond(input(json!({})), input(json!({"locations": {"edges": []}})))
                .unwrap();

        assert_eq!(
            serde_json::to_value(output).unwrap(),
            json!({"locations": [], "count": 0})
        );
    }

    #[rstest]
    #[case(json!({"sku": "SHIRT-S", "productId": "1"}), json!("sku:SHIRT-S"))]
    #[case(json!({"productId": "gid://shopify/Product/1"}), json!("product_id:1"))]
    #[case(json!({"sku": " ", "productId": "1"}), json!("product_id:1"))]
    #[case(json!({}), Value::Null)]
    fn sku_filter_wins_over_product(#[case] arguments: Value, #[case] query: Value) {
        let request = GetInventoryLevels::request(&input(arguments)).unwrap();
        assert_eq!(request.variables, json!({"first": 10, "query": query}));
    }

    #[test]
    fn rejects_malformed_location_ids() {
        let error =
            GetInventoryLevels::request(&input(json!({"locationId": "warehouse"}))).unwrap_err();
        assert!(error.is_invalid_arguments());
    }

    #[test]
    fn fills_missing_quantities_and_sums_totals() {
        let output = GetInventoryLevels::respond(input(json!({"sku": "SHIRT-S"})), inventory_data())
            .unwrap();

        assert_json_snapshot!(output, @r#"
        {
          "inventoryItems": [
            {
              "id": "gid://shopify/InventoryItem/5",
              "sku": "SHIRT-S",
              "tracked": true,
              "variantId": "gid://shopify/ProductVariant/2",
              "variantTitle": "Small",
              "productId": "gid://shopify/Product/1",
              "productTitle": "Shirt",
              "levels": [
                {
                  "id": "gid://shopify/InventoryLevel/1",
                  "locationId": "gid://shopify/Location/1",
                  "locationName": "Warehouse 1",
                  "available": 4,
                  "onHand": 6,
                  "committed": 2,
                  "reserved": 0,
                  "incoming": 0
                },
                {
                  "id": "gid://shopify/InventoryLevel/2",
                  "locationId": "gid://shopify/Location/2",
                  "locationName": "Warehouse 2",
                  "available": 3,
                  "onHand": 3,
                  "committed": 0,
                  "reserved": 0,
                  "incoming": 10
                }
              ],
              "totalAvailable": 7,
              "totalOnHand": 9
            }
          ],
          "count": 1,
          "filters": {
            "sku": "SHIRT-S",
            "productId": null,
            "locationId": null
          }
        }
        "#);
    }

    #[rstest]
    #[case("2")]
    #[case("gid://shopify/Location/2")]
    fn location_filter_keeps_matching_levels(#[case] location: &str) {
        let output = GetInventoryLevels::respond(
            input(json!({"locationId": location})),
            inventory_data(),
        )
        .unwrap();

        let output = serde_json::to_value(output).unwrap();
        let item = &output["inventoryItems"][0];
        assert_eq!(item["levels"].as_array().unwrap().len(), 1);
        assert_eq!(item["levels"][0]["locationId"], json!("gid://shopify/Location/2"));
        assert_eq!(item["totalAvailable"], json!(3));
        assert_eq!(item["totalOnHand"], json!(3));
    }

    #[test]
    fn null_levels_are_empty() {
        let data: InventoryItemsData = input(json!({"inventoryItems": {"edges": [{"node": {
            "id": "gid://shopify/InventoryItem/5",
            "sku": null,
            "tracked": false,
            "variant": null,
            "inventoryLevels": null
        }}]}}));

        let output = serde_json::to_value(
            GetInventoryLevels::respond(input(json!({})), data).unwrap(),
        )
        .unwrap();
        assert_eq!(output["inventoryItems"][0]["levels"], json!([]));
        assert_eq!(output["inventoryItems"][0]["totalAvailable"], json!(0));
    }

    #[test]
    fn no_items_is_an_empty_result() {
        let output = GetInventoryLevels::respond(
            input(json!({})),
            input(json!({"inventoryItems": {"edges": []}})),
        )
        .unwrap();
        let output = serde_json::to_value(output).unwrap();
        assert_eq!(output["count"], json!(0));
        assert_eq!(output["inventoryItems"], json!([]));
    }
}
