//! Order tools

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{Metafield, MetafieldInput, default_limit, non_blank, search_query};
use crate::errors::ToolError;
use crate::graphql::Request;
use crate::operations::Executable;
use crate::types::{
    Connection, MailingAddress, Money, MoneyBag, UserError, check_user_errors, global_id,
    shop_money,
};

/// Fields selected for every order in a list
macro_rules! order_fields {
    () => {
        r#"
fragment OrderFields on Order {
  id
  name
  email
  phone
  createdAt
  processedAt
  cancelledAt
  closed
  displayFinancialStatus
  displayFulfillmentStatus
  tags
  note
  totalPriceSet { shopMoney { amount currencyCode } }
  subtotalPriceSet { shopMoney { amount currencyCode } }
  totalShippingPriceSet { shopMoney { amount currencyCode } }
  totalTaxSet { shopMoney { amount currencyCode } }
  customer { id firstName lastName email }
  lineItems(first: 10) {
    edges {
      node {
        id
        title
        quantity
        sku
        variantTitle
        originalTotalSet { shopMoney { amount currencyCode } }
        variant { id }
      }
    }
  }
}
"#
    };
}

pub(crate) use order_fields;

const GET_ORDERS: &str = concat!(
    r#"
query GetOrders($first: Int!, $query: String) {
  orders(first: $first, query: $query, sortKey: CREATED_AT, reverse: true) {
    edges { node { ...OrderFields } }
  }
}
"#,
    order_fields!()
);

const SEARCH_ORDERS: &str = concat!(
    r#"
query SearchOrders($first: Int!, $query: String, $sortKey: OrderSortKeys!, $reverse: Boolean!) {
  orders(first: $first, query: $query, sortKey: $sortKey, reverse: $reverse) {
    edges { node { ...OrderFields } }
  }
}
"#,
    order_fields!()
);

const GET_ORDER_BY_ID: &str = r#"
query GetOrderById($id: ID!) {
  order(id: $id) {
    id
    name
    email
    phone
    createdAt
    processedAt
    updatedAt
    cancelledAt
    cancelReason
    closed
    displayFinancialStatus
    displayFulfillmentStatus
    tags
    note
    totalPriceSet { shopMoney { amount currencyCode } }
    subtotalPriceSet { shopMoney { amount currencyCode } }
    totalShippingPriceSet { shopMoney { amount currencyCode } }
    totalTaxSet { shopMoney { amount currencyCode } }
    totalDiscountsSet { shopMoney { amount currencyCode } }
    customer { id firstName lastName email }
    shippingAddress {
      address1 address2 city company province provinceCode country countryCodeV2 zip phone
    }
    billingAddress {
      address1 address2 city company province provinceCode country countryCodeV2 zip phone
    }
    customAttributes { key value }
    lineItems(first: 50) {
      edges {
        node {
          id
          title
          quantity
          sku
          variantTitle
          originalTotalSet { shopMoney { amount currencyCode } }
          variant { id }
        }
      }
    }
    metafields(first: 20) {
      edges { node { id namespace key value type } }
    }
  }
}
"#;

const UPDATE_ORDER: &str = r#"
mutation UpdateOrder($input: OrderInput!) {
  orderUpdate(input: $input) {
    order {
      id
      name
      email
      note
      tags
      customAttributes { key value }
      shippingAddress {
        address1 address2 city company province provinceCode country countryCodeV2 zip phone
      }
      metafields(first: 20) {
        edges { node { id namespace key value type } }
      }
    }
    userErrors { field message }
  }
}
"#;

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct OrderCustomer {
    id: String,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct Reference {
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LineItemNode {
    id: String,
    title: String,
    quantity: i64,
    sku: Option<String>,
    variant_title: Option<String>,
    original_total_set: Option<MoneyBag>,
    variant: Option<Reference>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LineItem {
    id: String,
    title: String,
    quantity: i64,
    sku: Option<String>,
    variant_title: Option<String>,
    original_total: Option<Money>,
    variant_id: Option<String>,
}

impl From<LineItemNode> for LineItem {
    fn from(node: LineItemNode) -> Self {
        Self {
            id: node.id,
            title: node.title,
            quantity: node.quantity,
            sku: node.sku,
            variant_title: node.variant_title,
            original_total: shop_money(node.original_total_set),
            variant_id: node.variant.map(|variant| variant.id),
        }
    }
}

/// An order node selected with the shared order fragment
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderNode {
    id: String,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    created_at: String,
    processed_at: Option<String>,
    cancelled_at: Option<String>,
    #[serde(default)]
    closed: bool,
    display_financial_status: Option<String>,
    display_fulfillment_status: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    note: Option<String>,
    total_price_set: Option<MoneyBag>,
    subtotal_price_set: Option<MoneyBag>,
    total_shipping_price_set: Option<MoneyBag>,
    total_tax_set: Option<MoneyBag>,
    customer: Option<OrderCustomer>,
    #[serde(default)]
    line_items: Connection<LineItemNode>,
}

/// An order as listed by the order tools
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    id: String,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    created_at: String,
    processed_at: Option<String>,
    cancelled_at: Option<String>,
    closed: bool,
    financial_status: Option<String>,
    fulfillment_status: Option<String>,
    tags: Vec<String>,
    note: Option<String>,
    total_price: Option<Money>,
    subtotal_price: Option<Money>,
    total_shipping_price: Option<Money>,
    total_tax: Option<Money>,
    customer: Option<OrderCustomer>,
    line_items: Vec<LineItem>,
}

impl From<OrderNode> for OrderSummary {
    fn from(node: OrderNode) -> Self {
        Self {
            id: node.id,
            name: node.name,
            email: node.email,
            phone: node.phone,
            created_at: node.created_at,
            processed_at: node.processed_at,
            cancelled_at: node.cancelled_at,
            closed: node.closed,
            financial_status: node.display_financial_status,
            fulfillment_status: node.display_fulfillment_status,
            tags: node.tags,
            note: node.note,
            total_price: shop_money(node.total_price_set),
            subtotal_price: shop_money(node.subtotal_price_set),
            total_shipping_price: shop_money(node.total_shipping_price_set),
            total_tax: shop_money(node.total_tax_set),
            customer: node.customer,
            line_items: node.line_items.map_nodes(LineItem::from),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OrdersData {
    orders: Connection<OrderNode>,
}

impl OrdersData {
    pub(crate) fn into_summaries(self) -> Vec<OrderSummary> {
        self.orders.map_nodes(OrderSummary::from)
    }
}

#[derive(Debug, Serialize)]
pub struct OrdersOutput {
    orders: Vec<OrderSummary>,
    count: usize,
}

impl From<Vec<OrderSummary>> for OrdersOutput {
    fn from(orders: Vec<OrderSummary>) -> Self {
        Self {
            count: orders.len(),
            orders,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Any,
    Open,
    Closed,
    Cancelled,
}

impl OrderStatus {
    fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Any => "any",
            OrderStatus::Open => "open",
            OrderStatus::Closed => "closed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

pub struct GetOrders;

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetOrdersInput {
    /// Order status filter
    #[serde(default)]
    status: OrderStatus,

    /// Maximum number of orders to return
    #[schemars(range(min = 1, max = 50))]
    #[serde(default = "default_limit")]
    limit: u32,
}

impl Executable for GetOrders {
    type Input = GetOrdersInput;
    type Data = OrdersData;
    type Output = OrdersOutput;

    const NAME: &'static str = "get-orders";
    const DESCRIPTION: &'static str = "Get the most recent orders, optionally filtered by status";
    const ACTION: &'static str = "fetch orders";

    fn request(input: &Self::Input) -> Result<Request, ToolError> {
        Ok(Request::new(
            GET_ORDERS,
            json!({
                "first": input.limit,
                "query": format!("status:{}", input.status.as_str()),
            }),
        ))
    }

    fn respond(_input: Self::Input, data: Self::Data) -> Result<Self::Output, ToolError> {
        Ok(data.into_summaries().into())
    }
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct Attribute {
    key: String,
    value: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderDetailNode {
    id: String,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    created_at: String,
    processed_at: Option<String>,
    updated_at: Option<String>,
    cancelled_at: Option<String>,
    cancel_reason: Option<String>,
    #[serde(default)]
    closed: bool,
    display_financial_status: Option<String>,
    display_fulfillment_status: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    note: Option<String>,
    total_price_set: Option<MoneyBag>,
    subtotal_price_set: Option<MoneyBag>,
    total_shipping_price_set: Option<MoneyBag>,
    total_tax_set: Option<MoneyBag>,
    total_discounts_set: Option<MoneyBag>,
    customer: Option<OrderCustomer>,
    shipping_address: Option<MailingAddress>,
    billing_address: Option<MailingAddress>,
    #[serde(default)]
    custom_attributes: Vec<Attribute>,
    #[serde(default)]
    line_items: Connection<LineItemNode>,
    #[serde(default)]
    metafields: Connection<Metafield>,
}

/// A single order with addresses, attributes and metafields
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    id: String,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    created_at: String,
    processed_at: Option<String>,
    updated_at: Option<String>,
    cancelled_at: Option<String>,
    cancel_reason: Option<String>,
    closed: bool,
    financial_status: Option<String>,
    fulfillment_status: Option<String>,
    tags: Vec<String>,
    note: Option<String>,
    total_price: Option<Money>,
    subtotal_price: Option<Money>,
    total_shipping_price: Option<Money>,
    total_tax: Option<Money>,
    total_discounts: Option<Money>,
    customer: Option<OrderCustomer>,
    shipping_address: Option<MailingAddress>,
    billing_address: Option<MailingAddress>,
    custom_attributes: Vec<Attribute>,
    line_items: Vec<LineItem>,
    metafields: Vec<Metafield>,
}

impl From<OrderDetailNode> for OrderDetail {
    fn from(node: OrderDetailNode) -> Self {
        Self {
            id: node.id,
            name: node.name,
            email: node.email,
            phone: node.phone,
            created_at: node.created_at,
            processed_at: node.processed_at,
            updated_at: node.updated_at,
            cancelled_at: node.cancelled_at,
            cancel_reason: node.cancel_reason,
            closed: node.closed,
            financial_status: node.display_financial_status,
            fulfillment_status: node.display_fulfillment_status,
            tags: node.tags,
            note: node.note,
            total_price: shop_money(node.total_price_set),
            subtotal_price: shop_money(node.subtotal_price_set),
            total_shipping_price: shop_money(node.total_shipping_price_set),
            total_tax: shop_money(node.total_tax_set),
            total_discounts: shop_money(node.total_discounts_set),
            customer: node.customer,
            shipping_address: node.shipping_address,
            billing_address: node.billing_address,
            custom_attributes: node.custom_attributes,
            line_items: node.line_items.map_nodes(LineItem::from),
            metafields: node.metafields.into_nodes(),
        }
    }
}

pub struct GetOrderById;

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetOrderByIdInput {
    /// Order ID, numeric or `gid://shopify/Order/<id>`
    order_id: String,
}

#[derive(Debug, Deserialize)]
pub struct OrderData {
    order: Option<OrderDetailNode>,
}

#[derive(Debug, Serialize)]
pub struct OrderOutput<O> {
    order: O,
}

impl Executable for GetOrderById {
    type Input = GetOrderByIdInput;
    type Data = OrderData;
    type Output = OrderOutput<OrderDetail>;

    const NAME: &'static str = "get-order-by-id";
    const DESCRIPTION: &'static str =
        "Get a single order by ID, including addresses, line items and metafields";
    const ACTION: &'static str = "fetch order";

    fn request(input: &Self::Input) -> Result<Request, ToolError> {
        let id = global_id("Order", "orderId", &input.order_id)?;
        Ok(Request::new(GET_ORDER_BY_ID, json!({ "id": id })))
    }

    fn respond(input: Self::Input, data: Self::Data) -> Result<Self::Output, ToolError> {
        match data.order {
            Some(order) => Ok(OrderOutput {
                order: order.into(),
            }),
            None => Err(ToolError::NotFound {
                kind: "Order",
                id: input.order_id,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderSortKey {
    #[default]
    CreatedAt,
    UpdatedAt,
    ProcessedAt,
    TotalPrice,
    OrderNumber,
    CustomerName,
    Id,
}

pub struct SearchOrders;

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchOrdersInput {
    /// Free-form search query in the order search syntax
    query: Option<String>,

    customer_email: Option<String>,

    /// Financial status, e.g. `paid`, `pending` or `refunded`
    financial_status: Option<String>,

    /// Fulfillment status, e.g. `shipped`, `unshipped` or `partial`
    fulfillment_status: Option<String>,

    /// Only orders created at or after this ISO 8601 date
    created_at_min: Option<String>,

    /// Only orders created at or before this ISO 8601 date
    created_at_max: Option<String>,

    #[serde(default)]
    sort_key: OrderSortKey,

    /// Sort in descending order
    #[serde(default = "default_reverse")]
    reverse: bool,

    /// Maximum number of orders to return
    #[schemars(range(min = 1, max = 50))]
    #[serde(default = "default_limit")]
    limit: u32,
}

fn default_reverse() -> bool {
    true
}

impl SearchOrdersInput {
    fn search_query(&self) -> Option<String> {
        let terms = [
            non_blank(self.query.as_deref()).map(str::to_string),
            non_blank(self.customer_email.as_deref()).map(|email| format!("email:{email}")),
            non_blank(self.financial_status.as_deref())
                .map(|status| format!("financial_status:{status}")),
            non_blank(self.fulfillment_status.as_deref())
                .map(|status| format!("fulfillment_status:{status}")),
            non_blank(self.created_at_min.as_deref()).map(|min| format!("created_at:>={min}")),
            non_blank(self.created_at_max.as_deref()).map(|max| format!("created_at:<={max}")),
        ];
        search_query(terms.into_iter().flatten())
    }
}

#[derive(Debug, Serialize)]
pub struct SearchOrdersOutput {
    orders: Vec<OrderSummary>,
    count: usize,
    query: Option<String>,
}

impl Executable for SearchOrders {
    type Input = SearchOrdersInput;
    type Data = OrdersData;
    type Output = SearchOrdersOutput;

    const NAME: &'static str = "search-orders";
    const DESCRIPTION: &'static str = "Search orders by customer email, financial or fulfillment \
        status, creation date range or a free-form query";
    const ACTION: &'static str = "search orders";

    fn request(input: &Self::Input) -> Result<Request, ToolError> {
        Ok(Request::new(
            SEARCH_ORDERS,
            json!({
                "first": input.limit,
                "query": input.search_query(),
                "sortKey": input.sort_key,
                "reverse": input.reverse,
            }),
        ))
    }

    fn respond(input: Self::Input, data: Self::Data) -> Result<Self::Output, ToolError> {
        let orders = data.into_summaries();
        Ok(SearchOrdersOutput {
            count: orders.len(),
            orders,
            query: input.search_query(),
        })
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct AttributeInput {
    key: String,
    value: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct AddressInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    address1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    address2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    province: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    zip: Option<String>,
}

pub struct UpdateOrder;

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderInput {
    /// Order ID, numeric or `gid://shopify/Order/<id>`
    id: String,

    /// Replaces the order's tags
    tags: Option<Vec<String>>,

    email: Option<String>,

    note: Option<String>,

    custom_attributes: Option<Vec<AttributeInput>>,

    metafields: Option<Vec<MetafieldInput>>,

    shipping_address: Option<AddressInput>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OrderUpdate<'a> {
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    custom_attributes: Option<&'a [AttributeInput]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metafields: Option<&'a [MetafieldInput]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    shipping_address: Option<&'a AddressInput>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdatedOrderNode {
    id: String,
    name: String,
    email: Option<String>,
    note: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    custom_attributes: Vec<Attribute>,
    shipping_address: Option<MailingAddress>,
    #[serde(default)]
    metafields: Connection<Metafield>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedOrder {
    id: String,
    name: String,
    email: Option<String>,
    note: Option<String>,
    tags: Vec<String>,
    custom_attributes: Vec<Attribute>,
    shipping_address: Option<MailingAddress>,
    metafields: Vec<Metafield>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderData {
    order_update: UpdateOrderPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateOrderPayload {
    order: Option<UpdatedOrderNode>,
    #[serde(default)]
    user_errors: Vec<UserError>,
}

impl Executable for UpdateOrder {
    type Input = UpdateOrderInput;
    type Data = UpdateOrderData;
    type Output = OrderOutput<UpdatedOrder>;

    const NAME: &'static str = "update-order";
    const DESCRIPTION: &'static str = "Update an order's tags, email, note, custom attributes, \
        metafields or shipping address";
    const ACTION: &'static str = "update order";

    fn request(input: &Self::Input) -> Result<Request, ToolError> {
        let update = OrderUpdate {
            id: global_id("Order", "id", &input.id)?,
            tags: input.tags.as_deref(),
            email: input.email.as_deref(),
            note: input.note.as_deref(),
            custom_attributes: input.custom_attributes.as_deref(),
            metafields: input.metafields.as_deref(),
            shipping_address: input.shipping_address.as_ref(),
        };
        Ok(Request::new(UPDATE_ORDER, json!({ "input": update })))
    }

    fn respond(_input: Self::Input, data: Self::Data) -> Result<Self::Output, ToolError> {
        let payload = data.order_update;
        check_user_errors(&payload.user_errors)?;
        let order = payload.order.ok_or(ToolError::EmptyPayload("orderUpdate"))?;

        Ok(OrderOutput {
            order: UpdatedOrder {
                id: order.id,
                name: order.name,
                email: order.email,
                note: order.note,
                tags: order.tags,
                custom_attributes: order.custom_attributes,
                shipping_address: order.shipping_address,
                metafields: order.metafields.into_nodes(),
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

    fn order_node() -> Value {
        json!({
            "id": "gid://shopify/Order/1001",
            "name": "#1001",
            "email": "ada@example.com",
            "phone": null,
            "createdAt": "2025-03-01T10:00:00Z",
            "processedAt": "2025-03-01T10:00:01Z",
            "cancelledAt": null,
            "closed": false,
            "displayFinancialStatus": "PAID",
            "displayFulfillmentStatus": "UNFULFILLED",
            "tags": ["vip"],
            "note": null,
            "totalPriceSet": {"shopMoney": {"amount": "25.00", "currencyCode": "EUR"}},
            "subtotalPriceSet": {"shopMoney": {"amount": "20.00", "currencyCode": "EUR"}},
            "totalShippingPriceSet": {"shopMoney": {"amount": "5.00", "currencyCode": "EUR"}},
            "totalTaxSet": null,
            "customer": {"id": "gid://shopify/Customer/7", "firstName": "Ada", "lastName": "Lovelace", "email": "ada@example.com"},
            "lineItems": {"edges": [{"node": {
                "id": "gid://shopify/LineItem/1",
                "title": "Shirt",
                "quantity": 2,
                "sku": "SHIRT-S",
                "variantTitle": "Small",
                "originalTotalSet": {"shopMoney": {"amount": "20.00", "currencyCode": "EUR"}},
                "variant": {"id": "gid://shopify/ProductVariant/2"}
            }}]}
        })
    }

    #[rstest]
    #[case(json!({}), "status:any", 10)]
    #[case(json!({"status": "open", "limit": 3}), "status:open", 3)]
    #[case(json!({"status": "cancelled"}), "status:cancelled", 10)]
    fn filters_orders_by_status(#[case] arguments: Value, #[case] query: &str, #[case] first: u32) {
        let request = GetOrders::request(&input(arguments)).unwrap();
        assert_eq!(request.variables, json!({"first": first, "query": query}));
    }

    #[test]
    fn flattens_order_summaries() {
        let data: OrdersData = input(json!({"orders": {"edges": [{"node": order_node()}]}}));
        let output = GetOrders::respond(input(json!({})), data).unwrap();

        assert_json_snapshot!(output, @r##"
        {
          "orders": [
            {
              "id": "gid://shopify/Order/1001",
              "name": "#1001",
              "email": "ada@example.com",
              "phone": null,
              "createdAt": "2025-03-01T10:00:00Z",
              "processedAt": "2025-03-01T10:00:01Z",
              "cancelledAt": null,
              "closed": false,
              "financialStatus": "PAID",
              "fulfillmentStatus": "UNFULFILLED",
              "tags": [
                "vip"
              ],
              "note": null,
              "totalPrice": {
                "amount": "25.00",
                "currencyCode": "EUR"
              },
              "subtotalPrice": {
                "amount": "20.00",
                "currencyCode": "EUR"
              },
              "totalShippingPrice": {
                "amount": "5.00",
                "currencyCode": "EUR"
              },
              "totalTax": null,
              "customer": {
                "id": "gid://shopify/Customer/7",
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": "ada@example.com"
              },
              "lineItems": [
                {
                  "id": "gid://shopify/LineItem/1",
                  "title": "Shirt",
                  "quantity": 2,
                  "sku": "SHIRT-S",
                  "variantTitle": "Small",
                  "originalTotal": {
                    "amount": "20.00",
                    "currencyCode": "EUR"
                  },
                  "variantId": "gid://shopify/ProductVariant/2"
                }
              ]
            }
          ],
          "count": 1
        }
        "##);
    }

    #[test]
    fn missing_order_is_not_found() {
        let error = GetOrderById::respond(
            input(json!({"orderId": "gid://shopify/Order/9"})),
            input(json!({"order": null})),
        )
        .unwrap_err();
        assert_eq!(
            error.to_string(),
            "Order with ID gid://shopify/Order/9 not found"
        );
    }

    #[test]
    fn rejects_non_numeric_order_ids() {
        let error = GetOrderById::request(&input(json!({"orderId": "#1001"}))).unwrap_err();
        assert!(error.is_invalid_arguments());
    }

    #[test]
    fn builds_search_query_from_filters() {
        let request = SearchOrders::request(&input(json!({
            "customerEmail": "ada@example.com",
            "financialStatus": "paid",
            "createdAtMin": "2025-01-01",
            "createdAtMax": "2025-01-31",
            "sortKey": "TOTAL_PRICE",
            "reverse": false,
            "limit": 20
        })))
        .unwrap();

        assert_eq!(
            request.variables,
            json!({
                "first": 20,
                "query": "email:ada@example.com AND financial_status:paid AND created_at:>=2025-01-01 AND created_at:<=2025-01-31",
                "sortKey": "TOTAL_PRICE",
                "reverse": false
            })
        );
    }

    #[test]
    fn search_defaults_to_newest_first() {
        let request = SearchOrders::request(&input(json!({}))).unwrap();
        assert_eq!(
            request.variables,
            json!({"first": 10, "query": null, "sortKey": "CREATED_AT", "reverse": true})
        );
    }

    #[test]
    fn search_echoes_the_query() {
        let output = SearchOrders::respond(
            input(json!({"query": "tag:vip", "fulfillmentStatus": "shipped"})),
            input(json!({"orders": {"edges": []}})),
        )
        .unwrap();
        assert_eq!(
            serde_json::to_value(output).unwrap(),
            json!({"orders": [], "count": 0, "query": "tag:vip AND fulfillment_status:shipped"})
        );
    }

    #[test]
    fn update_sends_only_given_fields() {
        let request = UpdateOrder::request(&input(json!({
            "id": "1001",
            "tags": ["gift"],
            "customAttributes": [{"key": "wrap", "value": "yes"}],
            "shippingAddress": {"city": "Paris", "zip": "75001"}
        })))
        .unwrap();

        assert_eq!(
            request.variables,
            json!({"input": {
                "id": "gid://shopify/Order/1001",
                "tags": ["gift"],
                "customAttributes": [{"key": "wrap", "value": "yes"}],
                "shippingAddress": {"city": "Paris", "zip": "75001"}
            }})
        );
    }

    #[test]
    fn update_user_errors_fail() {
        let error = UpdateOrder::respond(
            input(json!({"id": "1001"})),
            input(json!({"orderUpdate": {
                "order": null,
                "userErrors": [{"field": ["email"], "message": "is invalid"}]
            }})),
        )
        .unwrap_err();
        assert_eq!(error.to_string(), "email: is invalid");
    }
}
