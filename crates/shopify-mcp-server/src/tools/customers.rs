//! Customer tools

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::orders::{OrderSummary, OrdersData, order_fields};
use super::{Metafield, MetafieldInput, default_limit, non_blank};
use crate::errors::ToolError;
use crate::graphql::Request;
use crate::operations::Executable;
use crate::types::{
    Connection, MailingAddress, Money, UserError, check_user_errors, global_id, numeric_id,
};

const GET_CUSTOMERS: &str = r#"
query GetCustomers($first: Int!, $query: String) {
  customers(first: $first, query: $query) {
    edges {
      node {
        id
        firstName
        lastName
        displayName
        email
        phone
        state
        verifiedEmail
        taxExempt
        tags
        note
        numberOfOrders
        amountSpent { amount currencyCode }
        createdAt
        updatedAt
        defaultAddress {
          address1 address2 city company province provinceCode country countryCodeV2 zip phone
        }
      }
    }
  }
}
"#;

const UPDATE_CUSTOMER: &str = r#"
mutation UpdateCustomer($input: CustomerInput!) {
  customerUpdate(input: $input) {
    customer {
      id
      firstName
      lastName
      displayName
      email
      phone
      tags
      note
      taxExempt
      updatedAt
      metafields(first: 20) {
        edges { node { id namespace key value type } }
      }
    }
    userErrors { field message }
  }
}
"#;

const GET_CUSTOMER_ORDERS: &str = concat!(
    r#"
query GetCustomerOrders($first: Int!, $query: String!) {
  orders(first: $first, query: $query, sortKey: CREATED_AT, reverse: true) {
    edges { node { ...OrderFields } }
  }
}
"#,
    order_fields!()
);

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    id: String,
    first_name: Option<String>,
    last_name: Option<String>,
    display_name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    state: Option<String>,
    verified_email: Option<bool>,
    tax_exempt: Option<bool>,
    #[serde(default)]
    tags: Vec<String>,
    note: Option<String>,
    /// Unsigned 64-bit count, encoded as a string by the API
    number_of_orders: Option<String>,
    amount_spent: Option<Money>,
    created_at: Option<String>,
    updated_at: Option<String>,
    default_address: Option<MailingAddress>,
}

pub struct GetCustomers;

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetCustomersInput {
    /// Search customers by name, email or any customer search term
    search_query: Option<String>,

    /// Maximum number of customers to return
    #[schemars(range(min = 1, max = 50))]
    #[serde(default = "default_limit")]
    limit: u32,
}

#[derive(Debug, Deserialize)]
pub struct CustomersData {
    customers: Connection<Customer>,
}

#[derive(Debug, Serialize)]
pub struct CustomersOutput {
    customers: Vec<Customer>,
    count: usize,
}

impl Executable for GetCustomers {
    type Input = GetCustomersInput;
    type Data = CustomersData;
    type Output = CustomersOutput;

    const NAME: &'static str = "get-customers";
    const DESCRIPTION: &'static str = "Get customers, optionally filtered by a search query";
    const ACTION: &'static str = "fetch customers";

    fn request(input: &Self::Input) -> Result<Request, ToolError> {
        Ok(Request::new(
            GET_CUSTOMERS,
            json!({
                "first": input.limit,
                "query": non_blank(input.search_query.as_deref()),
            }),
        ))
    }

    fn respond(_input: Self::Input, data: Self::Data) -> Result<Self::Output, ToolError> {
        let customers = data.customers.into_nodes();
        Ok(CustomersOutput {
            count: customers.len(),
            customers,
        })
    }
}

pub struct UpdateCustomer;

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerInput {
    /// Customer ID, numeric or `gid://shopify/Customer/<id>`
    id: String,

    first_name: Option<String>,

    last_name: Option<String>,

    email: Option<String>,

    phone: Option<String>,

    /// Replaces the customer's tags
    tags: Option<Vec<String>>,

    note: Option<String>,

    tax_exempt: Option<bool>,

    metafields: Option<Vec<MetafieldInput>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CustomerUpdate<'a> {
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    first_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tax_exempt: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metafields: Option<&'a [MetafieldInput]>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdatedCustomerNode {
    id: String,
    first_name: Option<String>,
    last_name: Option<String>,
    display_name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    note: Option<String>,
    tax_exempt: Option<bool>,
    updated_at: Option<String>,
    #[serde(default)]
    metafields: Connection<Metafield>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedCustomer {
    id: String,
    first_name: Option<String>,
    last_name: Option<String>,
    display_name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    tags: Vec<String>,
    note: Option<String>,
    tax_exempt: Option<bool>,
    updated_at: Option<String>,
    metafields: Vec<Metafield>,
}

impl From<UpdatedCustomerNode> for UpdatedCustomer {
    fn from(node: UpdatedCustomerNode) -> Self {
        Self {
            id: node.id,
            first_name: node.first_name,
            last_name: node.last_name,
            display_name: node.display_name,
            email: node.email,
            phone: node.phone,
            tags: node.tags,
            note: node.note,
            tax_exempt: node.tax_exempt,
            updated_at: node.updated_at,
            metafields: node.metafields.into_nodes(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerData {
    customer_update: UpdateCustomerPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateCustomerPayload {
    customer: Option<UpdatedCustomerNode>,
    #[serde(default)]
    user_errors: Vec<UserError>,
}

#[derive(Debug, Serialize)]
pub struct CustomerOutput {
    customer: UpdatedCustomer,
}

impl Executable for UpdateCustomer {
    type Input = UpdateCustomerInput;
    type Data = UpdateCustomerData;
    type Output = CustomerOutput;

    const NAME: &'static str = "update-customer";
    const DESCRIPTION: &'static str = "Update a customer's name, contact details, tags, note, \
        tax exemption or metafields";
    const ACTION: &'static str = "update customer";

    fn request(input: &Self::Input) -> Result<Request, ToolError> {
        let update = CustomerUpdate {
            id: global_id("Customer", "id", &input.id)?,
            first_name: input.first_name.as_deref(),
            last_name: input.last_name.as_deref(),
            email: input.email.as_deref(),
            phone: input.phone.as_deref(),
            tags: input.tags.as_deref(),
            note: input.note.as_deref(),
            tax_exempt: input.tax_exempt,
            metafields: input.metafields.as_deref(),
        };
        Ok(Request::new(UPDATE_CUSTOMER, json!({ "input": update })))
    }

    fn respond(_input: Self::Input, data: Self::Data) -> Result<Self::Output, ToolError> {
        let payload = data.customer_update;
        check_user_errors(&payload.user_errors)?;
        payload
            .customer
            .map(|customer| CustomerOutput {
                customer: customer.into(),
            })
            .ok_or(ToolError::EmptyPayload("customerUpdate"))
    }
}

pub struct GetCustomerOrders;

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetCustomerOrdersInput {
    /// Customer ID, numeric or `gid://shopify/Customer/<id>`
    customer_id: String,

    /// Maximum number of orders to return
    #[schemars(range(min = 1, max = 50))]
    #[serde(default = "default_limit")]
    limit: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerOrdersOutput {
    orders: Vec<OrderSummary>,
    count: usize,
    customer_id: String,
}

impl Executable for GetCustomerOrders {
    type Input = GetCustomerOrdersInput;
    type Data = OrdersData;
    type Output = CustomerOrdersOutput;

    const NAME: &'static str = "get-customer-orders";
    const DESCRIPTION: &'static str = "Get the most recent orders placed by a customer";
    const ACTION: &'static str = "fetch customer orders";

    fn request(input: &Self::Input) -> Result<Request, ToolError> {
        let customer_id = numeric_id("Customer", "customerId", &input.customer_id)?;
        Ok(Request::new(
            GET_CUSTOMER_ORDERS,
            json!({
                "first": input.limit,
                "query": format!("customer_id:{customer_id}"),
            }),
        ))
    }

    fn respond(input: Self::Input, data: Self::Data) -> Result<Self::Output, ToolError> {
        let orders = data.into_summaries();
        Ok(CustomerOrdersOutput {
            count: orders.len(),
            orders,
            customer_id: global_id("Customer", "customerId", &input.customer_id)?,
        })
    }
}
