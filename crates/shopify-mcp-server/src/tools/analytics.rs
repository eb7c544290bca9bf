//! ShopifyQL analytics tools
//!
//! Every tool here submits one ShopifyQL query and returns the resulting table. Rows come
//! back as arrays of cells; they are zipped with the column names into objects.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use super::non_blank;
use crate::errors::ToolError;
use crate::graphql::Request;
use crate::operations::Executable;
use crate::shopifyql::{GroupBy, Period, ShopifyqlQuery, quote};

const SHOPIFYQL_QUERY: &str = r#"
query ShopifyqlQuery($query: String!) {
  shopifyqlQuery(query: $query) {
    tableData {
      columns { name dataType displayName }
      rows
    }
    parseErrors
  }
}
"#;

/// Metrics reported by `get-sales-report` when none are requested
pub const DEFAULT_SALES_METRICS: [&str; 4] =
    ["total_sales", "orders", "net_sales", "average_order_value"];

const CUSTOMER_METRICS: [&str; 4] = ["customers", "orders", "total_sales", "average_order_value"];

const PRODUCT_METRICS: [&str; 4] = ["total_sales", "net_sales", "ordered_item_quantity", "orders"];

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct Column {
    name: String,
    data_type: Option<String>,
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TableData {
    #[serde(default)]
    columns: Vec<Column>,
    #[serde(default)]
    rows: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShopifyqlResponse {
    table_data: Option<TableData>,
    #[serde(default)]
    parse_errors: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopifyqlData {
    shopifyql_query: Option<ShopifyqlResponse>,
}

/// A ShopifyQL result table with named cells
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Table {
    columns: Vec<Column>,
    rows: Vec<Value>,
    row_count: usize,
}

impl TryFrom<ShopifyqlData> for Table {
    type Error = ToolError;

    fn try_from(data: ShopifyqlData) -> Result<Self, Self::Error> {
        let response = data
            .shopifyql_query
            .ok_or(ToolError::EmptyPayload("shopifyqlQuery"))?;

        if !response.parse_errors.is_empty() {
            return Err(ToolError::Parse(response.parse_errors.join("; ")));
        }

        let Some(table) = response.table_data else {
            return Ok(Table {
                columns: Vec::new(),
                rows: Vec::new(),
                row_count: 0,
            });
        };

        let rows: Vec<Value> = match table.rows {
            Value::Array(rows) => rows
                .into_iter()
                .map(|row| name_cells(&table.columns, row))
                .collect(),
            Value::Null => Vec::new(),
            other => vec![other],
        };

        Ok(Table {
            row_count: rows.len(),
            columns: table.columns,
            rows,
        })
    }
}

/// Turn an array row into an object keyed by column name; object rows pass through
fn name_cells(columns: &[Column], row: Value) -> Value {
    match row {
        Value::Array(cells) => Value::Object(
            columns
                .iter()
                .map(|column| column.name.clone())
                .zip(cells)
                .collect::<Map<String, Value>>(),
        ),
        row => row,
    }
}

/// Only plain identifiers may be spliced into a generated query
fn metric_name(metric: &str) -> Result<String, ToolError> {
    let metric = metric.trim();
    let valid = metric
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && metric
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid {
        Ok(metric.to_string())
    } else {
        Err(ToolError::invalid_argument(
            "metrics",
            format!("\"{metric}\" is not a valid metric name"),
        ))
    }
}

fn default_report_limit() -> u32 {
    50
}

fn default_product_limit() -> u32 {
    10
}

pub struct RunShopifyqlQuery;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct RunShopifyqlQueryInput {
    /// ShopifyQL query text, e.g. `FROM sales SHOW total_sales SINCE -7d`
    #[schemars(length(min = 1))]
    query: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryOutput {
    query: String,
    #[serde(flatten)]
    table: Table,
}

impl Executable for RunShopifyqlQuery {
    type Input = RunShopifyqlQueryInput;
    type Data = ShopifyqlData;
    type Output = QueryOutput;

    const NAME: &'static str = "run-shopifyql-query";
    const DESCRIPTION: &'static str = "Run a ShopifyQL analytics query and return the result \
        table. Example: FROM sales SHOW total_sales, orders SINCE -30d GROUP BY day";
    const ACTION: &'static str = "run ShopifyQL query";

    fn request(input: &Self::Input) -> Result<Request, ToolError> {
        let query = non_blank(Some(&input.query))
            .ok_or_else(|| ToolError::invalid_argument("query", "must not be blank"))?;
        Ok(Request::new(SHOPIFYQL_QUERY, json!({ "query": query })))
    }

    fn respond(input: Self::Input, data: Self::Data) -> Result<Self::Output, ToolError> {
        Ok(QueryOutput {
            query: input.query.trim().to_string(),
            table: data.try_into()?,
        })
    }
}

pub struct GetSalesReport;

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetSalesReportInput {
    /// Reporting period
    #[serde(default)]
    period: Period,

    /// Dimension to break the report down by
    group_by: Option<GroupBy>,

    /// Metrics to report; defaults to total_sales, orders, net_sales and average_order_value
    metrics: Option<Vec<String>>,

    /// Maximum number of rows to return
    #[schemars(range(min = 1, max = 250))]
    #[serde(default = "default_report_limit")]
    limit: u32,
}

impl GetSalesReportInput {
    fn query(&self) -> Result<ShopifyqlQuery, ToolError> {
        let metrics = match self.metrics.as_deref() {
            Some(metrics) if !metrics.is_empty() => metrics
                .iter()
                .map(|m| metric_name(m))
                .collect::<Result<Vec<_>, _>>()?,
            _ => DEFAULT_SALES_METRICS.map(str::to_string).to_vec(),
        };

        Ok(ShopifyqlQuery::builder()
            .from("sales")
            .show(metrics)
            .period(self.period.as_str())
            .maybe_group_by(self.group_by.map(|g| g.as_str().to_string()))
            .limit(self.limit)
            .build())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportOutput {
    query: String,
    period: Period,
    group_by: Option<GroupBy>,
    #[serde(flatten)]
    table: Table,
}

impl Executable for GetSalesReport {
    type Input = GetSalesReportInput;
    type Data = ShopifyqlData;
    type Output = ReportOutput;

    const NAME: &'static str = "get-sales-report";
    const DESCRIPTION: &'static str = "Get a sales report for a period, optionally broken down \
        by time, product, vendor, channel or customer type";
    const ACTION: &'static str = "fetch sales report";

    fn request(input: &Self::Input) -> Result<Request, ToolError> {
        let query = input.query()?.to_string();
        Ok(Request::new(SHOPIFYQL_QUERY, json!({ "query": query })))
    }

    fn respond(input: Self::Input, data: Self::Data) -> Result<Self::Output, ToolError> {
        Ok(ReportOutput {
            query: input.query()?.to_string(),
            period: input.period,
            group_by: input.group_by,
            table: data.try_into()?,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProductSortBy {
    #[default]
    TotalSales,
    NetSales,
    OrderedItemQuantity,
    Orders,
}

impl ProductSortBy {
    fn column(self) -> &'static str {
        match self {
            ProductSortBy::TotalSales => "total_sales",
            ProductSortBy::NetSales => "net_sales",
            ProductSortBy::OrderedItemQuantity => "ordered_item_quantity",
            ProductSortBy::Orders => "orders",
        }
    }
}

pub struct GetProductPerformance;

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetProductPerformanceInput {
    /// Reporting period
    #[serde(default)]
    period: Period,

    /// Metric to rank products by, highest first
    #[serde(default)]
    sort_by: ProductSortBy,

    /// Only products of this product type
    product_type: Option<String>,

    /// Maximum number of products to return
    #[schemars(range(min = 1, max = 250))]
    #[serde(default = "default_product_limit")]
    limit: u32,
}

impl GetProductPerformanceInput {
    fn query(&self) -> ShopifyqlQuery {
        let mut show = vec!["product_title".to_string()];
        show.extend(PRODUCT_METRICS.map(str::to_string));

        ShopifyqlQuery::builder()
            .from("sales")
            .show(show)
            .maybe_filter(
                non_blank(self.product_type.as_deref())
                    .map(|product_type| format!("product_type = {}", quote(product_type))),
            )
            .period(self.period.as_str())
            .group_by(GroupBy::Product.as_str())
            .order_by(format!("{} DESC", self.sort_by.column()))
            .limit(self.limit)
            .build()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPerformanceOutput {
    query: String,
    period: Period,
    sort_by: ProductSortBy,
    #[serde(flatten)]
    table: Table,
}

impl Executable for GetProductPerformance {
    type Input = GetProductPerformanceInput;
    type Data = ShopifyqlData;
    type Output = ProductPerformanceOutput;

    const NAME: &'static str = "get-product-performance";
    const DESCRIPTION: &'static str =
        "Rank products by sales, net sales, units sold or orders over a period";
    const ACTION: &'static str = "fetch product performance";

    fn request(input: &Self::Input) -> Result<Request, ToolError> {
        Ok(Request::new(
            SHOPIFYQL_QUERY,
            json!({ "query": input.query().to_string() }),
        ))
    }

    fn respond(input: Self::Input, data: Self::Data) -> Result<Self::Output, ToolError> {
        Ok(ProductPerformanceOutput {
            query: input.query().to_string(),
            period: input.period,
            sort_by: input.sort_by,
            table: data.try_into()?,
        })
    }
}

pub struct GetCustomerAnalytics;

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetCustomerAnalyticsInput {
    /// Reporting period
    #[serde(default)]
    period: Period,

    /// Dimension to break the report down by, e.g. `month` or `customer_type`
    group_by: Option<GroupBy>,

    /// Maximum number of rows to return
    #[schemars(range(min = 1, max = 250))]
    #[serde(default = "default_report_limit")]
    limit: u32,
}

impl GetCustomerAnalyticsInput {
    fn query(&self) -> ShopifyqlQuery {
        ShopifyqlQuery::builder()
            .from("sales")
            .show(CUSTOMER_METRICS)
            .period(self.period.as_str())
            .maybe_group_by(self.group_by.map(|g| g.as_str().to_string()))
            .limit(self.limit)
            .build()
    }
}

impl Executable for GetCustomerAnalytics {
    type Input = GetCustomerAnalyticsInput;
    type Data = ShopifyqlData;
    type Output = ReportOutput;

    const NAME: &'static str = "get-customer-analytics";
    const DESCRIPTION: &'static str = "Get customer counts, orders, sales and average order \
        value for a period, optionally broken down by time or customer type";
    const ACTION: &'static str = "fetch customer analytics";

    fn request(input: &Self::Input) -> Result<Request, ToolError> {
        Ok(Request::new(
            SHOPIFYQL_QUERY,
            json!({ "query": input.query().to_string() }),
        ))
    }

    fn respond(input: Self::Input, data: Self::Data) -> Result<Self::Output, ToolError> {
        Ok(ReportOutput {
            query: input.query().to_string(),
            period: input.period,
            group_by: input.group_by,
            table: data.try_into()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;
    use rstest::rstest;

    use super::*;

    fn input<T: serde::de::DeserializeOwned>(value: Value) -> T {
        serde_json::from_value(value).unwrap()
    }

    fn query_of(request: &Request) -> &str {
        request.variables["query"].as_str().unwrap()
    }

    fn table_data() -> ShopifyqlData {
        input(json!({"shopifyqlQuery": {
            "tableData": {
                "columns": [
                    {"name": "day", "dataType": "DAY_TIMESTAMP", "displayName": "Day"},
                    {"name": "total_sales", "dataType": "MONEY", "displayName": "Total sales"}
                ],
                "rows": [["2025-01-01", "120.00"], ["2025-01-02", "80.50"]]
            },
            "parseErrors": []
        }}))
    }

    fn parse_error_data() -> ShopifyqlData {
        input(json!({"shopifyqlQuery": {
            "tableData": null,
            "parseErrors": ["Unknown column 'revenue'", "Expected SHOW"]
        }}))
    }

    #[test]
    fn passes_raw_queries_through() {
        let request = RunShopifyqlQuery::request(&input(json!({
            "query": " FROM sales SHOW total_sales WHERE product_title = 'Men\\'s' SINCE -7d "
        })))
        .unwrap();
        assert_eq!(
            query_of(&request),
            "FROM sales SHOW total_sales WHERE product_title = 'Men\\'s' SINCE -7d"
        );
    }

    #[test]
    fn blank_raw_queries_are_rejected() {
        let error = RunShopifyqlQuery::request(&input(json!({"query": "  "}))).unwrap_err();
        assert!(error.is_invalid_arguments());
    }

    #[test]
    fn zips_rows_with_column_names() {
        let output = RunShopifyqlQuery::respond(
            input(json!({"query": "FROM sales SHOW total_sales GROUP BY day"})),
            table_data(),
        )
        .unwrap();

        let output = serde_json::to_value(output).unwrap();
        assert_eq!(
            output["rows"],
            json!([
                {"day": "2025-01-01", "total_sales": "120.00"},
                {"day": "2025-01-02", "total_sales": "80.50"}
            ])
        );
        assert_eq!(output["rowCount"], json!(2));
        assert_eq!(output["columns"][1]["displayName"], json!("Total sales"));
        assert_eq!(
            output["query"],
            json!("FROM sales SHOW total_sales GROUP BY day")
        );
    }

    #[test]
    fn object_rows_pass_through() {
        let data: ShopifyqlData = input(json!({"shopifyqlQuery": {
            "tableData": {
                "columns": [{"name": "orders", "dataType": "INTEGER", "displayName": "Orders"}],
                "rows": [{"orders": 3}]
            },
            "parseErrors": []
        }}));

        let table = Table::try_from(data).unwrap();
        assert_eq!(table.rows, vec![json!({"orders": 3})]);
    }

    #[test]
    fn missing_table_is_empty() {
        let data: ShopifyqlData = input(json!({"shopifyqlQuery": {"tableData": null}}));
        let table = Table::try_from(data).unwrap();
        assert_eq!(table.row_count, 0);
        assert!(table.columns.is_empty());
    }

    #[test]
    fn raw_query_reports_parse_errors() {
        let error = RunShopifyqlQuery::respond(
            input(json!({"query": "FROM sales SHOW revenue"})),
            parse_error_data(),
        )
        .unwrap_err();
        assert_eq!(
            error.to_string(),
            "ShopifyQL parse errors: Unknown column 'revenue'; Expected SHOW"
        );
    }

    #[test]
    fn report_tools_report_parse_errors() {
        let sales = GetSalesReport::respond(input(json!({})), parse_error_data()).unwrap_err();
        let products =
            GetProductPerformance::respond(input(json!({})), parse_error_data()).unwrap_err();
        let customers =
            GetCustomerAnalytics::respond(input(json!({})), parse_error_data()).unwrap_err();

        for error in [sales, products, customers] {
            assert!(matches!(&error, ToolError::Parse(message)
                if message == "Unknown column 'revenue'; Expected SHOW"));
        }
    }

    #[test]
    fn sales_report_defaults() {
        let request = GetSalesReport::request(&input(json!({}))).unwrap();
        assert_snapshot!(
            query_of(&request),
            @"FROM sales SHOW total_sales, orders, net_sales, average_order_value SINCE -30d LIMIT 50"
        );
    }

    #[test]
    fn sales_report_grouped_by_day() {
        let request = GetSalesReport::request(&input(json!({
            "period": "last_7_days",
            "groupBy": "day",
            "metrics": ["total_sales", "orders"]
        })))
        .unwrap();
        assert_snapshot!(
            query_of(&request),
            @"FROM sales SHOW total_sales, orders SINCE -7d GROUP BY day ORDER BY day LIMIT 50"
        );
    }

    #[test]
    fn sales_report_grouped_by_channel() {
        let request = GetSalesReport::request(&input(json!({
            "period": "this_month",
            "groupBy": "channel",
            "limit": 5
        })))
        .unwrap();
        assert_snapshot!(
            query_of(&request),
            @"FROM sales SHOW total_sales, orders, net_sales, average_order_value DURING this_month GROUP BY sales_channel ORDER BY total_sales DESC LIMIT 5"
        );
    }

    #[rstest]
    #[case("total_sales; DROP")]
    #[case("1orders")]
    #[case("")]
    fn rejects_unsafe_metric_names(#[case] metric: &str) {
        let error =
            GetSalesReport::request(&input(json!({"metrics": [metric]}))).unwrap_err();
        assert!(error.to_string().starts_with("Invalid argument `metrics`"));
    }

    #[test]
    fn report_echoes_period_and_grouping() {
        let output = GetSalesReport::respond(
            input(json!({"period": "last_7_days", "groupBy": "day", "metrics": ["total_sales"]})),
            table_data(),
        )
        .unwrap();

        let output = serde_json::to_value(output).unwrap();
        assert_eq!(output["period"], json!("last_7_days"));
        assert_eq!(output["groupBy"], json!("day"));
        assert_eq!(
            output["query"],
            json!("FROM sales SHOW total_sales SINCE -7d GROUP BY day ORDER BY day LIMIT 50")
        );
        assert_eq!(output["rowCount"], json!(2));
    }

    #[test]
    fn product_performance_ranks_by_sort_metric() {
        let request = GetProductPerformance::request(&input(json!({
            "period": "last_90_days",
            "sortBy": "ordered_item_quantity",
            "productType": "Men's Shirts",
            "limit": 25
        })))
        .unwrap();
        assert_snapshot!(
            query_of(&request),
            @r"FROM sales SHOW product_title, total_sales, net_sales, ordered_item_quantity, orders WHERE product_type = 'Men\'s Shirts' SINCE -90d GROUP BY product_title ORDER BY ordered_item_quantity DESC LIMIT 25"
        );
    }

    #[test]
    fn product_performance_defaults() {
        let output =
            GetProductPerformance::respond(input(json!({})), table_data()).unwrap();
        let output = serde_json::to_value(output).unwrap();
        assert_eq!(output["sortBy"], json!("total_sales"));
        assert_eq!(output["period"], json!("last_30_days"));
        assert_eq!(
            output["query"],
            json!("FROM sales SHOW product_title, total_sales, net_sales, ordered_item_quantity, orders SINCE -30d GROUP BY product_title ORDER BY total_sales DESC LIMIT 10")
        );
    }

    #[test]
    fn customer_analytics_by_customer_type() {
        let request = GetCustomerAnalytics::request(&input(json!({
            "period": "last_12_months",
            "groupBy": "customer_type"
        })))
        .unwrap();
        assert_snapshot!(
            query_of(&request),
            @"FROM sales SHOW customers, orders, total_sales, average_order_value SINCE -12m GROUP BY customer_type ORDER BY total_sales DESC LIMIT 50"
        );
    }
}
