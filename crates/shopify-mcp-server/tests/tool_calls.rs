use mockito::Matcher;
use rmcp::model::{CallToolResult, ErrorCode, JsonObject, RawContent};
use secrecy::SecretString;
use serde_json::{Value, json};
use shopify_mcp_server::graphql::ShopifyClient;
use shopify_mcp_server::operations::Toolbox;
use shopify_mcp_server::tools;

fn toolbox(server: &mockito::Server) -> Toolbox {
    let client = ShopifyClient::builder()
        .endpoint(server.url().parse().unwrap())
        .access_token(SecretString::from("shpat_integration"))
        .build()
        .unwrap();
    tools::catalog(&client).unwrap()
}

fn arguments(value: Value) -> Option<JsonObject> {
    value.as_object().cloned()
}

fn text(result: &CallToolResult) -> &str {
    match &result.content.first().unwrap().raw {
        RawContent::Text(text) => &text.text,
        _ => panic!("expected text content"),
    }
}

#[tokio::test]
async fn lists_the_full_catalog() {
    let server = mockito::Server::new_async().await;
    let mut names: Vec<String> = toolbox(&server)
        .tools()
        .into_iter()
        .map(|tool| tool.name.to_string())
        .collect();
    names.sort();

    insta::assert_debug_snapshot!(names, @r#"
    [
        "create-product",
        "get-collections",
        "get-customer-analytics",
        "get-customer-orders",
        "get-customers",
        "get-inventory-levels",
        "get-locations",
        "get-order-by-id",
        "get-orders",
        "get-product-by-id",
        "get-product-performance",
        "get-products",
        "get-sales-report",
        "run-shopifyql-query",
        "search-orders",
        "update-customer",
        "update-order",
    ]
    "#);
}

#[tokio::test]
async fn fetches_products_with_the_access_token() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .match_header("x-shopify-access-token", "shpat_integration")
        .match_body(Matcher::PartialJson(json!({
            "variables": {"first": 2, "query": "title:*shirt*"}
        })))
        .with_body(
            json!({"data": {"products": {"edges": [{"node": {
                "id": "gid://shopify/Product/1",
                "title": "Blue shirt",
                "description": "Cotton",
                "handle": "blue-shirt",
                "status": "ACTIVE",
                "vendor": "Acme",
                "productType": "Shirts",
                "tags": ["summer"],
                "totalInventory": 7,
                "createdAt": "2025-01-01T00:00:00Z",
                "updatedAt": "2025-01-02T00:00:00Z",
                "priceRangeV2": {
                    "minVariantPrice": {"amount": "10.0", "currencyCode": "USD"},
                    "maxVariantPrice": {"amount": "12.0", "currencyCode": "USD"}
                },
                "images": {"edges": []},
                "variants": {"edges": []}
            }}]}}})
            .to_string(),
        )
        .create_async()
        .await;

    let result = toolbox(&server)
        .call(
            "get-products",
            arguments(json!({"searchTitle": "shirt", "limit": 2})),
        )
        .await
        .unwrap();

    mock.assert_async().await;
    assert_ne!(result.is_error, Some(true));
    let output: Value = serde_json::from_str(text(&result)).unwrap();
    assert_eq!(output["count"], json!(1));
    assert_eq!(output["products"][0]["title"], json!("Blue shirt"));
    assert_eq!(
        output["products"][0]["priceRange"]["minPrice"]["amount"],
        json!("10.0")
    );
}

#[tokio::test]
async fn invalid_arguments_never_reach_the_store() {
    let mut server = mockito::Server::new_async().await;
    let mock = server.mock("POST", "/").expect(0).create_async().await;
    let toolbox = toolbox(&server);

    let calls = [
        ("get-products", json!({"limit": 0})),
        ("get-orders", json!({"limit": "ten"})),
        ("get-order-by-id", json!({})),
        ("get-order-by-id", json!({"orderId": "not-an-id"})),
        ("get-order-by-id", json!({"orderId": "gid://shopify/Product/9"})),
        ("get-customer-orders", json!({"customerId": "gid://shopify/Order/7"})),
        ("get-orders", json!({"limit": 5.5})),
        ("get-sales-report", json!({"period": "last_decade"})),
        ("get-sales-report", json!({"metrics": ["total_sales; DROP"]})),
        ("run-shopifyql-query", json!({"query": "   "})),
    ];

    for (tool, args) in calls {
        let error = toolbox.call(tool, arguments(args.clone())).await.unwrap_err();
        assert_eq!(error.code, ErrorCode::INVALID_PARAMS, "{tool} {args}");
    }

    mock.assert_async().await;
}

#[tokio::test]
async fn unknown_tools_are_not_found() {
    let server = mockito::Server::new_async().await;
    let error = toolbox(&server)
        .call("delete-store", None)
        .await
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::METHOD_NOT_FOUND);
    assert_eq!(error.message, "Tool delete-store not found");
}

#[tokio::test]
async fn builds_sales_reports_from_shopifyql() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({
            "variables": {
                "query": "FROM sales SHOW total_sales, orders SINCE -7d GROUP BY day ORDER BY day LIMIT 50"
            }
        })))
        .with_body(
            json!({"data": {"shopifyqlQuery": {
                "tableData": {
                    "columns": [
                        {"name": "day", "dataType": "DAY_TIMESTAMP", "displayName": "Day"},
                        {"name": "total_sales", "dataType": "MONEY", "displayName": "Total sales"},
                        {"name": "orders", "dataType": "INTEGER", "displayName": "Orders"}
                    ],
                    "rows": [["2025-06-01", "120.00", 3]]
                },
                "parseErrors": []
            }}})
            .to_string(),
        )
        .create_async()
        .await;

    let result = toolbox(&server)
        .call(
            "get-sales-report",
            arguments(json!({
                "period": "last_7_days",
                "groupBy": "day",
                "metrics": ["total_sales", "orders"]
            })),
        )
        .await
        .unwrap();

    assert_ne!(result.is_error, Some(true));
    let output: Value = serde_json::from_str(text(&result)).unwrap();
    assert_eq!(output["rowCount"], json!(1));
    assert_eq!(
        output["rows"][0],
        json!({"day": "2025-06-01", "total_sales": "120.00", "orders": 3})
    );
}

#[tokio::test]
async fn shopifyql_parse_errors_are_tool_errors() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/")
        .with_body(
            json!({"data": {"shopifyqlQuery": {
                "tableData": null,
                "parseErrors": ["Unknown column 'revenue'"]
            }}})
            .to_string(),
        )
        .create_async()
        .await;

    let result = toolbox(&server)
        .call(
            "run-shopifyql-query",
            arguments(json!({"query": "FROM sales SHOW revenue"})),
        )
        .await
        .unwrap();

    assert_eq!(result.is_error, Some(true));
    assert!(
        text(&result).contains("ShopifyQL parse errors: Unknown column 'revenue'"),
        "{}",
        text(&result)
    );
}

#[tokio::test]
async fn http_failures_become_tool_errors() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/")
        .with_status(429)
        .with_header("Retry-After", "4")
        .create_async()
        .await;

    let result = toolbox(&server)
        .call("get-locations", None)
        .await
        .unwrap();

    assert_eq!(result.is_error, Some(true));
    assert!(text(&result).contains("Rate limited, retry after 4 seconds"));
}

#[tokio::test]
async fn whole_number_limits_are_accepted() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({
            "variables": {"first": 5, "query": "status:any"}
        })))
        .with_body(json!({"data": {"orders": {"edges": []}}}).to_string())
        .create_async()
        .await;

    let result = toolbox(&server)
        .call("get-orders", arguments(json!({"limit": 5.0})))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_ne!(result.is_error, Some(true));
    let output: Value = serde_json::from_str(text(&result)).unwrap();
    assert_eq!(output, json!({"orders": [], "count": 0}));
}
