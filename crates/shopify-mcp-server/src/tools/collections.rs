//! Collection tools

use schemars::JsonSchema;
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{default_limit, non_blank};
use crate::errors::ToolError;
use crate::graphql::Request;
use crate::operations::Executable;
use crate::types::{Connection, Image};

const GET_COLLECTIONS: &str = r#"
query GetCollections($first: Int!, $query: String) {
  collections(first: $first, query: $query) {
    edges {
      node {
        id
        title
        handle
        description
        sortOrder
        updatedAt
        productsCount { count }
        image { url altText }
        ruleSet { appliedDisjunctively }
      }
    }
  }
}
"#;

#[derive(Debug, Deserialize)]
struct Count {
    count: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CollectionNode {
    id: String,
    title: String,
    handle: String,
    description: Option<String>,
    sort_order: Option<String>,
    updated_at: Option<String>,
    products_count: Option<Count>,
    image: Option<Image>,
    rule_set: Option<IgnoredAny>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    id: String,
    title: String,
    handle: String,
    description: Option<String>,
    sort_order: Option<String>,
    updated_at: Option<String>,
    products_count: Option<u64>,
    image: Option<Image>,
    /// Smart collections are populated by rules, custom ones by hand
    smart: bool,
}

impl From<CollectionNode> for Collection {
    fn from(node: CollectionNode) -> Self {
        Self {
            id: node.id,
            title: node.title,
            handle: node.handle,
            description: node.description,
            sort_order: node.sort_order,
            updated_at: node.updated_at,
            products_count: node.products_count.map(|c| c.count),
            image: node.image,
            smart: node.rule_set.is_some(),
        }
    }
}

pub struct GetCollections;

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetCollectionsInput {
    /// Collection search query, e.g. `title:summer`
    query: Option<String>,

    /// Maximum number of collections to return
    #[schemars(range(min = 1, max = 50))]
    #[serde(default = "default_limit")]
    limit: u32,
}

#[derive(Debug, Deserialize)]
pub struct CollectionsData {
    collections: Connection<CollectionNode>,
}

#[derive(Debug, Serialize)]
pub struct CollectionsOutput {
    collections: Vec<Collection>,
    count: usize,
}

impl Executable for GetCollections {
    type Input = GetCollectionsInput;
    type Data = CollectionsData;
    type Output = CollectionsOutput;

    const NAME: &'static str = "get-collections";
    const DESCRIPTION: &'static str = "Get product collections, optionally filtered by a search query";
    const ACTION: &'static str = "fetch collections";

    fn request(input: &Self::Input) -> Result<Request, ToolError> {
        Ok(Request::new(
            GET_COLLECTIONS,
            json!({
                "first": input.limit,
                "query": non_blank(input.query.as_deref()),
            }),
        ))
    }

    fn respond(_input: Self::Input, data: Self::Data) -> Result<Self::Output, ToolError> {
        let collections = data.collections.map_nodes(Collection::from);
        Ok(CollectionsOutput {
            count: collections.len(),
            collections,
        })
    }
}
