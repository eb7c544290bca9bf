//! Product tools

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{default_limit, non_blank};
use crate::errors::ToolError;
use crate::graphql::Request;
use crate::operations::Executable;
use crate::types::{Connection, Image, Money, UserError, check_user_errors, global_id};

const GET_PRODUCTS: &str = r#"
query GetProducts($first: Int!, $query: String) {
  products(first: $first, query: $query) {
    edges {
      node {
        id
        title
        description
        handle
        status
        vendor
        productType
        tags
        totalInventory
        createdAt
        updatedAt
        priceRangeV2 {
          minVariantPrice { amount currencyCode }
          maxVariantPrice { amount currencyCode }
        }
        images(first: 1) {
          edges { node { url altText } }
        }
        variants(first: 5) {
          edges { node { id title price sku inventoryQuantity } }
        }
      }
    }
  }
}
"#;

const GET_PRODUCT_BY_ID: &str = r#"
query GetProductById($id: ID!) {
  product(id: $id) {
    id
    title
    description
    descriptionHtml
    handle
    status
    vendor
    productType
    tags
    totalInventory
    createdAt
    updatedAt
    onlineStoreUrl
    priceRangeV2 {
      minVariantPrice { amount currencyCode }
      maxVariantPrice { amount currencyCode }
    }
    images(first: 5) {
      edges { node { url altText } }
    }
    variants(first: 20) {
      edges {
        node {
          id
          title
          price
          sku
          barcode
          inventoryQuantity
          selectedOptions { name value }
        }
      }
    }
    collections(first: 5) {
      edges { node { id title handle } }
    }
  }
}
"#;

const CREATE_PRODUCT: &str = r#"
mutation CreateProduct($product: ProductCreateInput!) {
  productCreate(product: $product) {
    product {
      id
      title
      handle
      status
      vendor
      productType
      tags
      descriptionHtml
      createdAt
    }
    userErrors { field message }
  }
}
"#;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceRange {
    min_variant_price: Money,
    max_variant_price: Money,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PriceRangeOutput {
    min_price: Money,
    max_price: Money,
}

impl From<PriceRange> for PriceRangeOutput {
    fn from(range: PriceRange) -> Self {
        Self {
            min_price: range.min_variant_price,
            max_price: range.max_variant_price,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct Variant {
    id: String,
    title: String,
    price: Option<String>,
    sku: Option<String>,
    inventory_quantity: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductNode {
    id: String,
    title: String,
    description: Option<String>,
    handle: String,
    status: String,
    vendor: Option<String>,
    product_type: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    total_inventory: Option<i64>,
    created_at: Option<String>,
    updated_at: Option<String>,
    price_range_v2: Option<PriceRange>,
    #[serde(default)]
    images: Connection<Image>,
    #[serde(default)]
    variants: Connection<Variant>,
}

/// A product as listed by `get-products`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    id: String,
    title: String,
    description: Option<String>,
    handle: String,
    status: String,
    vendor: Option<String>,
    product_type: Option<String>,
    tags: Vec<String>,
    total_inventory: Option<i64>,
    created_at: Option<String>,
    updated_at: Option<String>,
    price_range: Option<PriceRangeOutput>,
    image_url: Option<String>,
    image_alt_text: Option<String>,
    variants: Vec<Variant>,
}

impl From<ProductNode> for ProductSummary {
    fn from(node: ProductNode) -> Self {
        let image = node.images.into_nodes().into_iter().next();
        let (image_url, image_alt_text) = match image {
            Some(image) => (Some(image.url), image.alt_text),
            None => (None, None),
        };

        Self {
            id: node.id,
            title: node.title,
            description: node.description,
            handle: node.handle,
            status: node.status,
            vendor: node.vendor,
            product_type: node.product_type,
            tags: node.tags,
            total_inventory: node.total_inventory,
            created_at: node.created_at,
            updated_at: node.updated_at,
            price_range: node.price_range_v2.map(Into::into),
            image_url,
            image_alt_text,
            variants: node.variants.into_nodes(),
        }
    }
}

pub struct GetProducts;

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetProductsInput {
    /// Only return products whose title contains this text
    search_title: Option<String>,

    /// Maximum number of products to return
    #[schemars(range(min = 1, max = 50))]
    #[serde(default = "default_limit")]
    limit: u32,
}

#[derive(Debug, Deserialize)]
pub struct ProductsData {
    products: Connection<ProductNode>,
}

#[derive(Debug, Serialize)]
pub struct ProductsOutput {
    products: Vec<ProductSummary>,
    count: usize,
}

impl Executable for GetProducts {
    type Input = GetProductsInput;
    type Data = ProductsData;
    type Output = ProductsOutput;

    const NAME: &'static str = "get-products";
    const DESCRIPTION: &'static str =
        "Get products from the store, optionally filtered by a search on the product title";
    const ACTION: &'static str = "fetch products";

    fn request(input: &Self::Input) -> Result<Request, ToolError> {
        let query = non_blank(input.search_title.as_deref()).map(|title| format!("title:*{title}*"));
        Ok(Request::new(
            GET_PRODUCTS,
            json!({ "first": input.limit, "query": query }),
        ))
    }

    fn respond(_input: Self::Input, data: Self::Data) -> Result<Self::Output, ToolError> {
        let products = data.products.map_nodes(ProductSummary::from);
        Ok(ProductsOutput {
            count: products.len(),
            products,
        })
    }
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct SelectedOption {
    name: String,
    value: String,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct VariantDetail {
    id: String,
    title: String,
    price: Option<String>,
    sku: Option<String>,
    barcode: Option<String>,
    inventory_quantity: Option<i64>,
    #[serde(default)]
    selected_options: Vec<SelectedOption>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct CollectionRef {
    id: String,
    title: String,
    handle: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductDetailNode {
    id: String,
    title: String,
    description: Option<String>,
    description_html: Option<String>,
    handle: String,
    status: String,
    vendor: Option<String>,
    product_type: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    total_inventory: Option<i64>,
    created_at: Option<String>,
    updated_at: Option<String>,
    online_store_url: Option<String>,
    price_range_v2: Option<PriceRange>,
    #[serde(default)]
    images: Connection<Image>,
    #[serde(default)]
    variants: Connection<VariantDetail>,
    #[serde(default)]
    collections: Connection<CollectionRef>,
}

/// A single product with its images, variants and collections
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    id: String,
    title: String,
    description: Option<String>,
    description_html: Option<String>,
    handle: String,
    status: String,
    vendor: Option<String>,
    product_type: Option<String>,
    tags: Vec<String>,
    total_inventory: Option<i64>,
    created_at: Option<String>,
    updated_at: Option<String>,
    online_store_url: Option<String>,
    price_range: Option<PriceRangeOutput>,
    images: Vec<Image>,
    variants: Vec<VariantDetail>,
    collections: Vec<CollectionRef>,
}

impl From<ProductDetailNode> for ProductDetail {
    fn from(node: ProductDetailNode) -> Self {
        Self {
            id: node.id,
            title: node.title,
            description: node.description,
            description_html: node.description_html,
            handle: node.handle,
            status: node.status,
            vendor: node.vendor,
            product_type: node.product_type,
            tags: node.tags,
            total_inventory: node.total_inventory,
            created_at: node.created_at,
            updated_at: node.updated_at,
            online_store_url: node.online_store_url,
            price_range: node.price_range_v2.map(Into::into),
            images: node.images.into_nodes(),
            variants: node.variants.into_nodes(),
            collections: node.collections.into_nodes(),
        }
    }
}

pub struct GetProductById;

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetProductByIdInput {
    /// Product ID, numeric or `gid://shopify/Product/<id>`
    product_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ProductData {
    product: Option<ProductDetailNode>,
}

#[derive(Debug, Serialize)]
pub struct ProductOutput<P> {
    product: P,
}

impl Executable for GetProductById {
    type Input = GetProductByIdInput;
    type Data = ProductData;
    type Output = ProductOutput<ProductDetail>;

    const NAME: &'static str = "get-product-by-id";
    const DESCRIPTION: &'static str =
        "Get a single product by ID, including its images, variants and collections";
    const ACTION: &'static str = "fetch product";

    fn request(input: &Self::Input) -> Result<Request, ToolError> {
        let id = global_id("Product", "productId", &input.product_id)?;
        Ok(Request::new(GET_PRODUCT_BY_ID, json!({ "id": id })))
    }

    fn respond(input: Self::Input, data: Self::Data) -> Result<Self::Output, ToolError> {
        match data.product {
            Some(product) => Ok(ProductOutput {
                product: product.into(),
            }),
            None => Err(ToolError::NotFound {
                kind: "Product",
                id: input.product_id,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProductStatus {
    Active,
    #[default]
    Draft,
    Archived,
}

pub struct CreateProduct;

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductInput {
    /// Product title
    #[schemars(length(min = 1))]
    title: String,

    /// Product description, as HTML
    description_html: Option<String>,

    vendor: Option<String>,

    product_type: Option<String>,

    tags: Option<Vec<String>>,

    /// Publication status; new products are drafts unless stated otherwise
    #[serde(default)]
    status: ProductStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProductCreate<'a> {
    title: &'a str,
    status: ProductStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    description_html: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    vendor: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    product_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<&'a [String]>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedProduct {
    id: String,
    title: String,
    handle: String,
    status: String,
    vendor: Option<String>,
    product_type: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    description_html: Option<String>,
    created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductData {
    product_create: CreateProductPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateProductPayload {
    product: Option<CreatedProduct>,
    #[serde(default)]
    user_errors: Vec<UserError>,
}

impl Executable for CreateProduct {
    type Input = CreateProductInput;
    type Data = CreateProductData;
    type Output = ProductOutput<CreatedProduct>;

    const NAME: &'static str = "create-product";
    const DESCRIPTION: &'static str = "Create a new product";
    const ACTION: &'static str = "create product";

    fn request(input: &Self::Input) -> Result<Request, ToolError> {
        if input.title.trim().is_empty() {
            return Err(ToolError::invalid_argument("title", "must not be blank"));
        }

        let product = ProductCreate {
            title: input.title.trim(),
            status: input.status,
            description_html: input.description_html.as_deref(),
            vendor: input.vendor.as_deref(),
            product_type: input.product_type.as_deref(),
            tags: input.tags.as_deref(),
        };

        Ok(Request::new(CREATE_PRODUCT, json!({ "product": product })))
    }

    fn respond(_input: Self::Input, data: Self::Data) -> Result<Self::Output, ToolError> {
        let payload = data.product_create;
        check_user_errors(&payload.user_errors)?;
        payload
            .product
            .map(|product| ProductOutput { product })
            .ok_or(ToolError::EmptyPayload("productCreate"))
    }
}
