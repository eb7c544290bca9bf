//! Response shapes shared by several tools, and the flattening helpers that go with them

use serde::{Deserialize, Serialize};

use crate::errors::ToolError;

/// A paginated list in the remote API
#[derive(Debug, Deserialize)]
pub(crate) struct Connection<T> {
    #[serde(default = "Vec::new")]
    pub(crate) edges: Vec<Edge<T>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Edge<T> {
    pub(crate) node: T,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self { edges: Vec::new() }
    }
}

impl<T> Connection<T> {
    /// Drop the edge wrappers, keeping the nodes in order
    pub(crate) fn into_nodes(self) -> Vec<T> {
        self.edges.into_iter().map(|edge| edge.node).collect()
    }

    /// Drop the edge wrappers and convert each node
    pub(crate) fn map_nodes<U>(self, f: impl FnMut(T) -> U) -> Vec<U> {
        self.edges.into_iter().map(|edge| edge.node).map(f).collect()
    }
}

/// Deserialize a possibly-null connection as an empty one
pub(crate) fn nullable_connection<'de, D, T>(deserializer: D) -> Result<Connection<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Connection<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A monetary value as reported by the API
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    pub amount: String,
    pub currency_code: String,
}

/// A monetary value expressed in shop and presentment currencies
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MoneyBag {
    pub(crate) shop_money: Money,
}

/// Flatten an optional money bag into its shop currency amount
pub(crate) fn shop_money(bag: Option<MoneyBag>) -> Option<Money> {
    bag.map(|bag| bag.shop_money)
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Image {
    pub(crate) url: String,
    pub(crate) alt_text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MailingAddress {
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub company: Option<String>,
    pub province: Option<String>,
    pub province_code: Option<String>,
    pub country: Option<String>,
    pub country_code_v2: Option<String>,
    pub zip: Option<String>,
    pub phone: Option<String>,
}

/// A validation error returned by a mutation
#[derive(Debug, Deserialize)]
pub(crate) struct UserError {
    #[serde(default)]
    pub(crate) field: Option<Vec<String>>,
    pub(crate) message: String,
}

/// Fail with every reported user error joined together, if there are any
pub(crate) fn check_user_errors(errors: &[UserError]) -> Result<(), ToolError> {
    if errors.is_empty() {
        return Ok(());
    }

    Err(ToolError::UserErrors(
        errors
            .iter()
            .map(|error| match &error.field {
                Some(field) if !field.is_empty() => {
                    format!("{}: {}", field.join("."), error.message)
                }
                _ => error.message.clone(),
            })
            .collect::<Vec<_>>()
            .join("; "),
    ))
}

/// Normalize an id argument to a global id (`gid://shopify/<kind>/<n>`).
///
/// Bare ids must be numeric; global ids must name `kind`.
pub(crate) fn global_id(kind: &str, field: &str, id: &str) -> Result<String, ToolError> {
    numeric_id(kind, field, id).map(|id| format!("gid://shopify/{kind}/{id}"))
}

/// Extract the numeric tail of an id argument, for use in search filters
pub(crate) fn numeric_id<'a>(kind: &str, field: &str, id: &'a str) -> Result<&'a str, ToolError> {
    let id = id.trim();
    let tail = match id.strip_prefix("gid://") {
        Some(path) => path
            .strip_prefix("shopify/")
            .and_then(|path| path.strip_prefix(kind))
            .and_then(|path| path.strip_prefix('/')),
        None => Some(id),
    };

    match tail {
        Some(tail) if !tail.is_empty() && tail.chars().all(|c| c.is_ascii_digit()) => Ok(tail),
        _ => Err(ToolError::invalid_argument(
            field,
            format!("expected a numeric ID or a gid://shopify/{kind}/ ID, got \"{id}\""),
        )),
    }
}
