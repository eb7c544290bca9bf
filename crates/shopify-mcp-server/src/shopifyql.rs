//! ShopifyQL query construction
//!
//! Analytics tools describe their query with a [`ShopifyqlQuery`] and render it to text.
//! Clauses are always emitted in the order `FROM`, `SHOW`, `WHERE`, period, `GROUP BY`,
//! `ORDER BY`, `LIMIT`, and optional clauses that are absent are skipped entirely.
//!
//! Period and grouping tokens are mapped by total functions: an unknown token falls back to
//! the default clause instead of failing, so callers can pass loosely typed input through.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Clause used for an unknown period token
pub const DEFAULT_PERIOD_CLAUSE: &str = "SINCE -30d";

/// Named reporting periods
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub enum Period {
    #[serde(rename = "today")]
    Today,
    #[serde(rename = "yesterday")]
    Yesterday,
    #[serde(rename = "last_7_days")]
    Last7Days,
    #[default]
    #[serde(rename = "last_30_days")]
    Last30Days,
    #[serde(rename = "last_90_days")]
    Last90Days,
    #[serde(rename = "last_12_months")]
    Last12Months,
    #[serde(rename = "this_week")]
    ThisWeek,
    #[serde(rename = "this_month")]
    ThisMonth,
    #[serde(rename = "this_quarter")]
    ThisQuarter,
    #[serde(rename = "this_year")]
    ThisYear,
    #[serde(rename = "last_week")]
    LastWeek,
    #[serde(rename = "last_month")]
    LastMonth,
    #[serde(rename = "last_quarter")]
    LastQuarter,
    #[serde(rename = "last_year")]
    LastYear,
}

impl Period {
    pub const ALL: [Period; 14] = [
        Period::Today,
        Period::Yesterday,
        Period::Last7Days,
        Period::Last30Days,
        Period::Last90Days,
        Period::Last12Months,
        Period::ThisWeek,
        Period::ThisMonth,
        Period::ThisQuarter,
        Period::ThisYear,
        Period::LastWeek,
        Period::LastMonth,
        Period::LastQuarter,
        Period::LastYear,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Period::Today => "today",
            Period::Yesterday => "yesterday",
            Period::Last7Days => "last_7_days",
            Period::Last30Days => "last_30_days",
            Period::Last90Days => "last_90_days",
            Period::Last12Months => "last_12_months",
            Period::ThisWeek => "this_week",
            Period::ThisMonth => "this_month",
            Period::ThisQuarter => "this_quarter",
            Period::ThisYear => "this_year",
            Period::LastWeek => "last_week",
            Period::LastMonth => "last_month",
            Period::LastQuarter => "last_quarter",
            Period::LastYear => "last_year",
        }
    }

    /// Look up a period by its token
    pub fn from_token(token: &str) -> Option<Period> {
        Period::ALL.into_iter().find(|p| p.as_str() == token)
    }

    /// The `SINCE`/`DURING` clause for this period
    pub fn clause(self) -> &'static str {
        match self {
            Period::Today => "DURING today",
            Period::Yesterday => "DURING yesterday",
            Period::Last7Days => "SINCE -7d",
            Period::Last30Days => DEFAULT_PERIOD_CLAUSE,
            Period::Last90Days => "SINCE -90d",
            Period::Last12Months => "SINCE -12m",
            Period::ThisWeek => "DURING this_week",
            Period::ThisMonth => "DURING this_month",
            Period::ThisQuarter => "DURING this_quarter",
            Period::ThisYear => "DURING this_year",
            Period::LastWeek => "DURING last_week",
            Period::LastMonth => "DURING last_month",
            Period::LastQuarter => "DURING last_quarter",
            Period::LastYear => "DURING last_year",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dimensions a report can be grouped by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    Hour,
    #[default]
    Day,
    Week,
    Month,
    Quarter,
    Year,
    Product,
    ProductType,
    Vendor,
    Channel,
    CustomerType,
}

impl GroupBy {
    pub const ALL: [GroupBy; 11] = [
        GroupBy::Hour,
        GroupBy::Day,
        GroupBy::Week,
        GroupBy::Month,
        GroupBy::Quarter,
        GroupBy::Year,
        GroupBy::Product,
        GroupBy::ProductType,
        GroupBy::Vendor,
        GroupBy::Channel,
        GroupBy::CustomerType,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GroupBy::Hour => "hour",
            GroupBy::Day => "day",
            GroupBy::Week => "week",
            GroupBy::Month => "month",
            GroupBy::Quarter => "quarter",
            GroupBy::Year => "year",
            GroupBy::Product => "product",
            GroupBy::ProductType => "product_type",
            GroupBy::Vendor => "vendor",
            GroupBy::Channel => "channel",
            GroupBy::CustomerType => "customer_type",
        }
    }

    pub fn from_token(token: &str) -> Option<GroupBy> {
        GroupBy::ALL.into_iter().find(|g| g.as_str() == token)
    }

    /// The ShopifyQL column this dimension groups on
    pub fn column(self) -> &'static str {
        match self {
            GroupBy::Hour => "hour",
            GroupBy::Day => "day",
            GroupBy::Week => "week",
            GroupBy::Month => "month",
            GroupBy::Quarter => "quarter",
            GroupBy::Year => "year",
            GroupBy::Product => "product_title",
            GroupBy::ProductType => "product_type",
            GroupBy::Vendor => "product_vendor",
            GroupBy::Channel => "sales_channel",
            GroupBy::CustomerType => "customer_type",
        }
    }

    /// Time dimensions read chronologically, everything else by sales
    pub fn is_time(self) -> bool {
        matches!(
            self,
            GroupBy::Hour
                | GroupBy::Day
                | GroupBy::Week
                | GroupBy::Month
                | GroupBy::Quarter
                | GroupBy::Year
        )
    }

    pub fn group_by_clause(self) -> String {
        format!("GROUP BY {}", self.column())
    }

    pub fn order_by_clause(self) -> String {
        if self.is_time() {
            format!("ORDER BY {}", self.column())
        } else {
            "ORDER BY total_sales DESC".to_string()
        }
    }
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a period token to its clause, falling back to `SINCE -30d` for unknown tokens
pub fn period_to_shopifyql(period: &str) -> &'static str {
    Period::from_token(period).unwrap_or_default().clause()
}

/// Map a grouping token to its `GROUP BY` clause, falling back to `GROUP BY day`
pub fn group_by_to_shopifyql(group_by: &str) -> String {
    GroupBy::from_token(group_by)
        .unwrap_or_default()
        .group_by_clause()
}

/// Map a grouping token to its default `ORDER BY` clause, falling back to `ORDER BY day`
pub fn group_by_to_order_by(group_by: &str) -> String {
    GroupBy::from_token(group_by)
        .unwrap_or_default()
        .order_by_clause()
}

/// The parts of a ShopifyQL query.
///
/// Values are interpolated verbatim; use [`quote`] for any caller-supplied string literal.
#[derive(Debug, Clone, PartialEq, bon::Builder)]
#[builder(on(String, into))]
pub struct ShopifyqlQuery {
    /// Source table, e.g. `sales`
    pub from: String,

    /// Selected metrics and columns
    #[builder(with = |metrics: impl IntoIterator<Item = impl Into<String>>| {
        metrics.into_iter().map(Into::into).collect()
    })]
    pub show: Vec<String>,

    /// Filter expression without the `WHERE` keyword
    pub filter: Option<String>,

    /// Period token, see [`period_to_shopifyql`]
    #[builder(default = Period::default().as_str().to_string())]
    pub period: String,

    /// Grouping token, see [`group_by_to_shopifyql`]
    pub group_by: Option<String>,

    /// Ordering expression without the `ORDER BY` keywords
    pub order_by: Option<String>,

    pub limit: Option<u32>,
}

impl fmt::Display for ShopifyqlQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&build_shopifyql_query(self))
    }
}

/// Render a query, one clause after another in fixed order
pub fn build_shopifyql_query(query: &ShopifyqlQuery) -> String {
    let mut clauses = vec![
        format!("FROM {}", query.from),
        format!("SHOW {}", query.show.join(", ")),
    ];

    if let Some(filter) = &query.filter {
        clauses.push(format!("WHERE {filter}"));
    }

    clauses.push(period_to_shopifyql(&query.period).to_string());

    if let Some(group_by) = &query.group_by {
        clauses.push(group_by_to_shopifyql(group_by));
    }

    match (&query.order_by, &query.group_by) {
        (Some(order_by), _) => clauses.push(format!("ORDER BY {order_by}")),
        (None, Some(group_by)) => clauses.push(group_by_to_order_by(group_by)),
        (None, None) => {}
    }

    if let Some(limit) = query.limit {
        clauses.push(format!("LIMIT {limit}"));
    }

    clauses.join(" ")
}

/// Quote a string literal for interpolation into a ShopifyQL query
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}
