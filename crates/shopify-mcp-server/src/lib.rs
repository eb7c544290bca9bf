#![cfg_attr(
    not(test),
    deny(
        clippy::exit,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::indexing_slicing,
    )
)]

pub mod errors;
pub mod graphql;
pub(crate) mod json_schema;
pub mod operations;
pub mod server;
pub mod server_info;
pub mod shopifyql;
pub mod tools;
pub(crate) mod types;
