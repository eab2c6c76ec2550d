//! HTTP request handlers.

pub mod applications;
pub mod health;
pub mod scopes;

use serde::Deserialize;

pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Query parameters shared by the paged listings.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub cursor: Option<String>,
    pub page_size: Option<i64>,
}
