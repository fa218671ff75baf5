//! GraphQL wire types for the commerce platform's variant lookup.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct GraphQlRequest<'a> {
    pub query: &'static str,
    pub variables: LookupVariables<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct LookupVariables<'a> {
    pub first: usize,
    pub query: &'a str,
    pub after: Option<&'a str>,
}

/// Standard GraphQL envelope. `data` may be absent or null when `errors` is set.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct GraphQlResponse<T> {
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(default)]
    pub extensions: Option<GraphQlErrorExtensions>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlErrorExtensions {
    #[serde(default)]
    pub code: Option<String>,
}

impl GraphQlError {
    #[must_use]
    pub fn is_throttled(&self) -> bool {
        self.extensions
            .as_ref()
            .and_then(|e| e.code.as_deref())
            .is_some_and(|code| code == "THROTTLED")
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariantsData {
    pub product_variants: VariantConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantConnection {
    #[serde(default)]
    pub nodes: Vec<VariantNode>,
    #[serde(default)]
    pub page_info: PageInfo,
}

/// Several variants can share a SKU, so a full batch may spill past one
/// page of results.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub has_next_page: bool,
    #[serde(default)]
    pub end_cursor: Option<String>,
}

/// One matching variant. `id` is the merchandise ID (a `gid://` string).
#[derive(Debug, Deserialize)]
pub struct VariantNode {
    pub id: String,
    #[serde(default)]
    pub sku: Option<String>,
}
