//! GraphQL document and search-string construction for SKU lookups.

pub(crate) const PRODUCT_VARIANTS_QUERY: &str = "\
query MerchandiseBySku($first: Int!, $query: String!, $after: String) {
  productVariants(first: $first, query: $query, after: $after) {
    nodes { id sku }
    pageInfo { hasNextPage endCursor }
  }
}";

fn escape(sku: &str) -> String {
    sku.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Builds the platform search string `sku:"A" OR sku:"B"` for one batch.
pub(crate) fn sku_search_query(skus: &[String]) -> String {
    skus.iter()
        .map(|sku| format!("sku:\"{}\"", escape(sku)))
        .collect::<Vec<_>>()
        .join(" OR ")
}
