use axum::{
    extract::{Query, State},
    Extension, Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tradecat_catalog::ProductOrder;
use tradecat_core::{AvailabilityState, Product};

use crate::middleware::RequestId;

use super::{map_catalog_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct ProductItem {
    sku: String,
    name: String,
    price: Option<Decimal>,
    handle: Option<String>,
    merchandise_id: Option<String>,
    requires_quote: Option<bool>,
    discontinued: Option<bool>,
    availability: AvailabilityState,
    can_add_to_cart: bool,
}

impl From<Product> for ProductItem {
    fn from(product: Product) -> Self {
        let availability = product.availability();
        Self {
            can_add_to_cart: tradecat_core::can_add_to_cart(availability),
            availability,
            sku: product.sku,
            name: product.name,
            price: product.price,
            handle: product.handle,
            merchandise_id: product.merchandise_id,
            requires_quote: product.requires_quote,
            discontinued: product.discontinued,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ProductQuery {
    pub order: Option<String>,
}

pub(super) async fn list_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<ApiResponse<Vec<ProductItem>>>, ApiError> {
    let order = match query.order.as_deref() {
        None | Some("") => ProductOrder::default(),
        Some(raw) => raw
            .parse::<ProductOrder>()
            .map_err(|msg| ApiError::new(req_id.0.clone(), "validation_error", msg))?,
    };

    let products = state
        .reconciler
        .get_products_ordered(order)
        .await
        .map_err(|e| map_catalog_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: products.into_iter().map(ProductItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}
