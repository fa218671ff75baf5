use axum::{
    extract::{Path, State},
    http::{header, HeaderName},
    response::{IntoResponse, Response},
    Extension, Json,
};

use crate::middleware::RequestId;

use super::{map_catalog_error, ApiError, AppState};

pub(super) const X_CACHE_STATUS: &str = "x-cache-status";

/// Serves the raw navigation index (no envelope) with `Cache-Control` derived
/// from the origin cache policy, so shared caches expire in step with it.
pub(super) async fn get_navigation(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(menu_key): Path<String>,
) -> Result<Response, ApiError> {
    let lookup = state
        .navigation
        .get_navigation_index(&menu_key)
        .await
        .map_err(|e| map_catalog_error(req_id.0.clone(), &e))?;

    let cache_control = state
        .navigation
        .policy()
        .cache_control(state.client_max_age);

    Ok((
        [
            (header::CACHE_CONTROL, cache_control),
            (
                HeaderName::from_static(X_CACHE_STATUS),
                lookup.status.as_str().to_owned(),
            ),
        ],
        Json(lookup.value.as_ref()),
    )
        .into_response())
}
