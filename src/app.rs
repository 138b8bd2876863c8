//! HTTP API.

use crate::app_state::{AppState, SharedAppState};
use crate::cli::CommandLineArgs;
use crate::error::FilterError;
use crate::metrics;
use crate::models::{
    EmissionsData, FilterOptions, FilterQuery, Metadata, QueryValueRequest, QueryValueResponse,
};
use crate::selection::next_query_value;
use crate::selectors::Derivation;
use crate::validated_json::ValidatedJson;

use axum::{
    body::{Body, BoxBody},
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use std::sync::Arc;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::trace::TraceLayer;

/// Service that serves the HTTP API
pub type Service = NormalizePath<Router>;

/// Returns a [Router] serving the HTTP API over `state`.
pub fn router(state: SharedAppState) -> Router {
    fn v1() -> Router<SharedAppState> {
        Router::new()
            .route("/filters", get(filters))
            .route("/options", get(options))
            .route("/metadata", put(upload_metadata))
            .route("/emissions", put(upload_emissions))
            .route("/query-value", post(query_value))
    }

    Router::new()
        .route("/.well-known/emission-filters-schema", get(schema))
        .route("/metrics", get(metrics::metrics_handler))
        .nest("/v1", v1())
        .layer(
            TraceLayer::new_for_http()
                .on_request(metrics::request_counter::<Body>)
                .on_response(metrics::record_response_metrics::<BoxBody>),
        )
        .with_state(state)
}

/// Returns a [Service] for the HTTP API.
///
/// Loads the initial data snapshot named in `args`.
pub fn service(args: &CommandLineArgs) -> Result<Service, FilterError> {
    let state = Arc::new(AppState::new(args)?);
    Ok(NormalizePathLayer::trim_trailing_slash().layer(router(state)))
}

async fn schema() -> &'static str {
    "emission-filters"
}

/// Derive the full filter state of the query string.
async fn filters(
    State(state): State<SharedAppState>,
    query: Result<Query<FilterQuery>, QueryRejection>,
) -> Result<Json<Derivation>, FilterError> {
    let Query(query) = query?;
    Ok(Json(state.derive(query)?))
}

/// Derive only the option lists of the query string.
async fn options(
    State(state): State<SharedAppState>,
    query: Result<Query<FilterQuery>, QueryRejection>,
) -> Result<Json<Arc<FilterOptions>>, FilterError> {
    let Query(query) = query?;
    Ok(Json(state.derive(query)?.options))
}

async fn upload_metadata(
    State(state): State<SharedAppState>,
    ValidatedJson(metadata): ValidatedJson<Metadata>,
) -> Result<StatusCode, FilterError> {
    state.set_metadata(metadata)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn upload_emissions(
    State(state): State<SharedAppState>,
    ValidatedJson(emissions): ValidatedJson<EmissionsData>,
) -> Result<StatusCode, FilterError> {
    state.set_emissions(emissions)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Compute the next query value of a multi-select field from the picked options.
async fn query_value(
    ValidatedJson(request): ValidatedJson<QueryValueRequest>,
) -> Json<QueryValueResponse> {
    Json(QueryValueResponse {
        value: next_query_value(&request.picked),
    })
}
