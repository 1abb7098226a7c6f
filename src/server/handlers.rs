//! HTTP request handlers
//!
//! Every handler logs the full error server-side and answers with a generic
//! message.

use crate::{
    error::{format_error, public_message},
    server::app::AppState,
    types::{
        CatalogId, CatalogResponse, CookieStatusResponse, ErrorResponse, FetchCookieResponse,
        FetchTokenResponse, LookupQuery, MarkResponse, PingResponse, RefreshResponse,
    },
    utils::version,
};
use axum::{
    Json,
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorResponse::new(message))).into_response()
}

fn internal_error(error: &crate::Error, context: &str) -> Response {
    tracing::error!("Failed to {}: {}", context, format_error(error));
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        public_message(error, context),
    )
}

/// Ping endpoint for health checks
///
/// GET /api/ping
pub async fn ping(State(state): State<AppState>) -> Json<PingResponse> {
    let uptime = state.start_time.elapsed().as_secs();
    let message = std::env::var("PING_MESSAGE").unwrap_or_else(|_| "ping".to_string());

    tracing::debug!("Ping response: uptime={}s", uptime);
    Json(PingResponse::new(message, uptime, version::get_version()))
}

/// GET /api/fetch-cookie
pub async fn fetch_cookie(State(state): State<AppState>) -> Response {
    match state.credentials.get_credential().await {
        Ok(credential) => {
            (StatusCode::OK, Json(FetchCookieResponse::new(credential.value))).into_response()
        }
        Err(e) => internal_error(&e, "fetch cookie"),
    }
}

/// GET /api/cookie-status
///
/// `cached` reports whether a fresh credential was already held before the
/// lookup; `hasCookie` whether one is available after it.
pub async fn cookie_status(State(state): State<AppState>) -> Json<CookieStatusResponse> {
    let cached = state.credentials.peek().await.is_some();
    let has_cookie = match state.credentials.get_credential().await {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!("Cookie status check failed: {}", format_error(&e));
            false
        }
    };

    Json(CookieStatusResponse::new(has_cookie, cached))
}

/// GET /api/fetch-token
pub async fn fetch_token(State(state): State<AppState>) -> Response {
    match state.tokens.get_token().await {
        Ok(token) => (StatusCode::OK, Json(FetchTokenResponse::new(token.value))).into_response(),
        Err(e) => internal_error(&e, "fetch token"),
    }
}

/// Clear the credential and token caches
///
/// POST /api/invalidate-caches
pub async fn invalidate_caches(State(state): State<AppState>) -> StatusCode {
    tracing::info!("Invalidating credential and token caches");
    state.tokens.invalidate().await;
    state.credentials.invalidate().await;
    StatusCode::NO_CONTENT
}

/// GET /api/<catalog>
pub async fn read_catalog(state: AppState, catalog: CatalogId) -> Response {
    match state.catalogs.read(catalog).await {
        Ok(contents) => (StatusCode::OK, Json(CatalogResponse::from(contents))).into_response(),
        Err(e) => internal_error(&e, &format!("read {catalog}")),
    }
}

/// POST /api/<catalog>/refresh
pub async fn refresh_catalog(state: AppState, catalog: CatalogId) -> Response {
    match state.catalogs.refresh(catalog).await {
        Ok(outcome) => (StatusCode::OK, Json(RefreshResponse::from(outcome))).into_response(),
        Err(e) => internal_error(&e, &format!("refresh {catalog}")),
    }
}

/// POST /api/<catalog>/mark
///
/// Body `{ids: string[]}`. A missing or unparseable body marks nothing;
/// an `ids` value that is not an array is rejected.
pub async fn mark_catalog(state: AppState, catalog: CatalogId, body: Bytes) -> Response {
    let ids = match parse_mark_ids(&body) {
        Ok(ids) => ids,
        Err(e) => {
            tracing::debug!("Rejected mark body for {}: {}", catalog, e);
            return error_response(StatusCode::BAD_REQUEST, public_message(&e, "mark"));
        }
    };

    match state.catalogs.mark(catalog, &ids).await {
        Ok(contents) => (StatusCode::OK, Json(MarkResponse::new(contents.items))).into_response(),
        Err(e) => internal_error(&e, &format!("mark {catalog}")),
    }
}

/// Extract the id list of a mark body
fn parse_mark_ids(body: &[u8]) -> crate::Result<Vec<String>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    let ids = match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(mut fields)) => fields.remove("ids").unwrap_or(Value::Null),
        Ok(_) => Value::Null,
        Err(e) => {
            tracing::warn!(
                "Unparseable mark body ({}): {}",
                e,
                String::from_utf8_lossy(body)
            );
            Value::Null
        }
    };

    match ids {
        Value::Null => Ok(Vec::new()),
        Value::Array(entries) => Ok(entries
            .into_iter()
            .filter_map(|entry| match entry {
                Value::String(id) => Some(id),
                _ => None,
            })
            .collect()),
        _ => Err(crate::Error::validation("ids", "ids array required")),
    }
}

fn lookup_error(error: &crate::Error, service: &str) -> Response {
    match error {
        crate::Error::NotFound { what } => {
            (StatusCode::NOT_FOUND, Json(json!({ "error": what }))).into_response()
        }
        crate::Error::InvalidJsonResponse { .. } => {
            tracing::error!("{} lookup failed: {}", service, format_error(error));
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Invalid JSON response from API" })),
            )
                .into_response()
        }
        _ => {
            tracing::error!("{} lookup failed: {}", service, format_error(error));
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to fetch data. Please try again." })),
            )
                .into_response()
        }
    }
}

fn missing_id() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "Missing or invalid ID" })),
    )
        .into_response()
}

/// GET /api/netflix?id=
pub async fn netflix_details(
    State(state): State<AppState>,
    Query(query): Query<LookupQuery>,
) -> Response {
    let Some(id) = query.id() else {
        return missing_id();
    };

    tracing::info!("Fetching Netflix data for ID: {}", id);
    match state.metadata.netflix(id).await {
        Ok(details) => (StatusCode::OK, Json(details)).into_response(),
        Err(e) => lookup_error(&e, "Netflix"),
    }
}

/// GET /api/amazon-prime?id=
pub async fn amazon_prime_details(
    State(state): State<AppState>,
    Query(query): Query<LookupQuery>,
) -> Response {
    let Some(id) = query.id() else {
        return missing_id();
    };

    tracing::info!("Fetching Amazon Prime data for ID: {}", id);
    match state.metadata.amazon_prime(id).await {
        Ok(details) => (StatusCode::OK, Json(details)).into_response(),
        Err(e) => lookup_error(&e, "Amazon Prime"),
    }
}
