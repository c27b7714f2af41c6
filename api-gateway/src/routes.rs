//! Quote REST handlers

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use greenquote_common::{AdminQuoteSummary, QuoteError, QuoteRequest, QuoteSummary, QuoteView};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    extract::AuthUser,
    AppState,
};

/// Success envelope wrapping every payload
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub success: bool,
    pub message: String,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self::with_status(StatusCode::OK, "OK", data)
    }

    pub fn created(data: T) -> Self {
        Self::with_status(StatusCode::CREATED, "Created", data)
    }

    fn with_status(status: StatusCode, message: &str, data: T) -> Self {
        Self {
            status: status.as_u16(),
            success: true,
            message: message.to_string(),
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": 200,
        "success": true,
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        "message": "ok",
    }))
}

pub async fn create_quote(
    State(state): State<AppState>,
    AuthUser(requester): AuthUser,
    body: Result<Json<QuoteRequest>, JsonRejection>,
) -> ApiResult<ApiResponse<QuoteView>> {
    let Json(request) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    request.validate().map_err(QuoteError::from)?;

    let view = state.quotes.create(&requester.id, request).await?;
    Ok(ApiResponse::created(view))
}

pub async fn get_quote(
    State(state): State<AppState>,
    AuthUser(requester): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<QuoteView>> {
    let id = Uuid::parse_str(&id).map_err(|_| ApiError::NotFound)?;

    state
        .quotes
        .get_by_id(&requester, id)
        .await?
        .map(ApiResponse::ok)
        .ok_or(ApiError::NotFound)
}

pub async fn list_my_quotes(
    State(state): State<AppState>,
    AuthUser(requester): AuthUser,
) -> ApiResult<ApiResponse<Vec<QuoteSummary>>> {
    let quotes = state.quotes.list_for_owner(&requester.id).await?;
    Ok(ApiResponse::ok(quotes))
}

pub async fn list_all_quotes(
    State(state): State<AppState>,
    AuthUser(requester): AuthUser,
    Query(params): Query<SearchParams>,
) -> ApiResult<ApiResponse<Vec<AdminQuoteSummary>>> {
    let quotes = state
        .quotes
        .list_all(&requester, params.q.as_deref())
        .await?;
    Ok(ApiResponse::ok(quotes))
}
