use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Request},
    http::{request::Parts, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{Map, Value};
use tracing::debug;

use crate::{error::AppError, models::NewProduct, pipeline::Flow, AppState};

pub const API_KEY_HEADER: &str = "x-api-key";

// ── Auth ──────────────────────────────────────────────────────────────────────

/// Passes only when the `x-api-key` header equals the configured secret.
/// With no secret configured nothing passes.
pub fn check_api_key(headers: &HeaderMap, expected: Option<&str>) -> Flow {
    let presented = headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok());
    match (presented, expected) {
        (Some(presented), Some(expected)) if presented == expected => Flow::Continue(()),
        _ => {
            debug!(has_header = presented.is_some(), "Rejected API key");
            Flow::Respond(AppError::Unauthorized.into_response())
        }
    }
}

/// Extractor form of [`check_api_key`] for routes without a body.
#[derive(Debug, Clone, Copy)]
pub struct RequireApiKey;

#[async_trait]
impl FromRequestParts<AppState> for RequireApiKey {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Response> {
        check_api_key(&parts.headers, state.config.api_key.as_deref())
            .into_result()
            .map(|()| RequireApiKey)
    }
}

// ── Body parsing + validation ─────────────────────────────────────────────────

/// Decodes the body as JSON. A request without a JSON content type carries no
/// parsed body, so it reaches the later stages as an empty object.
pub async fn parse_body(req: Request, state: &AppState) -> Flow<Value> {
    match Json::<Value>::from_request(req, state).await {
        Ok(Json(body)) => Flow::Continue(body),
        Err(JsonRejection::MissingJsonContentType(_)) => {
            Flow::Continue(Value::Object(Map::new()))
        }
        Err(rejection) => Flow::Fail(AppError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }),
    }
}

pub fn check_product_fields(body: Value) -> Flow<NewProduct> {
    match NewProduct::from_body(body) {
        Ok(fields) => Flow::Continue(fields),
        Err(err) => Flow::Respond(err.into_response()),
    }
}

/// Runs body parse, API-key check and field check, in that order, for routes
/// that write a product.
#[derive(Debug)]
pub struct ValidProduct(pub NewProduct);

#[async_trait]
impl FromRequest<AppState> for ValidProduct {
    type Rejection = Response;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Response> {
        let headers = req.headers().clone();
        parse_body(req, state)
            .await
            .and_then(|body| {
                check_api_key(&headers, state.config.api_key.as_deref())
                    .and_then(|()| Flow::Continue(body))
            })
            .and_then(check_product_fields)
            .into_result()
            .map(ValidProduct)
    }
}
