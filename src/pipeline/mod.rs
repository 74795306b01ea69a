//! Request pipeline stages.
//!
//! Every request passes, in order: [`log_request`], the tower-http trace
//! layer, the guards in [`guards`] (declared as extractors, so their order in
//! a handler signature is their execution order), the handler, and finally
//! [`crate::error::AppError`]'s `IntoResponse` impl for anything forwarded as
//! an error.

pub mod guards;

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use tracing::info;

use crate::error::AppError;

/// What a stage decided.
#[derive(Debug)]
pub enum Flow<T = ()> {
    /// Hand `T` to the next stage.
    Continue(T),
    /// Stop here with a finished response.
    Respond(Response),
    /// Stop here and let the error stage render the failure.
    Fail(AppError),
}

impl<T> Flow<T> {
    pub fn and_then<U, F>(self, next: F) -> Flow<U>
    where
        F: FnOnce(T) -> Flow<U>,
    {
        match self {
            Flow::Continue(value) => next(value),
            Flow::Respond(resp) => Flow::Respond(resp),
            Flow::Fail(err) => Flow::Fail(err),
        }
    }

    /// Collapses a short-circuit into the response axum should send.
    pub fn into_result(self) -> Result<T, Response> {
        match self {
            Flow::Continue(value) => Ok(value),
            Flow::Respond(resp) => Err(resp),
            Flow::Fail(err) => Err(err.into_response()),
        }
    }
}

/// Logs method, URI and a UTC timestamp, then always forwards.
pub async fn log_request(req: Request, next: Next) -> Response {
    info!(
        method = %req.method(),
        uri = %req.uri(),
        timestamp = %Utc::now().to_rfc3339(),
        "Incoming request"
    );
    next.run(req).await
}
