// --- File: crates/vetclinic_common/src/http.rs ---
use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use once_cell::sync::OnceCell;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use tracing::{error, warn};
use vetclinic_config::DeploymentMode;

use crate::error::{validation_error, HttpStatusCode, VetClinicError};
use crate::pagination::PaginationMeta;

// Include the client module
pub mod client;

static ERROR_DETAIL_MODE: OnceCell<DeploymentMode> = OnceCell::new();

/// Fixes how much detail 5xx bodies carry for the rest of the process.
///
/// Only the first call has an effect. Until it is called the production
/// behaviour applies.
pub fn init_error_mode(mode: DeploymentMode) {
    if ERROR_DETAIL_MODE.set(mode).is_err() {
        warn!("Error detail mode already initialised, ignoring {:?}", mode);
    }
}

fn exposes_internal_errors() -> bool {
    ERROR_DETAIL_MODE
        .get()
        .copied()
        .unwrap_or_default()
        .exposes_internal_errors()
}

/// Success envelope: `{"success": true, "data": ...}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// List envelope: the success envelope plus `pagination`.
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, pagination: PaginationMeta) -> Self {
        Self {
            success: true,
            data,
            pagination,
        }
    }
}

impl<T: Serialize> IntoResponse for PaginatedResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Builds the error body for `err`.
///
/// `internal_message` is only added for server-side failures and only when
/// `expose_internal` is set.
pub fn error_body(err: &VetClinicError, expose_internal: bool) -> Value {
    let status = StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let reason = status.canonical_reason().unwrap_or("Error");

    let mut body = json!({
        "error": reason,
        "message": err.client_message(),
    });
    if expose_internal && err.is_server_error() {
        body["internal_message"] = Value::String(err.to_string());
    }
    body
}

impl IntoResponse for VetClinicError {
    fn into_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if self.is_server_error() {
            error!("Request failed with {}: {}", status_code.as_u16(), self);
        }

        let body = error_body(&self, exposes_internal_errors());
        (status_code, Json(body)).into_response()
    }
}

/// JSON request body extractor whose rejections use the error envelope.
///
/// An empty body is read as `{}` so that request types made of optional
/// fields report their own validation messages.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = VetClinicError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| validation_error(rejection.body_text()))?;

        let raw: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
            b"{}"
        } else {
            &bytes
        };

        serde_json::from_slice(raw)
            .map(JsonBody)
            .map_err(|err| validation_error(format!("Invalid JSON body: {}", err)))
    }
}

/// Numeric `{id}` path segment. Anything that is not a positive integer is a 400.
#[derive(Debug, Clone, Copy)]
pub struct PathId(pub i64);

impl<S> FromRequestParts<S> for PathId
where
    S: Send + Sync,
{
    type Rejection = VetClinicError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| validation_error(rejection.body_text()))?;

        match raw.parse::<i64>() {
            Ok(id) if id > 0 => Ok(PathId(id)),
            _ => Err(validation_error(format!("Invalid id: {}", raw))),
        }
    }
}
