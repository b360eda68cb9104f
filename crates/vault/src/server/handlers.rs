//! Axum request handlers for all service endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::{
    payload::{display_or_unavailable, StoredSecret},
    protocol::{
        DecryptRequest, DecryptResponse, EncryptRequest, EncryptResponse, ErrorResponse,
        HealthResponse, RevealDocumentRequest, RevealDocumentResponse, RevealRequest,
        RevealResponse, SealDocumentRequest, SealDocumentResponse,
    },
    ServiceError,
};
use tracing::{debug, warn};

use super::state::AppState;
use crate::crypto::{CodecError, RevealContext};
use crate::documents::{reveal_fields, seal_fields};

/// `POST /encrypt` — encrypt a single delivery secret.
pub async fn encrypt(
    State(state): State<AppState>,
    body: Result<Json<EncryptRequest>, JsonRejection>,
) -> Response {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => return rejected(rejection),
    };
    match state.codec.encrypt(&req.plaintext) {
        Ok(payload) => (StatusCode::OK, Json(EncryptResponse { payload })).into_response(),
        Err(e) => {
            warn!(error = %e, kind = e.kind(), "encryption failed");
            error_response(codec_error(e))
        }
    }
}

/// `POST /decrypt` — decrypt a payload, failing loud on any problem.
pub async fn decrypt(
    State(state): State<AppState>,
    body: Result<Json<DecryptRequest>, JsonRejection>,
) -> Response {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => return rejected(rejection),
    };
    match state.codec.decrypt(&req.payload) {
        Ok(plaintext) => (StatusCode::OK, Json(DecryptResponse { plaintext })).into_response(),
        Err(e) => {
            warn!(error = %e, kind = e.kind(), "decryption failed");
            error_response(codec_error(e))
        }
    }
}

/// `POST /reveal` — recover a stored value of unknown shape. Always `200 OK`.
pub async fn reveal(
    State(state): State<AppState>,
    body: Result<Json<RevealRequest>, JsonRejection>,
) -> Response {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => return rejected(rejection),
    };
    let ctx = RevealContext {
        record_id: req.record_id.as_deref(),
        field: None,
    };
    let plaintext = state.codec.reveal(StoredSecret::classify(&req.value), ctx);
    let display = display_or_unavailable(plaintext.as_deref()).to_owned();
    (StatusCode::OK, Json(RevealResponse { plaintext, display })).into_response()
}

/// `POST /documents/seal` — encrypt every configured delivery field of an order document.
pub async fn seal_document(
    State(state): State<AppState>,
    body: Result<Json<SealDocumentRequest>, JsonRejection>,
) -> Response {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => return rejected(rejection),
    };
    let mut document = req.document;
    match seal_fields(&mut document, state.sealed_fields.as_slice(), &state.codec) {
        Ok(sealed) => {
            debug!(sealed, "document sealed");
            (StatusCode::OK, Json(SealDocumentResponse { document, sealed })).into_response()
        }
        Err(e) => {
            warn!(error = %e, kind = e.kind(), "document sealing failed");
            error_response(codec_error(e))
        }
    }
}

/// `POST /documents/reveal` — recover every configured delivery field. Always `200 OK`.
pub async fn reveal_document(
    State(state): State<AppState>,
    body: Result<Json<RevealDocumentRequest>, JsonRejection>,
) -> Response {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => return rejected(rejection),
    };
    let mut document = req.document;
    let summary = reveal_fields(
        &mut document,
        state.sealed_fields.as_slice(),
        &state.codec,
        req.record_id.as_deref(),
    );
    let body = RevealDocumentResponse {
        document,
        revealed: summary.revealed,
        unavailable: summary.unavailable,
    };
    (StatusCode::OK, Json(body)).into_response()
}

/// `GET /health` — liveness and readiness check.
///
/// Returns `200 OK` when an encryption secret is configured.
/// Returns `503 Service Unavailable` otherwise.
pub async fn health(State(state): State<AppState>) -> Response {
    let codec_ready = state.codec.is_configured();

    let (status_code, status_str) = if codec_ready {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    let body = HealthResponse {
        status: status_str.into(),
        codec_ready,
        sealed_fields: state.sealed_fields.len(),
    };
    (status_code, Json(body)).into_response()
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}

fn codec_error(e: CodecError) -> ServiceError {
    match e {
        CodecError::MissingSecret => ServiceError::Unavailable(e.to_string()),
        CodecError::Integrity => ServiceError::IntegrityFailure(e.to_string()),
        CodecError::Malformed(_) => ServiceError::BadRequest(e.to_string()),
    }
}

/// Every body extraction failure maps to 400 `bad_request`.
fn rejected(rejection: JsonRejection) -> Response {
    debug!(error = %rejection.body_text(), "request body rejected");
    error_response(ServiceError::BadRequest(rejection.body_text()))
}

fn error_response(err: ServiceError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::new(err.code(), err.to_string()))).into_response()
}
