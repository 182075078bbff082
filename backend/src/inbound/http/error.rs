//! Renders domain failures as JSON HTTP responses.
//!
//! The domain's [`Error`] stays transport-neutral; this module gives it an
//! Actix [`ResponseError`] face. Each error code maps onto exactly one status
//! code, internal failures are cut down to a generic message before
//! serialisation, and any captured trace identifier is echoed in a `trace-id`
//! response header so a client report can be matched to server logs.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Result alias used by HTTP handlers throughout the inbound layer.
pub type ApiResult<T> = Result<T, Error>;

/// The payload a client is allowed to see.
///
/// Internal errors keep their trace identifier but lose the message and
/// details, which may quote SQL or connection strings. Every other code is
/// client-facing by construction and passes through unchanged.
fn client_view(error: &Error) -> Error {
    if !matches!(error.code(), ErrorCode::InternalError) {
        return error.clone();
    }
    let mut redacted = Error::internal("Internal server error");
    if let Some(id) = error.trace_id() {
        redacted = redacted.with_trace_id(id.to_owned());
    }
    redacted
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self.code() {
            ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        builder.json(client_view(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Extractor and payload failures carry framework detail; log it and
        // hand the client the generic envelope.
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}

#[cfg(test)]
mod tests;
