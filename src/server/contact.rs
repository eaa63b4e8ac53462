use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info};

use super::AppState;
use crate::db::ContactMessage;

/// Body of `POST /api/contact`. Absent and `null` fields read as missing.
#[derive(Debug, Default, Deserialize)]
struct ContactRequest {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    subject: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl ContactRequest {
    fn into_message(self) -> ContactMessage {
        ContactMessage {
            name: self.name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            subject: self.subject.unwrap_or_default(),
            message: self.message.unwrap_or_default(),
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Decode a JSON body. Only an object can carry the fields; any other
/// non-null value reads as a submission with every field missing.
fn parse_request(body: &[u8]) -> Result<ContactRequest, serde_json::Error> {
    match serde_json::from_slice::<Value>(body)? {
        Value::Object(fields) => serde_json::from_value(Value::Object(fields)),
        Value::Null => Err(serde::de::Error::custom("contact body is null")),
        _ => Ok(ContactRequest::default()),
    }
}

/// Persist a contact submission.
///
/// The body is parsed by hand so that malformed JSON, wrongly typed fields
/// and oversized bodies answer with the generic 500 rather than an extractor
/// rejection.
pub(crate) async fn submit_contact(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(e) => {
            error!(error = %e, "Contact form body unreadable");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
        }
    };

    let request = match parse_request(&body) {
        Ok(request) => request,
        Err(e) => {
            error!(error = %e, "Contact form error");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
        }
    };

    let message = request.into_message();
    if !message.is_complete() {
        return error_response(StatusCode::BAD_REQUEST, "All fields are required");
    }

    if let Err(e) = state.store.insert_contact_message(&message).await {
        error!(error = %e, "Failed to save contact message");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to save message");
    }

    info!(subject = %message.subject, "Contact message stored");
    (
        StatusCode::OK,
        Json(json!({ "message": "Contact message received successfully" })),
    )
        .into_response()
}
