use crate::contact::{ContactInquiry, InquiryRelay};
use crate::errors::Error;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// `send-contact-email` function: relays one inquiry as two emails.
///
/// Validation problems answer 400; any other failure answers 500 with the
/// failure message, the shape browser callers of the function expect.
pub async fn send_contact_email(
    State(state): State<AppState>,
    body: Result<Json<ContactInquiry>, JsonRejection>,
) -> Response {
    let result = match body {
        Ok(Json(inquiry)) => state.email_relay.relay(&inquiry).await,
        Err(rejection) => Err(Error::BadRequest {
            message: rejection.body_text(),
        }),
    };

    match result {
        Ok(()) => (StatusCode::OK, Json(json!({ "success": true }))).into_response(),
        Err(e) => {
            e.log();
            let status = match e {
                Error::BadRequest { .. } => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, Json(json!({ "error": e.to_string() }))).into_response()
        }
    }
}
