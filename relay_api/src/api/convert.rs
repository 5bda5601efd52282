use actix_web::{HttpResponse, Responder};
use actix_web::http::StatusCode;
use log::{warn, error};

use relay_data::{SendError, StoreError};

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

pub trait ToResponse {
    type Output : Responder;
    fn to_response(&self) -> Self::Output;
}

pub fn plain_text(status: StatusCode, reason: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status)
        .content_type(TEXT_PLAIN)
        .body(reason.into())
}

impl ToResponse for serde_json::Error {
    type Output = HttpResponse;
    fn to_response(&self) -> Self::Output {
        warn!("Rejected relay payload: {}", self);
        plain_text(StatusCode::BAD_REQUEST, "Invalid JSON data")
    }
}

impl ToResponse for SendError {
    type Output = HttpResponse;
    fn to_response(&self) -> Self::Output {
        if self.is_client_error() {
            warn!("Rejected relay payload: {}", self);
            return plain_text(StatusCode::BAD_REQUEST, self.to_string());
        }

        error!("Relay failed: {}", self);
        match self {
            SendError::Timeout { .. } =>
                plain_text(StatusCode::GATEWAY_TIMEOUT, "Timed out waiting for target"),

            SendError::ClientBuild { .. }
            | SendError::RequestBuild { .. } =>
                plain_text(StatusCode::INTERNAL_SERVER_ERROR, "Error creating request"),

            _ =>
                plain_text(StatusCode::INTERNAL_SERVER_ERROR, "Error sending request to target"),
        }
    }
}

impl ToResponse for StoreError {
    type Output = HttpResponse;
    fn to_response(&self) -> Self::Output {
        error!("Database error: {}", self);
        match self {
            StoreError::SerializeHeaders { .. } =>
                plain_text(StatusCode::INTERNAL_SERVER_ERROR, "Error encoding headers for storage"),

            StoreError::Sql { .. }
            | StoreError::Rejected { .. } =>
                plain_text(StatusCode::INTERNAL_SERVER_ERROR, "Error recording relay data"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_data::WriteStep;

    #[test]
    fn store_errors_are_server_errors() {
        let response = StoreError::Rejected { step: WriteStep::Commit }.to_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn payload_errors_are_client_errors() {
        let response = SendError::EmptyMethod.to_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = SendError::InvalidHeaderName { name: "Bad Name".into() }.to_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers().get("content-type").unwrap(), TEXT_PLAIN);
    }
}
