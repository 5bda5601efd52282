use actix_web::{HttpResponse, web};
use actix_web::http::StatusCode;
use log::{info, error};

use relay_data::{ExchangeStore, Relayer};
use relay_domain::RelayRequest;

use crate::api::convert::{ToResponse, plain_text};

/// Performs the relay call described by the JSON body, records the exchange
/// and answers with the origin's status, headers and length.
///
/// The origin is contacted before anything is written. When recording fails
/// the caller gets a 500 even though the origin already saw the call.
pub async fn create_relay(
    body: web::Bytes,
    relayer: web::Data<Relayer>,
    store: web::Data<dyn ExchangeStore>,
) -> HttpResponse {

    let request: RelayRequest = match serde_json::from_slice(&body) {
        Err(e) => return e.to_response(),
        Ok(x) => x,
    };

    let response = match relayer.send(&request).await {
        Err(e) => return e.to_response(),
        Ok(x) => x,
    };

    match store.record(&request, &response).await {
        Err(e) => {
            error!("{} {} answered {} but the exchange was not recorded",
                   request.method, request.url, response.status);
            return e.to_response();
        },
        Ok(id) => {
            info!("[{}] {} {} -> {}", id, request.method, request.url, response.status);
        }
    }

    HttpResponse::Ok().json(response)
}

pub async fn method_not_allowed() -> HttpResponse {
    plain_text(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}
