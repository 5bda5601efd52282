pub mod routes;
mod convert;

use actix_web::{web, Resource};

/// The relay lives at the root path and only answers `POST`.
pub fn services() -> Resource {
    web::resource("/")
        .route(web::post().to(routes::create_relay))
        .default_service(web::to(routes::method_not_allowed))
}
