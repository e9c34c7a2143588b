//! Cross-origin policy for the browser client.

use actix_cors::Cors;
use actix_web::http::{Method, header};

/// Any origin may call the API; credentials travel in the Authorization
/// header, never in cookies.
pub fn cors_policy() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allowed_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(3600)
}
