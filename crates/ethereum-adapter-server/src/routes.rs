use actix_web::{delete, get, post, web, HttpResponse};
use ethereum_adapter::{EthAddress, Signature};

use crate::pages;
use crate::state::AdapterState;

fn bad_request(message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({
        "error": "invalid report",
        "message": message,
    }))
}

#[get("/login")]
pub async fn login() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(pages::LOGIN_PAGE)
}

/// Signing page. The payload stays in the query string; the page reads it.
#[get("/sign")]
pub async fn sign() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(pages::SIGN_PAGE)
}

#[post("/address")]
pub async fn save_address(
    body: web::Json<EthAddress>,
    state: web::Data<AdapterState>,
) -> HttpResponse {
    let address = body.into_inner();
    if address.address.trim().is_empty() {
        return bad_request("address is empty");
    }
    tracing::info!(address = %address.address, "address reported");
    *state.address.write().await = Some(address);
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

#[get("/address")]
pub async fn get_address(state: web::Data<AdapterState>) -> HttpResponse {
    let address = state.address.read().await;
    HttpResponse::Ok().json(&*address)
}

#[delete("/address")]
pub async fn clear_address(state: web::Data<AdapterState>) -> HttpResponse {
    *state.address.write().await = None;
    HttpResponse::NoContent().finish()
}

#[post("/signature")]
pub async fn save_signature(
    body: web::Json<Signature>,
    state: web::Data<AdapterState>,
) -> HttpResponse {
    let signature = body.into_inner();
    if signature.signature.trim().is_empty() || signature.by.address.trim().is_empty() {
        return bad_request("signature and signer are required");
    }
    tracing::info!(by = %signature.by.address, "signature reported");
    *state.signature.write().await = Some(signature);
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

#[get("/signature")]
pub async fn get_signature(state: web::Data<AdapterState>) -> HttpResponse {
    let signature = state.signature.read().await;
    HttpResponse::Ok().json(&*signature)
}

#[delete("/signature")]
pub async fn clear_signature(state: web::Data<AdapterState>) -> HttpResponse {
    *state.signature.write().await = None;
    HttpResponse::NoContent().finish()
}

#[get("/health")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": "ethereum-adapter-server",
    }))
}
