//! Local server for the wallet adapter.
//!
//! Hosts the login and sign pages, receives the `/address` and `/signature`
//! reports the page sends, and hands the last value of each back to native
//! tools polling with `AdapterClient`.
//!
//! # Modules
//!
//! - [`config`]: environment configuration ([`ServerConfig`](config::ServerConfig))
//! - [`cors`]: cross-origin policy for the report sinks
//! - [`routes`]: page, report and health endpoints
//! - [`state`]: last reported address and signature

pub mod config;
pub mod cors;
pub mod pages;
pub mod routes;
pub mod state;

use actix_web::web;

pub use config::ServerConfig;
pub use state::AdapterState;

/// Register every endpoint. Static assets are mounted separately.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(routes::login)
        .service(routes::sign)
        .service(routes::save_address)
        .service(routes::get_address)
        .service(routes::clear_address)
        .service(routes::save_signature)
        .service(routes::get_signature)
        .service(routes::clear_signature)
        .service(routes::health);
}
