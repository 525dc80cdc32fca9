use actix_web::{web, App, HttpServer};
use tracing_subscriber::EnvFilter;

use ethereum_adapter_server::cors::build_cors;
use ethereum_adapter_server::pages::PKG_PREFIX;
use ethereum_adapter_server::{AdapterState, ServerConfig};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env();
    let state = web::Data::new(AdapterState::new());

    if !config.static_dir.is_dir() {
        tracing::warn!(
            dir = %config.static_dir.display(),
            "static dir missing, pages will load without the wasm bundle (build it with wasm-pack)"
        );
    }

    tracing::info!("ethereum adapter listening at http://{}:{}", config.host, config.port);
    tracing::info!("Endpoints: GET /login, GET /sign, GET|POST|DELETE /address, GET|POST|DELETE /signature, GET /health");

    let server_config = config.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(build_cors(&server_config.allowed_origins))
            .app_data(web::JsonConfig::default().limit(server_config.json_limit))
            .app_data(state.clone())
            .configure(ethereum_adapter_server::configure)
            .service(actix_files::Files::new(PKG_PREFIX, &server_config.static_dir))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
