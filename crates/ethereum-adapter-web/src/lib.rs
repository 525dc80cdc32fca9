//! Browser entry point for the wallet adapter.
//!
//! Built with `wasm-pack build --target web` and loaded by the adapter
//! server's login and sign pages. Detects `window.ethereum`, wires the page's
//! buttons into the [`ethereum_adapter::Adapter`] and runs it until the page
//! reloads.

use ethereum_adapter::{Adapter, AdapterConfig, AdapterError};
use wasm_bindgen::prelude::*;

mod provider;
mod reporter;
mod source;
mod surface;

pub use provider::Eip1193Provider;
pub use reporter::FetchReporter;
pub use source::WindowSource;
pub use surface::DomSurface;

async fn run() {
    let config = AdapterConfig::browser();

    let surface = match DomSurface::from_document() {
        Ok(surface) => surface,
        Err(e) => {
            tracing::error!(error = %e, "page has no wallet affordances");
            return;
        }
    };
    let reporter = FetchReporter::new(config.reports.clone());

    let adapter = match Adapter::start(&WindowSource, surface.clone(), reporter, &config).await {
        Ok(adapter) => adapter,
        // Already reported by detection.
        Err(AdapterError::ProviderAbsent) => return,
        Err(e) => {
            tracing::error!(error = %e, "wallet adapter failed to start");
            return;
        }
    };

    surface.bind(&adapter.handle());
    tracing::info!(signing = surface.can_sign(), "wallet adapter ready");

    let exit = adapter.run().await;
    tracing::debug!(?exit, "wallet adapter stopped");
}

/// Initialize the adapter
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Debug).is_err() {
        web_sys::console::warn_1(&"logger already initialized".into());
    }
    wasm_bindgen_futures::spawn_local(run());
}
