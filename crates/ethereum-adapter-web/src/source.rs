use std::time::Duration;

use ethereum_adapter::ProviderSource;
use wasm_bindgen::JsValue;

use crate::provider::Eip1193Provider;

/// The browser window. Providers are injected as `window.ethereum`, possibly
/// after the page script has started.
#[derive(Clone, Copy, Debug, Default)]
pub struct WindowSource;

fn window_ethereum() -> Option<Eip1193Provider> {
    let window = web_sys::window()?;
    let value = js_sys::Reflect::get(&window, &JsValue::from_str("ethereum")).ok()?;
    Eip1193Provider::from_js(value)
}

impl ProviderSource for WindowSource {
    type Provider = Eip1193Provider;

    fn probe(&self) -> Option<Eip1193Provider> {
        window_ethereum()
    }

    fn ambient(&self) -> Option<Eip1193Provider> {
        window_ethereum()
    }

    async fn sleep(&self, duration: Duration) {
        gloo_timers::future::sleep(duration).await;
    }
}
