//! `window.ethereum` as an [`ethereum_adapter::Provider`].

use ethereum_adapter::{
    EventHandler, Provider, ProviderEvent, ProviderEventKind, ProviderRpcError, RequestArguments,
    CODE_INTERNAL_ERROR, CODE_UNSUPPORTED_METHOD,
};
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

/// An injected EIP-1193 provider object.
#[derive(Clone, Debug)]
pub struct Eip1193Provider {
    inner: JsValue,
}

impl Eip1193Provider {
    /// Wrap a JS value; `undefined` and `null` mean no provider.
    pub fn from_js(inner: JsValue) -> Option<Self> {
        if inner.is_undefined() || inner.is_null() {
            None
        } else {
            Some(Self { inner })
        }
    }

    pub fn as_js(&self) -> &JsValue {
        &self.inner
    }

    fn function(&self, name: &str) -> Result<js_sys::Function, ProviderRpcError> {
        js_sys::Reflect::get(&self.inner, &JsValue::from_str(name))
            .ok()
            .and_then(|f| f.dyn_into::<js_sys::Function>().ok())
            .ok_or_else(|| {
                ProviderRpcError::new(
                    CODE_UNSUPPORTED_METHOD,
                    format!("provider has no `{name}` function"),
                )
            })
    }
}

impl Provider for Eip1193Provider {
    async fn request(&self, args: RequestArguments) -> Result<Value, ProviderRpcError> {
        tracing::debug!(method = %args.method, "provider request");
        let request = self.function("request")?;
        let js_args = to_js(&args)?;
        let returned = request
            .call1(&self.inner, &js_args)
            .map_err(|e| rpc_error(&e))?;
        let result = JsFuture::from(js_sys::Promise::resolve(&returned))
            .await
            .map_err(|e| rpc_error(&e))?;
        Ok(js_to_json(&result))
    }

    fn on(&self, kind: ProviderEventKind, mut handler: EventHandler) {
        let on = match self.function("on") {
            Ok(on) => on,
            Err(e) => {
                tracing::error!(event = kind.name(), error = %e, "cannot subscribe");
                return;
            }
        };

        let callback = Closure::<dyn FnMut(JsValue)>::new(move |payload: JsValue| {
            match ProviderEvent::from_payload(kind, js_to_json(&payload)) {
                Ok(event) => handler(event),
                Err(e) => tracing::warn!(event = kind.name(), error = %e, "malformed provider event"),
            }
        });

        if let Err(e) = on.call2(
            &self.inner,
            &JsValue::from_str(kind.name()),
            callback.as_ref().unchecked_ref(),
        ) {
            tracing::error!(event = kind.name(), error = ?e, "provider.on failed");
        }
        // Subscriptions live as long as the page.
        callback.forget();
    }

    fn is_metamask(&self) -> bool {
        js_sys::Reflect::get(&self.inner, &JsValue::from_str("isMetaMask"))
            .ok()
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }

    fn same_instance(&self, other: &Self) -> bool {
        js_sys::Object::is(&self.inner, &other.inner)
    }
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, ProviderRpcError> {
    let text = serde_json::to_string(value)
        .map_err(|e| ProviderRpcError::new(CODE_INTERNAL_ERROR, e.to_string()))?;
    js_sys::JSON::parse(&text)
        .map_err(|e| ProviderRpcError::new(CODE_INTERNAL_ERROR, format!("{e:?}")))
}

pub(crate) fn js_to_json(value: &JsValue) -> Value {
    if value.is_undefined() {
        return Value::Null;
    }
    js_sys::JSON::stringify(value)
        .ok()
        .and_then(|s| s.as_string())
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or(Value::Null)
}

/// Read `code`, `message` and `data` off a rejection.
///
/// Provider errors are usually `Error` subclasses, whose `message` is not
/// enumerable, so they are read property by property instead of through JSON.
pub(crate) fn rpc_error(err: &JsValue) -> ProviderRpcError {
    let get = |key: &str| {
        js_sys::Reflect::get(err, &JsValue::from_str(key))
            .ok()
            .filter(|v| !v.is_undefined() && !v.is_null())
    };
    let code = get("code")
        .and_then(|c| c.as_f64())
        .map(|c| c as i64)
        .unwrap_or(CODE_INTERNAL_ERROR);
    let message = get("message")
        .and_then(|m| m.as_string())
        .or_else(|| err.as_string())
        .unwrap_or_else(|| format!("{err:?}"));
    let data = get("data").map(|d| js_to_json(&d));
    ProviderRpcError {
        code,
        message,
        data,
    }
}
