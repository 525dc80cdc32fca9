//! The page's fixed affordances, toggled with the `hidden` class.

use ethereum_adapter::{AdapterHandle, Surface};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Element;

const HIDDEN: &str = "hidden";

const CONNECT_BUTTON: &str = ".enableEthereumButton";
const SHOW_ACCOUNT: &str = ".showAccount";
const CONNECTED: &str = "#connected";
const SIGN_BUTTON: &str = ".signButton";
const SIGNED: &str = "#signed";

#[derive(Clone, Debug)]
pub struct DomSurface {
    connect_button: Element,
    connected: Element,
    show_account: Element,
    /// Only on the signing page.
    sign_button: Option<Element>,
    signed: Option<Element>,
}

impl DomSurface {
    /// Look the affordances up in the current document.
    pub fn from_document() -> Result<Self, String> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or("no document")?;
        let find = |selector: &str| document.query_selector(selector).ok().flatten();
        let require = |selector: &str| {
            find(selector).ok_or_else(|| format!("missing element `{selector}`"))
        };

        Ok(Self {
            connect_button: require(CONNECT_BUTTON)?,
            connected: require(CONNECTED)?,
            show_account: require(SHOW_ACCOUNT)?,
            sign_button: find(SIGN_BUTTON),
            signed: find(SIGNED),
        })
    }

    pub fn can_sign(&self) -> bool {
        self.sign_button.is_some()
    }

    /// Route button clicks into the adapter.
    pub fn bind(&self, handle: &AdapterHandle) {
        let connect = handle.clone();
        on_click(&self.connect_button, move || connect.connect());

        if let Some(button) = &self.sign_button {
            let sign = handle.clone();
            on_click(button, move || sign.sign(location_search()));
        }
    }
}

fn on_click(element: &Element, mut action: impl FnMut() + 'static) {
    let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |_event: web_sys::Event| action());
    if let Err(e) =
        element.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
    {
        tracing::error!(error = ?e, "failed to bind click handler");
    }
    closure.forget();
}

fn location_search() -> String {
    web_sys::window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default()
}

fn set_visible(element: &Element, visible: bool) {
    let classes = element.class_list();
    let result = if visible {
        classes.remove_1(HIDDEN)
    } else {
        classes.add_1(HIDDEN)
    };
    if let Err(e) = result {
        tracing::warn!(error = ?e, "class toggle failed");
    }
}

impl Surface for DomSurface {
    fn show_disconnected(&self) {
        set_visible(&self.connect_button, true);
        set_visible(&self.connected, false);
    }

    fn show_connected(&self, account: &str) {
        set_visible(&self.connect_button, false);
        self.show_account.set_text_content(Some(account));
        set_visible(&self.connected, true);
    }

    fn show_signed(&self) {
        if let Some(button) = &self.sign_button {
            set_visible(button, false);
        }
        if let Some(signed) = &self.signed {
            set_visible(signed, true);
        }
    }

    fn reload(&self) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Err(e) = window.location().reload() {
            tracing::error!(error = ?e, "reload failed");
        }
    }
}
