#![cfg(target_arch = "wasm32")]

use ethereum_adapter::{Provider, RequestArguments, CODE_USER_REJECTED};
use ethereum_adapter_web::Eip1193Provider;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn provider(source: &str) -> Eip1193Provider {
    let value = js_sys::eval(source).unwrap();
    Eip1193Provider::from_js(value).unwrap()
}

#[wasm_bindgen_test]
fn undefined_is_no_provider() {
    assert!(Eip1193Provider::from_js(JsValue::UNDEFINED).is_none());
    assert!(Eip1193Provider::from_js(JsValue::NULL).is_none());
}

#[wasm_bindgen_test]
fn reads_is_metamask_flag() {
    assert!(provider("({ isMetaMask: true })").is_metamask());
    assert!(!provider("({})").is_metamask());
}

#[wasm_bindgen_test]
fn same_instance_is_identity() {
    let a = provider("({})");
    let b = provider("({})");
    assert!(a.same_instance(&a.clone()));
    assert!(!a.same_instance(&b));
}

#[wasm_bindgen_test]
async fn request_resolves_to_json() {
    let p = provider(
        "({ request: (args) => Promise.resolve(args.method === 'eth_accounts' ? ['0xabc'] : null) })",
    );
    let result = p.request(RequestArguments::new("eth_accounts")).await.unwrap();
    assert_eq!(result, serde_json::json!(["0xabc"]));
}

#[wasm_bindgen_test]
async fn rejection_keeps_code_and_message() {
    let p = provider(
        "({ request: () => Promise.reject(Object.assign(new Error('User rejected'), { code: 4001 })) })",
    );
    let err = p
        .request(RequestArguments::new("eth_requestAccounts"))
        .await
        .unwrap_err();
    assert_eq!(err.code, CODE_USER_REJECTED);
    assert_eq!(err.message, "User rejected");
}
