//! HTML shells for the browser side. Both load the same wasm bundle; the sign
//! page additionally carries the sign button and the signed panel.

pub const LOGIN_PAGE: &str = include_str!("../static/login.html");
pub const SIGN_PAGE: &str = include_str!("../static/sign.html");

/// URL prefix the wasm bundle is served under.
pub const PKG_PREFIX: &str = "/pkg";
