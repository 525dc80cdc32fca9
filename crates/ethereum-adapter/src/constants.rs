// --- EIP-1193 request methods ---

pub const METHOD_CHAIN_ID: &str = "eth_chainId";
pub const METHOD_ACCOUNTS: &str = "eth_accounts";
/// EIP-1102 permission request.
pub const METHOD_REQUEST_ACCOUNTS: &str = "eth_requestAccounts";
pub const METHOD_PERSONAL_SIGN: &str = "personal_sign";

// --- EIP-1193 events ---

pub const EVENT_CHAIN_CHANGED: &str = "chainChanged";
pub const EVENT_ACCOUNTS_CHANGED: &str = "accountsChanged";

// --- EIP-1193 provider error codes ---

/// The user rejected the request.
pub const CODE_USER_REJECTED: i64 = 4001;
/// The requested method and/or account has not been authorized by the user.
pub const CODE_UNAUTHORIZED: i64 = 4100;
/// The provider does not support the requested method.
pub const CODE_UNSUPPORTED_METHOD: i64 = 4200;
/// The provider is disconnected from all chains.
pub const CODE_DISCONNECTED: i64 = 4900;
/// The provider is not connected to the requested chain.
pub const CODE_CHAIN_DISCONNECTED: i64 = 4901;
/// JSON-RPC internal error, used when a provider failure carries no code.
pub const CODE_INTERNAL_ERROR: i64 = -32603;

// --- Server sinks ---

pub const ADDRESS_PATH: &str = "/address";
pub const SIGNATURE_PATH: &str = "/signature";
pub const LOGIN_PATH: &str = "/login";
pub const SIGN_PATH: &str = "/sign";

/// Query parameter carrying the message to sign.
pub const PAYLOAD_PARAM: &str = "payload";

/// Default address of the local adapter server.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// `@metamask/detect-provider` waits this long for a late injection.
pub const DEFAULT_DETECT_TIMEOUT_MS: u64 = 3000;
pub const DEFAULT_DETECT_POLL_MS: u64 = 100;

pub const DEFAULT_REPORT_TIMEOUT_SECS: u64 = 30;
