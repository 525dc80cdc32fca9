use std::path::PathBuf;

/// Server configuration, read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding the wasm bundle served under `/pkg`.
    pub static_dir: PathBuf,
    pub allowed_origins: Vec<String>,
    pub json_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            static_dir: PathBuf::from("pkg"),
            allowed_origins: Vec::new(),
            json_limit: 16_384,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let host = std::env::var("HOST")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.host);

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);

        let static_dir = std::env::var("STATIC_DIR")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.static_dir);

        let allowed_origins = std::env::var("ALLOWED_ORIGINS")
            .ok()
            .map(|origins| parse_origins(&origins))
            .unwrap_or_default();

        let json_limit = std::env::var("JSON_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.json_limit);

        Self {
            host,
            port,
            static_dir,
            allowed_origins,
            json_limit,
        }
    }
}

fn parse_origins(origins: &str) -> Vec<String> {
    origins
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
