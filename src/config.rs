use std::collections::HashMap;

use serde::Deserialize;

pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash-exp";
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiConfig {
    pub model: String,
    pub api_base: String,
}

#[derive(Clone, Deserialize)]
pub struct AppConfig {
    /// `None` when the key is unset or blank; analysis is refused in that case.
    pub gemini_api_key: Option<String>,
    pub frontend_url: String,
    pub gemini: GeminiConfig,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(std::env::vars())
    }

    /// Builds the config from `(name, value)` pairs. Names are matched
    /// case-insensitively and anything unrecognised is ignored.
    pub fn from_vars<I, K, V>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_ascii_lowercase(), v.into()))
            .collect();
        let get = |name: &str| vars.get(name).cloned();

        let gemini_api_key = get("gemini_api_key")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        let port = match get("app_port") {
            Some(p) => p
                .trim()
                .parse::<u16>()
                .map_err(|e| anyhow::anyhow!("invalid APP_PORT {:?}: {}", p, e))?,
            None => 8000,
        };

        Ok(Self {
            gemini_api_key,
            frontend_url: get("frontend_url").unwrap_or_else(|| DEFAULT_FRONTEND_URL.into()),
            gemini: GeminiConfig {
                model: get("gemini_model").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.into()),
                api_base: get("gemini_api_base")
                    .map(|b| b.trim_end_matches('/').to_string())
                    .unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.into()),
            },
            host: get("app_host").unwrap_or_else(|| "0.0.0.0".into()),
            port,
        })
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("gemini_api_key", &self.gemini_api_key.as_ref().map(|_| "[REDACTED]"))
            .field("frontend_url", &self.frontend_url)
            .field("gemini", &self.gemini)
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}
