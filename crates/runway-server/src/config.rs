use anyhow::Context;
use std::env;

pub const DEFAULT_SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Where entity sheets are stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendConfig {
    /// In-process sheets, lost on exit
    Memory,
    /// Remote spreadsheet over HTTP
    Http {
        api_base: String,
        spreadsheet_id: String,
        access_token: String,
    },
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    pub backend: BackendConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host = get("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = get("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .context("PORT must be a port number")?;

        let backend = match get("SHEETS_BACKEND").as_deref().unwrap_or("memory") {
            "memory" => BackendConfig::Memory,
            "http" => BackendConfig::Http {
                api_base: get("SHEETS_API_BASE").unwrap_or_else(|| DEFAULT_SHEETS_API.to_string()),
                spreadsheet_id: get("SPREADSHEET_ID")
                    .context("SPREADSHEET_ID is required for the http backend")?,
                access_token: get("SHEETS_ACCESS_TOKEN")
                    .context("SHEETS_ACCESS_TOKEN is required for the http backend")?,
            },
            other => anyhow::bail!("unknown SHEETS_BACKEND: {other}"),
        };

        Ok(Self {
            host,
            port,
            backend,
        })
    }

    pub fn backend_kind(&self) -> &'static str {
        match self.backend {
            BackendConfig::Memory => "memory",
            BackendConfig::Http { .. } => "http",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.backend, BackendConfig::Memory);
    }

    #[test]
    fn test_http_backend() {
        let config = Config::from_lookup(lookup(&[
            ("SHEETS_BACKEND", "http"),
            ("SPREADSHEET_ID", "abc"),
            ("SHEETS_ACCESS_TOKEN", "secret"),
            ("PORT", "8080"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(
            config.backend,
            BackendConfig::Http {
                api_base: DEFAULT_SHEETS_API.to_string(),
                spreadsheet_id: "abc".to_string(),
                access_token: "secret".to_string(),
            }
        );
    }

    #[test]
    fn test_http_backend_needs_credentials() {
        assert!(Config::from_lookup(lookup(&[("SHEETS_BACKEND", "http")])).is_err());
        assert!(Config::from_lookup(lookup(&[("SHEETS_BACKEND", "carrier-pigeon")])).is_err());
        assert!(Config::from_lookup(lookup(&[("PORT", "nope")])).is_err());
    }
}
