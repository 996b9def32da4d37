/*
 * Responsibility
 * - Read settings from the environment (port, CORS allowlist, client library headers)
 * - Validate them (missing or invalid values fail startup)
 */
use std::net::SocketAddr;

use axum::http::HeaderValue;
use thiserror::Error;

use crate::middleware::client_lib_version::{ClientLibHeaders, parse_flag};

const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn from_value(value: Option<String>) -> Self {
        match value
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,
    pub client_lib: ClientLibHeaders,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(s) => s.parse::<u16>().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => DEFAULT_PORT,
        };
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let app_env = AppEnv::from_value(lookup("APP_ENV"));

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let version = lookup("SKILLS_CLIENT_LIB_VERSION")
            .ok_or(ConfigError::Missing("SKILLS_CLIENT_LIB_VERSION"))?;
        let version = HeaderValue::from_str(&version)
            .map_err(|_| ConfigError::Invalid("SKILLS_CLIENT_LIB_VERSION"))?;

        // Absent means no upgrade is running.
        let upgrade_in_progress = lookup("SKILLS_DB_UPGRADE_IN_PROGRESS")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            client_lib: ClientLibHeaders::new(version, upgrade_in_progress),
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    /// A valid config: a client lib version plus `vars`.
    pub(crate) fn config_with(vars: &[(&str, &str)]) -> Config {
        let mut all = vec![("SKILLS_CLIENT_LIB_VERSION", "1.0.0")];
        all.extend_from_slice(vars);
        load(&all).expect("config should load")
    }

    #[test]
    fn defaults() {
        let config = config_with(&[]);

        assert_eq!(config.addr, SocketAddr::from(([0, 0, 0, 0], 8080)));
        assert_eq!(config.app_env, AppEnv::Development);
        assert!(config.cors_allowed_origins.is_empty());
        assert_eq!(config.client_lib.version(), "1.0.0");
        assert!(!config.client_lib.upgrade_in_progress());
    }

    #[test]
    fn missing_client_lib_version_fails() {
        let err = load(&[]).unwrap_err();

        assert_eq!(err, ConfigError::Missing("SKILLS_CLIENT_LIB_VERSION"));
    }

    #[test]
    fn client_lib_version_must_be_a_header_value() {
        let err = load(&[("SKILLS_CLIENT_LIB_VERSION", "1.0\n")]).unwrap_err();

        assert_eq!(err, ConfigError::Invalid("SKILLS_CLIENT_LIB_VERSION"));
    }

    #[test]
    fn invalid_port_fails() {
        let err = load(&[("SKILLS_CLIENT_LIB_VERSION", "1.0.0"), ("PORT", "http")]).unwrap_err();

        assert_eq!(err, ConfigError::Invalid("PORT"));
        assert_eq!(err.to_string(), "invalid configuration: PORT");
    }

    #[test]
    fn upgrade_flag_is_parsed_leniently() {
        let cases = [
            ("true", true),
            ("TRUE", true),
            ("False", false),
            ("", false),
            ("yes", false),
            ("1", false),
        ];

        for (raw, expected) in cases {
            let config = config_with(&[("SKILLS_DB_UPGRADE_IN_PROGRESS", raw)]);
            assert_eq!(config.client_lib.upgrade_in_progress(), expected, "{raw:?}");
        }
    }

    #[test]
    fn production_with_origin_allowlist() {
        let config = config_with(&[
            ("APP_ENV", "PROD"),
            ("PORT", "9000"),
            ("CORS_ALLOWED_ORIGINS", " https://a.test ,,https://b.test"),
        ]);

        assert!(config.app_env.is_production());
        assert_eq!(config.addr.port(), 9000);
        assert_eq!(
            config.cors_allowed_origins,
            vec!["https://a.test".to_string(), "https://b.test".to_string()]
        );
    }
}
