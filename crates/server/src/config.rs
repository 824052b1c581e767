//! Startup configuration.
//!
//! Secrets and endpoints come from the environment (a `.env` file is picked
//! up when present). Missing secrets abort startup rather than failing on
//! the first request.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    /// Bearer token for the completion API.
    pub completion_api_key: String,
    /// Bearer token for the embedding provider.
    pub cohere_api_key: String,
    pub completion_api_url: String,
    pub completion_model: String,
    pub cohere_api_url: String,
    pub index_dir: PathBuf,
    pub bind_addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
        let bind_addr = bind_addr
            .parse()
            .with_context(|| format!("invalid BIND_ADDR: {bind_addr}"))?;

        Ok(Self {
            completion_api_key: require("COMPLETION_API_KEY")?,
            cohere_api_key: require("COHERE_API_KEY")?,
            completion_api_url: env::var("COMPLETION_API_URL")
                .unwrap_or_else(|_| llm::DEFAULT_ENDPOINT.to_string()),
            completion_model: env::var("COMPLETION_MODEL")
                .unwrap_or_else(|_| llm::DEFAULT_MODEL.to_string()),
            cohere_api_url: env::var("COHERE_API_URL")
                .unwrap_or_else(|_| retrieval::embed::DEFAULT_ENDPOINT.to_string()),
            index_dir: env::var("INDEX_DIR")
                .unwrap_or_else(|_| "./storage".to_string())
                .into(),
            bind_addr,
        })
    }
}

fn require(name: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(anyhow!("{name} is not set; refusing to start")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for name in [
            "COMPLETION_API_KEY",
            "COHERE_API_KEY",
            "COMPLETION_API_URL",
            "COMPLETION_MODEL",
            "COHERE_API_URL",
            "INDEX_DIR",
            "BIND_ADDR",
        ] {
            env::remove_var(name);
        }
    }

    #[test]
    #[serial]
    fn missing_completion_key_fails_fast() {
        clear_env();
        env::set_var("COHERE_API_KEY", "ck");

        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("COMPLETION_API_KEY"));
    }

    #[test]
    #[serial]
    fn missing_cohere_key_fails_fast() {
        clear_env();
        env::set_var("COMPLETION_API_KEY", "sk");

        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("COHERE_API_KEY"));
    }

    #[test]
    #[serial]
    fn blank_secret_is_treated_as_missing() {
        clear_env();
        env::set_var("COMPLETION_API_KEY", "   ");
        env::set_var("COHERE_API_KEY", "ck");

        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("COMPLETION_API_KEY"));
    }

    #[test]
    #[serial]
    fn defaults_are_applied() {
        clear_env();
        env::set_var("COMPLETION_API_KEY", "sk");
        env::set_var("COHERE_API_KEY", "ck");

        let config = Config::from_env().unwrap();

        assert_eq!(config.completion_api_url, llm::DEFAULT_ENDPOINT);
        assert_eq!(config.completion_model, llm::DEFAULT_MODEL);
        assert_eq!(config.cohere_api_url, retrieval::embed::DEFAULT_ENDPOINT);
        assert_eq!(config.index_dir, PathBuf::from("./storage"));
        assert_eq!(config.bind_addr, "0.0.0.0:8000".parse().unwrap());
    }

    #[test]
    #[serial]
    fn overrides_are_respected() {
        clear_env();
        env::set_var("COMPLETION_API_KEY", "sk");
        env::set_var("COHERE_API_KEY", "ck");
        env::set_var("COMPLETION_MODEL", "other-model");
        env::set_var("INDEX_DIR", "/data/index");
        env::set_var("BIND_ADDR", "127.0.0.1:9999");

        let config = Config::from_env().unwrap();

        assert_eq!(config.completion_model, "other-model");
        assert_eq!(config.index_dir, PathBuf::from("/data/index"));
        assert_eq!(config.bind_addr, "127.0.0.1:9999".parse().unwrap());
    }

    #[test]
    #[serial]
    fn invalid_bind_addr_is_rejected() {
        clear_env();
        env::set_var("COMPLETION_API_KEY", "sk");
        env::set_var("COHERE_API_KEY", "ck");
        env::set_var("BIND_ADDR", "not-an-addr");

        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("BIND_ADDR"));
    }
}
