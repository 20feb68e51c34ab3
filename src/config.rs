use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;
use url::Url;

const DEFAULT_INFERENCE_URL: &str = "https://api-inference.huggingface.co/models";
const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0:8000";

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub generation_api_url: Url,
    pub generation_api_key: String,
    pub generation_model: String,
    pub generation_max_length: usize,
    pub generation_timeout_secs: u64,
    pub embedding_enabled: bool,
    pub embedding_api_url: Url,
    pub embedding_model: String,
    pub public_rps: u32,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let generation_api_url =
            get_env_url("GENERATION_API_URL", DEFAULT_INFERENCE_URL)?;
        let embedding_api_url =
            get_env_url("EMBEDDING_API_URL", generation_api_url.as_str())?;

        Ok(Self {
            server_address: get_env_or("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS),
            generation_api_url,
            generation_api_key: env::var("GENERATION_API_KEY").unwrap_or_default(),
            generation_model: get_env_or("GENERATION_MODEL", "valhalla/t5-base-qg-hl"),
            generation_max_length: get_env_parse_or("GENERATION_MAX_LENGTH", 100)?,
            generation_timeout_secs: get_env_parse_or("GENERATION_TIMEOUT_SECS", 60)?,
            embedding_enabled: get_env_parse_or("EMBEDDING_ENABLED", false)?,
            embedding_api_url,
            embedding_model: get_env_or("EMBEDDING_MODEL", "distilbert-base-uncased"),
            public_rps: get_env_parse_or("PUBLIC_RPS", 20)?,
            log_format: parse_log_format(&get_env_or("LOG_FORMAT", "text"))?,
        })
    }
}

fn get_env_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        _ => Ok(default),
    }
}

fn get_env_url(name: &str, default: &str) -> Result<Url> {
    let raw = get_env_or(name, default);
    Url::parse(&raw).map_err(|e| Error::Config(format!("Invalid URL for {}: {}", name, e)))
}

fn parse_log_format(raw: &str) -> Result<LogFormat> {
    match raw.to_ascii_lowercase().as_str() {
        "text" | "pretty" => Ok(LogFormat::Text),
        "json" => Ok(LogFormat::Json),
        other => Err(Error::Config(format!("Invalid value for LOG_FORMAT: {}", other))),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}
