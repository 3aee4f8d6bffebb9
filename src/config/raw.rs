use duration_str::deserialize_option_duration;
use serde::Deserialize;
use std::{path::PathBuf, time::Duration};

const DEFAULT_CONFIG_FILE: &str = include_str!("culturefinder.default.toml");

#[derive(Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub db: Option<Db>,
    pub ingestion: Option<Ingestion>,
    pub feed: Option<Feed>,
    pub push: Option<Push>,
    pub gateway: Option<Gateway>,
    pub auth: Option<Auth>,
}

impl Config {
    pub fn embedded_default() -> Result<Self, toml::de::Error> {
        toml::from_str(DEFAULT_CONFIG_FILE)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Db {
    pub connection_sqlite: String,
    pub connection_pool_size: u8,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Ingestion {
    pub daily_at: Option<String>,
    pub notify_near_events: Option<bool>,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Feed {
    pub api_url: Option<String>,
    pub app_token: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_duration")]
    pub timeout: Option<Duration>,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Push {
    pub gateway: Option<PushGateway>,
}

#[derive(Clone, Copy, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PushGateway {
    Fcm,
    PushToJsonFile,
    LogOnly,
}

impl PushGateway {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Fcm => "fcm",
            Self::PushToJsonFile => "push-to-json-file",
            Self::LogOnly => "log-only",
        }
    }
}

#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Gateway {
    pub fcm: Option<Fcm>,
    pub push_to_json_file: Option<PushToJsonFile>,
}

#[derive(Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Fcm {
    pub api_url: Option<String>,
    pub server_key: Option<String>,
}

#[derive(Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PushToJsonFile {
    pub dir: PathBuf,
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Auth {
    #[serde(default, deserialize_with = "deserialize_option_duration")]
    pub token_lifetime: Option<Duration>,
}
