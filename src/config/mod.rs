use anyhow::{anyhow, Result};
use cufi_core::token::SigningSecrets;
use std::{
    env, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    time::Duration,
};
use time::{macros::format_description, Time};

mod raw;

const DEFAULT_CONFIG_FILE_NAME: &str = "culturefinder.toml";

const ENV_NAME_DB_URL: &str = "DATABASE_URL";
const ENV_NAME_FEED_API_KEY: &str = "CUFI_FEED_API_KEY";
const ENV_NAME_FCM_SERVER_KEY: &str = "CUFI_FCM_SERVER_KEY";
const ENV_NAME_SECRET_HS256: &str = "CUFI_SECRET_HS256";
const ENV_NAME_SECRET_HS384: &str = "CUFI_SECRET_HS384";
const ENV_NAME_SECRET_HS512: &str = "CUFI_SECRET_HS512";

pub struct Config {
    pub db: Db,
    pub ingestion: Ingestion,
    pub feed: Feed,
    pub push: Push,
    pub auth: Auth,
}

impl Config {
    pub fn try_load_from_file_or_default<P: AsRef<Path>>(file_path: Option<P>) -> Result<Self> {
        let file_path: &Path = file_path.as_ref().map(|p| p.as_ref()).unwrap_or_else(|| {
            log::info!("No configuration file specified. load {DEFAULT_CONFIG_FILE_NAME}");
            Path::new(DEFAULT_CONFIG_FILE_NAME)
        });

        let raw_config = match fs::read_to_string(file_path) {
            Ok(cfg_string) => toml::from_str(&cfg_string)?,
            Err(err) => match err.kind() {
                ErrorKind::NotFound => {
                    log::info!(
                        "{} not found => load default configuration.",
                        file_path.display()
                    );
                    Ok(raw::Config::default())
                }
                _ => Err(err),
            }?,
        };
        let mut cfg = Self::try_from(raw_config)?;
        if let Ok(db_url) = env::var(ENV_NAME_DB_URL) {
            cfg.db.conn_sqlite = db_url;
        }
        if let Ok(api_key) = env::var(ENV_NAME_FEED_API_KEY) {
            cfg.feed.app_token = Some(api_key);
        }
        cfg.auth.secrets = signing_secrets_from_env()?;
        Ok(cfg)
    }
}

pub struct Db {
    /// SQLite connection
    pub conn_sqlite: String,
    pub conn_pool_size: u8,
}

pub struct Ingestion {
    /// Local wall-clock time of the daily job
    pub daily_at: Time,
    pub notify_near_events: bool,
}

pub struct Feed {
    pub api_url: String,
    pub app_token: Option<String>,
    pub timeout: Duration,
}

pub struct Push {
    pub gateway: Option<PushGateway>,
}

#[derive(Clone)]
pub enum PushGateway {
    Fcm {
        api_url: String,
        server_key: String,
    },
    /// For local testing purposes
    PushToJsonFile {
        /// File system directory for writing notifications into JSON files.
        dir: PathBuf,
    },
    LogOnly,
}

pub struct Auth {
    pub token_lifetime: Option<Duration>,
    /// Random secrets are generated if missing
    pub secrets: Option<SigningSecrets>,
}

fn signing_secrets_from_env() -> Result<Option<SigningSecrets>> {
    let hs256 = env::var(ENV_NAME_SECRET_HS256);
    let hs384 = env::var(ENV_NAME_SECRET_HS384);
    let hs512 = env::var(ENV_NAME_SECRET_HS512);
    match (hs256, hs384, hs512) {
        (Ok(hs256), Ok(hs384), Ok(hs512)) => {
            let secrets = SigningSecrets::from_base64(&hs256, &hs384, &hs512)?;
            Ok(Some(secrets))
        }
        (Err(_), Err(_), Err(_)) => Ok(None),
        _ => Err(anyhow!(
            "Either all or none of {ENV_NAME_SECRET_HS256}, {ENV_NAME_SECRET_HS384} and {ENV_NAME_SECRET_HS512} must be set"
        )),
    }
}

fn parse_daily_at(daily_at: &str) -> Result<Time> {
    Time::parse(daily_at, format_description!("[hour]:[minute]"))
        .map_err(|err| anyhow!("Invalid daily time '{daily_at}': {err}"))
}

impl TryFrom<raw::Config> for Config {
    type Error = anyhow::Error;
    fn try_from(from: raw::Config) -> Result<Self> {
        let defaults = raw::Config::embedded_default()?;
        let raw::Config {
            db,
            ingestion,
            feed,
            push,
            gateway,
            auth,
        } = from;

        let raw::Db {
            connection_sqlite,
            connection_pool_size,
        } = db
            .or(defaults.db)
            .ok_or_else(|| anyhow!("Missing database configuration"))?;
        if connection_pool_size == 0 {
            return Err(anyhow!("The connection pool must not be empty"));
        }
        let db = Db {
            conn_sqlite: connection_sqlite,
            conn_pool_size: connection_pool_size,
        };

        let raw::Ingestion {
            daily_at,
            notify_near_events,
        } = ingestion
            .or(defaults.ingestion)
            .ok_or_else(|| anyhow!("Missing ingestion configuration"))?;
        let ingestion = Ingestion {
            daily_at: parse_daily_at(daily_at.as_deref().unwrap_or("16:00"))?,
            notify_near_events: notify_near_events.unwrap_or(true),
        };

        let raw::Feed {
            api_url,
            app_token,
            timeout,
        } = feed
            .or(defaults.feed)
            .ok_or_else(|| anyhow!("Missing feed configuration"))?;
        let feed = Feed {
            api_url: api_url
                .unwrap_or_else(|| cufi_gateways::agenda::DEFAULT_API_URL.to_owned()),
            app_token,
            timeout: timeout.unwrap_or(cufi_gateways::agenda::DEFAULT_TIMEOUT),
        };

        let push_gateway = match push.or(defaults.push).and_then(|p| p.gateway) {
            Some(gw_name) => {
                let toml_name = gw_name.name();
                let gateway = gateway.or(defaults.gateway).unwrap_or_default();
                let gw = match gw_name {
                    raw::PushGateway::Fcm => {
                        let raw::Fcm {
                            api_url,
                            server_key,
                        } = gateway.fcm.ok_or_else(|| {
                            anyhow!("Missing '{toml_name}' gateway configuration")
                        })?;
                        let server_key = env::var(ENV_NAME_FCM_SERVER_KEY)
                            .ok()
                            .or(server_key)
                            .ok_or_else(|| {
                                anyhow!("Missing server key of '{toml_name}' gateway")
                            })?;
                        let api_url = api_url
                            .unwrap_or_else(|| cufi_gateways::fcm::DEFAULT_API_URL.to_owned());
                        PushGateway::Fcm {
                            api_url,
                            server_key,
                        }
                    }
                    raw::PushGateway::PushToJsonFile => {
                        let raw::PushToJsonFile { dir } =
                            gateway.push_to_json_file.ok_or_else(|| {
                                anyhow!("Missing '{toml_name}' gateway configuration")
                            })?;
                        PushGateway::PushToJsonFile { dir }
                    }
                    raw::PushGateway::LogOnly => PushGateway::LogOnly,
                };
                Some(gw)
            }
            None => None,
        };
        let push = Push {
            gateway: push_gateway,
        };

        let raw::Auth { token_lifetime } = auth.or(defaults.auth).unwrap_or_default();
        let auth = Auth {
            token_lifetime,
            secrets: None,
        };

        Ok(Self {
            db,
            ingestion,
            feed,
            push,
            auth,
        })
    }
}
