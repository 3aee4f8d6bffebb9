use crate::config;
use cufi_core::gateways::notify::PushNotificationGateway;
use cufi_gateways::{
    agenda::OpenDataAgenda, fcm::Fcm, log_only::LogOnly, push_to_json_file::PushToJsonFile,
};

pub fn feed_gateway(cfg: &config::Feed) -> OpenDataAgenda {
    let config::Feed {
        api_url,
        app_token,
        timeout,
    } = cfg;
    if app_token.is_none() {
        log::warn!("No app token for the agenda configured: requests might be throttled");
    }
    OpenDataAgenda {
        api_url: api_url.clone(),
        app_token: app_token.clone(),
        timeout: *timeout,
    }
}

pub fn push_gateway(cfg: Option<config::PushGateway>) -> PushGw {
    match cfg {
        Some(config::PushGateway::Fcm {
            api_url,
            server_key,
        }) => {
            log::info!("Use FCM gateway");
            PushGw::new(Fcm {
                api_url,
                server_key,
            })
        }
        Some(config::PushGateway::PushToJsonFile { dir }) => {
            match PushToJsonFile::try_new(&dir) {
                Ok(gw) => {
                    log::info!("Use JSON file push gateway ({})", dir.display());
                    PushGw::new(gw)
                }
                Err(err) => {
                    log::warn!(
                        "Unable to write notifications into {}: {err}",
                        dir.display()
                    );
                    PushGw::new(LogOnly)
                }
            }
        }
        Some(config::PushGateway::LogOnly) => PushGw::new(LogOnly),
        None => {
            log::warn!("No push gateway was configured");
            PushGw::new(LogOnly)
        }
    }
}

pub struct PushGw(Box<dyn PushNotificationGateway + Send + Sync + 'static>);

impl PushGw {
    pub fn new<G>(gw: G) -> Self
    where
        G: PushNotificationGateway + Send + Sync + 'static,
    {
        Self(Box::new(gw))
    }
}

impl PushNotificationGateway for PushGw {
    fn send_push(&self, device_token: &str, title: &str, body: &str) -> anyhow::Result<()> {
        self.0.send_push(device_token, title, body)
    }
}
