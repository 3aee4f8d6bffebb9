use anyhow::{anyhow, Result};
use cufi_core::gateways::notify::PushNotificationGateway;
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_URL: &str = "https://fcm.googleapis.com/fcm/send";

/// Push notifications through Firebase Cloud Messaging.
#[derive(Debug, Clone)]
pub struct Fcm {
    pub api_url: String,
    pub server_key: String,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    to: &'a str,
    notification: Notification<'a>,
}

#[derive(Debug, Serialize)]
struct Notification<'a> {
    title: &'a str,
    body: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct SendResponse {
    #[serde(default)]
    failure: u64,
    #[serde(default)]
    results: Vec<SendResult>,
}

#[derive(Debug, Default, Deserialize)]
struct SendResult {
    error: Option<String>,
}

impl SendResponse {
    fn into_result(self) -> Result<()> {
        if self.failure == 0 {
            return Ok(());
        }
        let reason = self
            .results
            .into_iter()
            .find_map(|r| r.error)
            .unwrap_or_else(|| "unknown".to_owned());
        Err(anyhow!("Push notification rejected: {reason}"))
    }
}

#[cfg(not(test))]
fn send_raw(url: &str, server_key: &str, message: &Message) -> Result<SendResponse> {
    let client = reqwest::blocking::Client::new();
    let response = client
        .post(url)
        .header("Authorization", format!("key={server_key}"))
        .json(message)
        .send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(anyhow!("Push provider responded with status {status}"));
    }
    log::debug!("Push provider response: {status}");
    Ok(response.json()?)
}

/// Don't actually send notifications while running the tests.
#[cfg(test)]
fn send_raw(_: &str, _: &str, message: &Message) -> Result<SendResponse> {
    log::debug!("Would send push notification: {message:?}");
    Ok(SendResponse::default())
}

impl PushNotificationGateway for Fcm {
    fn send_push(&self, device_token: &str, title: &str, body: &str) -> Result<()> {
        if device_token.is_empty() {
            return Err(anyhow!("Missing device token"));
        }
        let message = Message {
            to: device_token,
            notification: Notification { title, body },
        };
        send_raw(&self.api_url, &self.server_key, &message)?.into_result()
    }
}
