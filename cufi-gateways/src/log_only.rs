use anyhow::Result;
use cufi_core::gateways::notify::PushNotificationGateway;

/// Only logs push notifications instead of sending them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogOnly;

impl PushNotificationGateway for LogOnly {
    fn send_push(&self, device_token: &str, title: &str, body: &str) -> Result<()> {
        log::info!("Push notification for device {device_token}: {title} - {body}");
        Ok(())
    }
}
