use anyhow::Result as Fallible;

pub trait PushNotificationGateway {
    fn send_push(&self, device_token: &str, title: &str, body: &str) -> Fallible<()>;
}
