use anyhow::Result;
use cufi_core::{entities::Timestamp, gateways::notify::PushNotificationGateway};
use jfs::Store;
use serde::{Deserialize, Serialize};
use std::{io, path::Path};

/// A dummy push gateway for testing purposes.
pub struct PushToJsonFile {
    json_store: Store,
}

impl PushToJsonFile {
    pub fn try_new<P: AsRef<Path>>(directory: P) -> io::Result<Self> {
        let json_store = Store::new(directory)?;
        Ok(Self { json_store })
    }
    pub fn path(&self) -> &Path {
        self.json_store.path()
    }
}

#[derive(Debug, Deserialize, Serialize)]
struct JsonPush {
    device_token: String,
    title: String,
    body: String,
}

impl PushNotificationGateway for PushToJsonFile {
    fn send_push(&self, device_token: &str, title: &str, body: &str) -> Result<()> {
        let now = Timestamp::now().as_seconds();
        let key = format!("{now}-{device_token}");
        let push = JsonPush {
            device_token: device_token.to_owned(),
            title: title.to_owned(),
            body: body.to_owned(),
        };
        self.json_store.save_with_id(&push, &key)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_notifications() {
        let dir = tempfile::tempdir().unwrap();
        let gw = PushToJsonFile::try_new(dir.path()).unwrap();
        gw.send_push("device", "title", "body").unwrap();
        let saved = gw.json_store.all::<JsonPush>().unwrap();
        assert_eq!(saved.len(), 1);
        let push = saved.values().next().unwrap();
        assert_eq!(push.device_token, "device");
        assert_eq!(push.title, "title");
    }
}
