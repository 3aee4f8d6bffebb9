use cufi_core::gateways::notify::PushNotificationGateway;

use super::*;

pub fn notify_near_events<G>(
    connections: &sqlite::Connections,
    gateway: &G,
    today: Date,
) -> Result<usize>
where
    G: PushNotificationGateway + ?Sized,
{
    let db = connections.shared()?;
    let sent = usecases::notify_near_events(&db, gateway, today)?;
    info!("Sent {sent} notification(s) about near events");
    Ok(sent)
}

pub fn notify_all_logged_in_users<G>(
    connections: &sqlite::Connections,
    gateway: &G,
    tokens: &TokenService,
    token: &str,
) -> Result<usize>
where
    G: PushNotificationGateway + ?Sized,
{
    let db = connections.shared()?;
    let identity = usecases::resolve_identity(&db, tokens, token)?;
    Ok(usecases::notify_all_logged_in_users(&db, gateway, &identity)?)
}
