use std::time::Duration;

use super::*;

pub fn login(
    connections: &sqlite::Connections,
    tokens: &TokenService,
    user_id: &UserId,
    device_token: Option<String>,
    token_lifetime: Option<Duration>,
) -> Result<String> {
    Ok(connections.exclusive()?.transaction(|conn| {
        usecases::login(conn, tokens, user_id, device_token, token_lifetime)
    })?)
}

pub fn logout(connections: &sqlite::Connections, token: &str) -> Result<UserId> {
    let user_id = connections
        .exclusive()?
        .transaction(|conn| usecases::logout(conn, token))?;
    debug!("User {user_id} logged out");
    Ok(user_id)
}

pub fn resolve_identity(
    connections: &sqlite::Connections,
    tokens: &TokenService,
    token: &str,
) -> Result<usecases::Identity> {
    let db = connections.shared()?;
    Ok(usecases::resolve_identity(&db, tokens, token)?)
}
