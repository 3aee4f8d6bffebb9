use super::*;

pub fn register_user(
    connections: &sqlite::Connections,
    new_user: usecases::NewUser,
) -> Result<User> {
    Ok(connections
        .exclusive()?
        .transaction(|conn| usecases::register_user(conn, new_user))?)
}

/// Delete the user of the session including all owned data.
///
/// Either everything is deleted or nothing.
pub fn delete_user(
    connections: &sqlite::Connections,
    tokens: &TokenService,
    token: &str,
) -> Result<()> {
    Ok(connections.exclusive()?.transaction(|conn| {
        let identity = usecases::resolve_identity(conn, tokens, token)?;
        usecases::delete_user(conn, &identity).map_err(|err| {
            warn!("Failed to delete user {}: {}", identity.user_id, err);
            err
        })
    })?)
}
