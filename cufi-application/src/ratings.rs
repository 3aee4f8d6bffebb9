use super::*;

pub fn rate_event(
    connections: &sqlite::Connections,
    tokens: &TokenService,
    token: &str,
    event_id: EventId,
    score: f64,
) -> Result<DecoratedEvent> {
    Ok(connections.exclusive()?.transaction(|conn| {
        let identity = usecases::resolve_identity(conn, tokens, token)?;
        usecases::rate_event(conn, &identity, event_id, score)
    })?)
}

pub fn unrate_event(
    connections: &sqlite::Connections,
    tokens: &TokenService,
    token: &str,
    event_id: EventId,
) -> Result<()> {
    Ok(connections.exclusive()?.transaction(|conn| {
        let identity = usecases::resolve_identity(conn, tokens, token)?;
        usecases::unrate_event(conn, &identity, event_id)
    })?)
}
