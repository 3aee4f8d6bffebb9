use super::*;

pub fn attend_event(
    connections: &sqlite::Connections,
    tokens: &TokenService,
    token: &str,
    event_id: EventId,
) -> Result<Assistance> {
    Ok(connections.exclusive()?.transaction(|conn| {
        let identity = usecases::resolve_identity(conn, tokens, token)?;
        usecases::attend_event(conn, &identity, event_id)
    })?)
}

pub fn cancel_assistance(
    connections: &sqlite::Connections,
    tokens: &TokenService,
    token: &str,
    event_id: EventId,
) -> Result<()> {
    Ok(connections.exclusive()?.transaction(|conn| {
        let identity = usecases::resolve_identity(conn, tokens, token)?;
        usecases::cancel_assistance(conn, &identity, event_id)
    })?)
}

pub fn attended_events(
    connections: &sqlite::Connections,
    tokens: &TokenService,
    token: &str,
    pagination: &Pagination,
) -> Result<Vec<DecoratedEvent>> {
    let db = connections.shared()?;
    let identity = usecases::resolve_identity(&db, tokens, token)?;
    Ok(usecases::attended_events(&db, &identity, pagination)?)
}
