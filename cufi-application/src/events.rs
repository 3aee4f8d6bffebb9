use cufi_core::filter::EventFilter;

use super::*;

pub fn find_events(
    connections: &sqlite::Connections,
    filter: EventFilter,
    today: Date,
    pagination: &Pagination,
) -> Result<Vec<DecoratedEvent>> {
    let db = connections.shared()?;
    Ok(usecases::find_events(&db, filter, today, pagination)?)
}

pub fn suggested_events(
    connections: &sqlite::Connections,
    tokens: &TokenService,
    token: &str,
    today: Date,
    pagination: &Pagination,
) -> Result<Vec<DecoratedEvent>> {
    let db = connections.shared()?;
    let identity = usecases::resolve_identity(&db, tokens, token)?;
    Ok(usecases::suggested_events(&db, &identity, today, pagination)?)
}

pub fn popular_events(
    connections: &sqlite::Connections,
    pagination: &Pagination,
) -> Result<Vec<DecoratedEvent>> {
    let db = connections.shared()?;
    Ok(usecases::popular_events(&db, pagination)?)
}

/// Delete an event together with everything that refers to it.
pub fn delete_event(connections: &sqlite::Connections, id: EventId) -> Result<()> {
    Ok(connections
        .exclusive()?
        .transaction(|conn| usecases::delete_event(conn, id))?)
}
