use cufi_core::usecases::ListOverview;

use super::*;

pub fn create_list(
    connections: &sqlite::Connections,
    tokens: &TokenService,
    token: &str,
    name: &str,
) -> Result<SavedList> {
    Ok(connections.exclusive()?.transaction(|conn| {
        let identity = usecases::resolve_identity(conn, tokens, token)?;
        usecases::create_list(conn, &identity, name)
    })?)
}

pub fn add_event_to_list(
    connections: &sqlite::Connections,
    tokens: &TokenService,
    token: &str,
    list_id: ListId,
    event_id: EventId,
) -> Result<ListOverview> {
    Ok(connections.exclusive()?.transaction(|conn| {
        let identity = usecases::resolve_identity(conn, tokens, token)?;
        usecases::add_event_to_list(conn, &identity, list_id, event_id)
    })?)
}

pub fn remove_event_from_list(
    connections: &sqlite::Connections,
    tokens: &TokenService,
    token: &str,
    list_id: ListId,
    event_id: EventId,
) -> Result<SavedList> {
    Ok(connections.exclusive()?.transaction(|conn| {
        let identity = usecases::resolve_identity(conn, tokens, token)?;
        usecases::remove_event_from_list(conn, &identity, list_id, event_id)
    })?)
}

pub fn delete_list(
    connections: &sqlite::Connections,
    tokens: &TokenService,
    token: &str,
    list_id: ListId,
) -> Result<()> {
    Ok(connections.exclusive()?.transaction(|conn| {
        let identity = usecases::resolve_identity(conn, tokens, token)?;
        usecases::delete_list(conn, &identity, list_id)
    })?)
}

pub fn lists_of_user(
    connections: &sqlite::Connections,
    tokens: &TokenService,
    token: &str,
    pagination: &Pagination,
) -> Result<Vec<ListOverview>> {
    let db = connections.shared()?;
    let identity = usecases::resolve_identity(&db, tokens, token)?;
    Ok(usecases::lists_of_user(&db, &identity, pagination)?)
}
