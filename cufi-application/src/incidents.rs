use cufi_core::usecases::IncidentUpdate;

use super::*;

pub fn submit_incident(
    connections: &sqlite::Connections,
    tokens: &TokenService,
    token: &str,
    event_id: EventId,
    description: String,
) -> Result<Incident> {
    let incident = connections.exclusive()?.transaction(|conn| {
        let identity = usecases::resolve_identity(conn, tokens, token)?;
        usecases::submit_incident(conn, &identity, event_id, description)
    })?;
    info!(
        "User {} reported incident {} for event {}",
        incident.user_id, incident.id, incident.event_id
    );
    Ok(incident)
}

pub fn edit_incident(
    connections: &sqlite::Connections,
    tokens: &TokenService,
    token: &str,
    id: IncidentId,
    update: IncidentUpdate,
) -> Result<Incident> {
    Ok(connections.exclusive()?.transaction(|conn| {
        let identity = usecases::resolve_identity(conn, tokens, token)?;
        usecases::edit_incident(conn, &identity, id, update)
    })?)
}

pub fn all_incidents(
    connections: &sqlite::Connections,
    tokens: &TokenService,
    token: &str,
    pagination: &Pagination,
) -> Result<Vec<Incident>> {
    let db = connections.shared()?;
    let identity = usecases::resolve_identity(&db, tokens, token)?;
    Ok(usecases::all_incidents(&db, &identity, pagination)?)
}
