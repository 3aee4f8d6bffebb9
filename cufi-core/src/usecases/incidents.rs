use super::prelude::*;

#[derive(Debug, Clone, Default)]
pub struct IncidentUpdate {
    pub description: Option<String>,
    /// Can only be given by admins
    pub response: Option<String>,
    pub resolved: Option<bool>,
}

fn get_accessible_incident<R: IncidentRepo>(
    repo: &R,
    identity: &Identity,
    id: IncidentId,
) -> Result<Incident> {
    let incident = repo
        .get_incident(id)
        .map_err(not_found_as(Error::IncidentNotFound))?;
    if !identity.acts_for(&incident.user_id) {
        return Err(Error::Forbidden);
    }
    Ok(incident)
}

pub fn submit_incident<R>(
    repo: &R,
    identity: &Identity,
    event_id: EventId,
    description: String,
) -> Result<Incident>
where
    R: IncidentRepo + EventRepo,
{
    if repo.try_get_event(event_id)?.is_none() {
        return Err(Error::EventNotFound);
    }
    let new_incident = NewIncident {
        user_id: identity.user_id.clone(),
        event_id,
        description,
    };
    let id = repo.create_incident(&new_incident)?;
    let NewIncident {
        user_id,
        event_id,
        description,
    } = new_incident;
    Ok(Incident {
        id,
        user_id,
        event_id,
        description,
        response: None,
        resolved: false,
    })
}

/// Edit an incident of the caller or, as an admin, any incident.
pub fn edit_incident<R: IncidentRepo>(
    repo: &R,
    identity: &Identity,
    id: IncidentId,
    update: IncidentUpdate,
) -> Result<Incident> {
    let mut incident = get_accessible_incident(repo, identity, id)?;
    let IncidentUpdate {
        description,
        response,
        resolved,
    } = update;
    if let Some(response) = response {
        identity.require_admin()?;
        incident.response = Some(response);
    }
    if let Some(description) = description.filter(|d| !d.is_empty()) {
        incident.description = description;
    }
    if let Some(resolved) = resolved {
        incident.resolved = resolved;
    }
    repo.update_incident(&incident)?;
    Ok(incident)
}

pub fn delete_incident<R: IncidentRepo>(
    repo: &R,
    identity: &Identity,
    id: IncidentId,
) -> Result<()> {
    get_accessible_incident(repo, identity, id)?;
    Ok(repo.delete_incident(id)?)
}

/// Incidents reported by a user. Only admins may query other users.
pub fn incidents_of_user<R: IncidentRepo>(
    repo: &R,
    identity: &Identity,
    user_id: &UserId,
    resolved: Option<bool>,
    pagination: &Pagination,
) -> Result<Vec<Incident>> {
    if !identity.acts_for(user_id) {
        return Err(Error::Forbidden);
    }
    let query = IncidentQuery {
        user_id: Some(user_id),
        resolved,
        ..Default::default()
    };
    Ok(repo.query_incidents(&query, pagination)?)
}

/// Incidents of an event, restricted to the own incidents
/// of non-admin users.
pub fn incidents_of_event<R: IncidentRepo>(
    repo: &R,
    identity: &Identity,
    event_id: EventId,
    resolved: Option<bool>,
    pagination: &Pagination,
) -> Result<Vec<Incident>> {
    let query = IncidentQuery {
        user_id: visible_reporter(identity),
        event_id: Some(event_id),
        resolved,
    };
    Ok(repo.query_incidents(&query, pagination)?)
}

pub fn all_incidents<R: IncidentRepo>(
    repo: &R,
    identity: &Identity,
    pagination: &Pagination,
) -> Result<Vec<Incident>> {
    let query = IncidentQuery {
        user_id: visible_reporter(identity),
        ..Default::default()
    };
    Ok(repo.query_incidents(&query, pagination)?)
}

/// Delete all incidents of an event that the caller is allowed to access.
pub fn delete_incidents_of_event<R: IncidentRepo>(
    repo: &R,
    identity: &Identity,
    event_id: EventId,
) -> Result<usize> {
    let query = IncidentQuery {
        user_id: visible_reporter(identity),
        event_id: Some(event_id),
        ..Default::default()
    };
    Ok(repo.delete_incidents(&query)?)
}

fn visible_reporter(identity: &Identity) -> Option<&UserId> {
    (!identity.is_admin).then_some(&identity.user_id)
}

#[cfg(test)]
mod tests {
    use super::{
        super::{tests::MockDb, *},
        *,
    };
    use cufi_entities::builders::*;

    fn user(id: &str) -> Identity {
        Identity {
            user_id: id.into(),
            is_admin: false,
        }
    }

    fn admin() -> Identity {
        Identity {
            user_id: "admin".into(),
            is_admin: true,
        }
    }

    fn setup() -> (MockDb, EventId) {
        let db = MockDb::default();
        let event_id = db.create_event(&EventDetails::build().finish()).unwrap();
        (db, event_id)
    }

    #[test]
    fn submit_incident_for_existing_event() {
        let (db, event_id) = setup();
        let incident = submit_incident(&db, &user("alice"), event_id, "wrong place".into()).unwrap();
        assert!(!incident.resolved);
        assert_eq!(db.get_incident(incident.id).unwrap(), incident);
        assert!(matches!(
            submit_incident(&db, &user("alice"), EventId::new(9), "?".into()),
            Err(Error::EventNotFound)
        ));
    }

    #[test]
    fn only_reporter_or_admin_edits() {
        let (db, event_id) = setup();
        let incident = submit_incident(&db, &user("alice"), event_id, "wrong place".into()).unwrap();
        let update = IncidentUpdate {
            description: Some("wrong date".into()),
            ..Default::default()
        };
        let err = edit_incident(&db, &user("bob"), incident.id, update.clone()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
        let edited = edit_incident(&db, &user("alice"), incident.id, update).unwrap();
        assert_eq!(edited.description, "wrong date");

        let answer = IncidentUpdate {
            response: Some("fixed".into()),
            resolved: Some(true),
            ..Default::default()
        };
        assert!(matches!(
            edit_incident(&db, &user("alice"), incident.id, answer.clone()),
            Err(Error::AdminOnly)
        ));
        let answered = edit_incident(&db, &admin(), incident.id, answer).unwrap();
        assert!(answered.resolved);
        assert_eq!(answered.response.as_deref(), Some("fixed"));
    }

    #[test]
    fn only_reporter_or_admin_deletes() {
        let (db, event_id) = setup();
        let a = submit_incident(&db, &user("alice"), event_id, "1".into()).unwrap();
        let b = submit_incident(&db, &user("alice"), event_id, "2".into()).unwrap();
        assert!(matches!(
            delete_incident(&db, &user("bob"), a.id),
            Err(Error::Forbidden)
        ));
        assert!(delete_incident(&db, &user("alice"), a.id).is_ok());
        assert!(delete_incident(&db, &admin(), b.id).is_ok());
        assert!(matches!(
            delete_incident(&db, &admin(), b.id),
            Err(Error::IncidentNotFound)
        ));
    }

    #[test]
    fn restrict_visible_incidents() {
        let (db, event_id) = setup();
        submit_incident(&db, &user("alice"), event_id, "1".into()).unwrap();
        submit_incident(&db, &user("bob"), event_id, "2".into()).unwrap();
        let all = Pagination::default();
        assert_eq!(all_incidents(&db, &user("alice"), &all).unwrap().len(), 1);
        assert_eq!(all_incidents(&db, &admin(), &all).unwrap().len(), 2);
        assert_eq!(
            incidents_of_event(&db, &user("bob"), event_id, None, &all).unwrap().len(),
            1
        );
        assert_eq!(
            incidents_of_event(&db, &admin(), event_id, Some(false), &all).unwrap().len(),
            2
        );
        assert!(incidents_of_event(&db, &admin(), event_id, Some(true), &all)
            .unwrap()
            .is_empty());
        assert!(matches!(
            incidents_of_user(&db, &user("bob"), &"alice".into(), None, &all),
            Err(Error::Forbidden)
        ));
        assert_eq!(
            incidents_of_user(&db, &admin(), &"alice".into(), None, &all).unwrap().len(),
            1
        );
    }

    #[test]
    fn delete_incidents_of_event_by_role() {
        let (db, event_id) = setup();
        submit_incident(&db, &user("alice"), event_id, "1".into()).unwrap();
        submit_incident(&db, &user("bob"), event_id, "2".into()).unwrap();
        submit_incident(&db, &user("carol"), event_id, "3".into()).unwrap();
        assert_eq!(delete_incidents_of_event(&db, &user("alice"), event_id).unwrap(), 1);
        assert_eq!(delete_incidents_of_event(&db, &admin(), event_id).unwrap(), 2);
        assert!(db.incidents.borrow().is_empty());
    }
}
