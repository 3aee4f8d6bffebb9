use super::prelude::*;
use crate::rating::decorate_events;

pub fn attend_event<R>(repo: &R, identity: &Identity, event_id: EventId) -> Result<Assistance>
where
    R: AssistanceRepo + EventRepo,
{
    if repo.try_get_event(event_id)?.is_none() {
        return Err(Error::EventNotFound);
    }
    if repo.exists_assistance(&identity.user_id, event_id)? {
        return Err(Error::AlreadyAttending);
    }
    let assistance = Assistance {
        user_id: identity.user_id.clone(),
        event_id,
    };
    repo.create_assistance(&assistance)
        .map_err(exists_as(Error::AlreadyAttending))?;
    Ok(assistance)
}

pub fn cancel_assistance<R: AssistanceRepo>(
    repo: &R,
    identity: &Identity,
    event_id: EventId,
) -> Result<()> {
    repo.delete_assistance(&identity.user_id, event_id)
        .map_err(not_found_as(Error::AssistanceNotFound))
}

pub fn is_attending<R: AssistanceRepo>(
    repo: &R,
    identity: &Identity,
    event_id: EventId,
) -> Result<bool> {
    Ok(repo.exists_assistance(&identity.user_id, event_id)?)
}

/// All events the user is going to attend.
pub fn attended_events<R>(
    repo: &R,
    identity: &Identity,
    pagination: &Pagination,
) -> Result<Vec<DecoratedEvent>>
where
    R: AssistanceRepo + EventRepo + RatingRepo,
{
    let ids = repo.event_ids_attended_by(&identity.user_id)?;
    let events = pagination
        .apply(ids)
        .into_iter()
        .map(|id| repo.get_event(id).map_err(not_found_as(Error::EventNotFound)))
        .collect::<Result<Vec<_>>>()?;
    Ok(decorate_events(repo, events)?)
}

pub fn all_assistances<R: AssistanceRepo>(
    repo: &R,
    pagination: &Pagination,
) -> Result<Vec<Assistance>> {
    Ok(repo.all_assistances(pagination)?)
}

#[cfg(test)]
mod tests {
    use super::{
        super::{tests::MockDb, *},
        *,
    };
    use cufi_entities::builders::*;

    fn identity(id: &str) -> Identity {
        Identity {
            user_id: id.into(),
            is_admin: false,
        }
    }

    #[test]
    fn attend_event_once() {
        let db = MockDb::default();
        let id = db.create_event(&EventDetails::build().finish()).unwrap();
        let alice = identity("alice");
        assert!(attend_event(&db, &alice, id).is_ok());
        let err = attend_event(&db, &alice, id).unwrap_err();
        assert!(matches!(err, Error::AlreadyAttending));
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
        assert!(is_attending(&db, &alice, id).unwrap());
        assert!(attend_event(&db, &identity("bob"), id).is_ok());
        assert_eq!(db.count_assistants(id).unwrap(), 2);
    }

    #[test]
    fn attend_missing_event() {
        let db = MockDb::default();
        assert!(matches!(
            attend_event(&db, &identity("alice"), EventId::new(5)),
            Err(Error::EventNotFound)
        ));
    }

    #[test]
    fn cancel_assistance_once() {
        let db = MockDb::default();
        let id = db.create_event(&EventDetails::build().finish()).unwrap();
        let alice = identity("alice");
        attend_event(&db, &alice, id).unwrap();
        assert!(cancel_assistance(&db, &alice, id).is_ok());
        assert!(!is_attending(&db, &alice, id).unwrap());
        let err = cancel_assistance(&db, &alice, id).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn list_attended_events() {
        let db = MockDb::default();
        let a = db.create_event(&EventDetails::build().denomination("a").finish()).unwrap();
        let b = db.create_event(&EventDetails::build().denomination("b").finish()).unwrap();
        let alice = identity("alice");
        attend_event(&db, &alice, a).unwrap();
        attend_event(&db, &alice, b).unwrap();
        attend_event(&db, &identity("bob"), b).unwrap();
        let events = attended_events(&db, &alice, &Pagination::default()).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(all_assistances(&db, &Pagination::page(0, 2)).unwrap().len(), 2);
        assert_eq!(all_assistances(&db, &Pagination::page(1, 2)).unwrap().len(), 1);
    }
}
