use super::prelude::*;
use crate::rating::decorate_event;

/// Rate an event once.
///
/// Changing a rating requires to unrate the event first.
pub fn rate_event<R>(
    repo: &R,
    identity: &Identity,
    event_id: EventId,
    score: f64,
) -> Result<DecoratedEvent>
where
    R: EventRepo + RatingRepo + AssistanceRepo,
{
    let event = repo
        .get_event(event_id)
        .map_err(not_found_as(Error::EventNotFound))?;
    if repo.try_get_rating(event_id, &identity.user_id)?.is_some() {
        return Err(Error::AlreadyRated);
    }
    let rating = Rating {
        event_id,
        user_id: identity.user_id.clone(),
        score,
    };
    repo.create_rating(&rating)
        .map_err(exists_as(Error::AlreadyRated))?;
    Ok(decorate_event(repo, event)?)
}

pub fn unrate_event<R>(repo: &R, identity: &Identity, event_id: EventId) -> Result<()>
where
    R: EventRepo + RatingRepo,
{
    if repo.try_get_event(event_id)?.is_none() {
        return Err(Error::EventNotFound);
    }
    repo.delete_rating(event_id, &identity.user_id)
        .map_err(not_found_as(Error::RatingNotFound))
}

/// The score the user has given to an event, if any.
pub fn get_rating<R: RatingRepo>(
    repo: &R,
    identity: &Identity,
    event_id: EventId,
) -> Result<Option<f64>> {
    Ok(repo
        .try_get_rating(event_id, &identity.user_id)?
        .map(|r| r.score))
}

pub fn is_event_rated<R: RatingRepo>(
    repo: &R,
    identity: &Identity,
    event_id: EventId,
) -> Result<bool> {
    Ok(get_rating(repo, identity, event_id)?.is_some())
}
