use super::prelude::*;
use crate::rating::{decorate_event, decorate_events};

/// Upcoming events tagged with any of the preferred categories of the user.
///
/// The results of all categories are concatenated, i.e. an event that
/// matches several categories is contained several times.
pub fn suggested_events<R>(
    repo: &R,
    identity: &Identity,
    today: Date,
    pagination: &Pagination,
) -> Result<Vec<DecoratedEvent>>
where
    R: UserRepo + EventRepo + RatingRepo + AssistanceRepo,
{
    let user = repo
        .get_user(&identity.user_id)
        .map_err(not_found_as(Error::UserNotFound))?;
    let mut events = Vec::new();
    for category in user.preferred_category_tokens() {
        events.extend(repo.events_tagged_with(category, today, pagination)?);
    }
    Ok(decorate_events(repo, events)?)
}

/// Events ordered by their number of assistants.
pub fn popular_events<R>(repo: &R, pagination: &Pagination) -> Result<Vec<DecoratedEvent>>
where
    R: EventRepo + RatingRepo + AssistanceRepo,
{
    repo.most_attended_event_ids(pagination)?
        .into_iter()
        .map(|(id, number_of_assistants)| {
            let event = repo.get_event(id).map_err(|err| {
                if matches!(err, RepoError::NotFound) {
                    log::warn!("Event {id} with {number_of_assistants} assistant(s) does not exist");
                }
                not_found_as(Error::EventNotFound)(err)
            })?;
            Ok(decorate_event(repo, event)?)
        })
        .collect()
}
