use std::collections::BTreeSet;

use super::prelude::*;
use crate::{filter::EventFilter, rating::decorate_events};

/// Search events that match all given criteria.
///
/// Without a lower bound for the start date only events starting
/// `today` or later are considered.
pub fn find_events<R>(
    repo: &R,
    mut filter: EventFilter,
    today: Date,
    pagination: &Pagination,
) -> Result<Vec<DecoratedEvent>>
where
    R: EventRepo + RatingRepo + AssistanceRepo,
{
    if filter.date_from.is_none() {
        filter.date_from = Some(today);
    }
    let events = repo.query_events(&filter, pagination)?;
    Ok(decorate_events(repo, events)?)
}

pub fn get_event<R>(repo: &R, id: EventId) -> Result<DecoratedEvent>
where
    R: EventRepo + RatingRepo + AssistanceRepo,
{
    let event = repo.get_event(id).map_err(not_found_as(Error::EventNotFound))?;
    Ok(crate::rating::decorate_event(repo, event)?)
}

pub fn all_events<R>(repo: &R, pagination: &Pagination) -> Result<Vec<DecoratedEvent>>
where
    R: EventRepo + RatingRepo + AssistanceRepo,
{
    let events = repo.all_events(pagination)?;
    Ok(decorate_events(repo, events)?)
}

/// Store a new event unless an event with the same
/// start, end, denomination and description exists.
pub fn create_event<R: EventRepo>(repo: &R, details: EventDetails) -> Result<Event> {
    if repo.exists_event_with_key(&details.dedup_key())? {
        return Err(Error::EventExists);
    }
    let id = repo.create_event(&details)?;
    Ok(Event { id, details })
}

pub fn update_event<R: EventRepo>(repo: &R, id: EventId, details: EventDetails) -> Result<Event> {
    if repo.try_get_event(id)?.is_none() {
        return Err(Error::EventNotFound);
    }
    let event = Event { id, details };
    repo.update_event(&event)?;
    Ok(event)
}

/// Delete an event and everything that refers to it.
pub fn delete_event<R>(repo: &R, id: EventId) -> Result<()>
where
    R: EventRepo + RatingRepo + AssistanceRepo + IncidentRepo + SavedListRepo,
{
    if repo.try_get_event(id)?.is_none() {
        return Err(Error::EventNotFound);
    }
    repo.delete_assistances_of_event(id)?;
    repo.delete_ratings_of_event(id)?;
    repo.delete_incidents(&IncidentQuery {
        event_id: Some(id),
        ..Default::default()
    })?;
    repo.remove_event_from_all_lists(id)?;
    repo.delete_event(id)?;
    Ok(())
}

/// All distinct tags of the taxonomy that can be used for filtering.
pub fn all_categories<R: EventRepo>(repo: &R) -> Result<Vec<String>> {
    let values = repo.all_taxonomy_values()?;
    let categories: BTreeSet<_> = values
        .iter()
        .flat_map(|tags| split_tags(tags))
        .map(str::trim)
        .filter(|tag| !tag.is_empty() && *tag != "null")
        .collect();
    Ok(categories.into_iter().map(ToOwned::to_owned).collect())
}
