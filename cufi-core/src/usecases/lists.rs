use super::prelude::*;
use crate::rating::decorate_events;

const MAX_PREVIEW_IMAGES: usize = 4;

/// A saved list together with images of its events.
#[derive(Debug, Clone, PartialEq)]
pub struct ListOverview {
    pub list: SavedList,
    pub preview_images: Vec<String>,
}

fn get_own_list<R: SavedListRepo>(repo: &R, identity: &Identity, id: ListId) -> Result<SavedList> {
    let list = repo.get_list(id).map_err(not_found_as(Error::ListNotFound))?;
    if !list.is_owned_by(&identity.user_id) {
        return Err(Error::NotListOwner);
    }
    Ok(list)
}

/// Create a new, empty list.
///
/// The name of the favorites list is reserved.
pub fn create_list<R>(repo: &R, identity: &Identity, name: &str) -> Result<SavedList>
where
    R: SavedListRepo,
{
    if name == FAVORITES_LIST_NAME {
        return Err(Error::ReservedListName);
    }
    let new_list = NewSavedList {
        owner: identity.user_id.clone(),
        name: name.to_owned(),
        description: DEFAULT_LIST_DESCRIPTION.to_owned(),
    };
    let id = repo.create_list(&new_list)?;
    let NewSavedList {
        owner,
        name,
        description,
    } = new_list;
    Ok(SavedList {
        id,
        owner,
        name,
        description,
        events: Default::default(),
    })
}

/// Rename a list or change its description.
///
/// Empty values keep the current value.
pub fn edit_list<R>(
    repo: &R,
    identity: &Identity,
    id: ListId,
    name: Option<&str>,
    description: Option<&str>,
) -> Result<SavedList>
where
    R: SavedListRepo,
{
    let mut list = get_own_list(repo, identity, id)?;
    if let Some(name) = name.filter(|n| !n.is_empty()) {
        list.name = name.to_owned();
    }
    if let Some(description) = description.filter(|d| !d.is_empty()) {
        list.description = description.to_owned();
    }
    if list.is_favorites() {
        return Err(Error::ReservedListName);
    }
    repo.update_list(&list)?;
    Ok(list)
}

pub fn delete_list<R: SavedListRepo>(repo: &R, identity: &Identity, id: ListId) -> Result<()> {
    get_own_list(repo, identity, id)?;
    Ok(repo.delete_list(id)?)
}

pub fn add_event_to_list<R>(
    repo: &R,
    identity: &Identity,
    id: ListId,
    event_id: EventId,
) -> Result<ListOverview>
where
    R: SavedListRepo + EventRepo,
{
    let mut list = get_own_list(repo, identity, id)?;
    if list.events.contains(&event_id) {
        return Err(Error::EventAlreadyInList);
    }
    if repo.try_get_event(event_id)?.is_none() {
        return Err(Error::EventNotFound);
    }
    repo.add_event_to_list(id, event_id)
        .map_err(exists_as(Error::EventAlreadyInList))?;
    list.events.insert(event_id);
    overview(repo, list)
}

pub fn remove_event_from_list<R>(
    repo: &R,
    identity: &Identity,
    id: ListId,
    event_id: EventId,
) -> Result<SavedList>
where
    R: SavedListRepo,
{
    let mut list = get_own_list(repo, identity, id)?;
    if !list.events.remove(&event_id) {
        return Err(Error::EventNotInList);
    }
    repo.remove_event_from_list(id, event_id)
        .map_err(not_found_as(Error::EventNotInList))?;
    Ok(list)
}

pub fn lists_of_user<R>(
    repo: &R,
    identity: &Identity,
    pagination: &Pagination,
) -> Result<Vec<ListOverview>>
where
    R: SavedListRepo + EventRepo,
{
    repo.lists_of_user(&identity.user_id, pagination)?
        .into_iter()
        .map(|list| overview(repo, list))
        .collect()
}

pub fn events_of_list<R>(
    repo: &R,
    identity: &Identity,
    id: ListId,
    pagination: &Pagination,
) -> Result<Vec<DecoratedEvent>>
where
    R: SavedListRepo + EventRepo + RatingRepo + AssistanceRepo,
{
    let list = get_own_list(repo, identity, id)?;
    let events = pagination
        .apply(list.events)
        .into_iter()
        .map(|event_id| repo.get_event(event_id).map_err(not_found_as(Error::EventNotFound)))
        .collect::<Result<Vec<_>>>()?;
    Ok(decorate_events(repo, events)?)
}

fn overview<R: EventRepo>(repo: &R, list: SavedList) -> Result<ListOverview> {
    let mut preview_images = Vec::with_capacity(MAX_PREVIEW_IMAGES);
    for event_id in &list.events {
        if preview_images.len() >= MAX_PREVIEW_IMAGES {
            break;
        }
        let event = repo
            .get_event(*event_id)
            .map_err(not_found_as(Error::EventNotFound))?;
        preview_images.extend(
            event
                .details
                .image_paths()
                .take(MAX_PREVIEW_IMAGES - preview_images.len())
                .map(ToOwned::to_owned),
        );
    }
    Ok(ListOverview {
        list,
        preview_images,
    })
}
