// Low-level database access traits.
// Each repository is responsible for a single entity and
// its relationships. Related entities are only referenced
// by their id and never modified or loaded by another
// repository.

use crate::{entities::*, filter::EventFilter};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("The requested object could not be found")]
    NotFound,
    #[error("The object already exists")]
    AlreadyExists,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

type Result<T> = std::result::Result<T, Error>;

#[derive(Clone, Debug, Copy, Default, PartialEq, Eq, Hash)]
pub struct Pagination {
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

impl Pagination {
    /// The zero-based `page` of the given `size`.
    pub const fn page(page: u64, size: u64) -> Self {
        Self {
            offset: Some(page * size),
            limit: Some(size),
        }
    }

    /// Slice an in-memory result set.
    pub fn apply<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        let offset = self.offset.unwrap_or(0) as usize;
        let iter = items.into_iter().skip(offset);
        match self.limit {
            Some(limit) => iter.take(limit as usize).collect(),
            None => iter.collect(),
        }
    }
}

pub trait EventRepo {
    fn create_event(&self, details: &EventDetails) -> Result<EventId>;
    fn update_event(&self, event: &Event) -> Result<()>;
    fn delete_event(&self, id: EventId) -> Result<()>;

    fn get_event(&self, id: EventId) -> Result<Event>;
    fn try_get_event(&self, id: EventId) -> Result<Option<Event>>;
    fn exists_event_with_key(&self, key: &EventKey) -> Result<bool>;

    fn all_events(&self, pagination: &Pagination) -> Result<Vec<Event>>;

    // All criteria are combined conjunctively, missing criteria
    // are unconstrained.
    fn query_events(&self, filter: &EventFilter, pagination: &Pagination) -> Result<Vec<Event>>;

    // Events starting on or after `since` that contain `tag` in
    // any of the taxonomy fields.
    fn events_tagged_with(
        &self,
        tag: &str,
        since: Date,
        pagination: &Pagination,
    ) -> Result<Vec<Event>>;

    // The raw, comma-joined ambit, category and other-categories
    // values of all events.
    fn all_taxonomy_values(&self) -> Result<Vec<String>>;
}

pub trait RatingRepo {
    fn create_rating(&self, rating: &Rating) -> Result<()>;
    fn delete_rating(&self, event_id: EventId, user_id: &UserId) -> Result<()>;

    fn try_get_rating(&self, event_id: EventId, user_id: &UserId) -> Result<Option<Rating>>;
    fn load_ratings_of_event(&self, event_id: EventId) -> Result<Vec<Rating>>;

    fn delete_ratings_of_user(&self, user_id: &UserId) -> Result<usize>;
    fn delete_ratings_of_event(&self, event_id: EventId) -> Result<usize>;
}

pub trait AssistanceRepo {
    fn create_assistance(&self, assistance: &Assistance) -> Result<()>;
    fn delete_assistance(&self, user_id: &UserId, event_id: EventId) -> Result<()>;
    fn exists_assistance(&self, user_id: &UserId, event_id: EventId) -> Result<bool>;

    fn all_assistances(&self, pagination: &Pagination) -> Result<Vec<Assistance>>;
    fn event_ids_attended_by(&self, user_id: &UserId) -> Result<Vec<EventId>>;
    fn count_assistants(&self, event_id: EventId) -> Result<u64>;

    // Event ids ordered by the number of assistances (descending).
    fn most_attended_event_ids(&self, pagination: &Pagination) -> Result<Vec<(EventId, u64)>>;

    fn delete_assistances_of_user(&self, user_id: &UserId) -> Result<usize>;
    fn delete_assistances_of_event(&self, event_id: EventId) -> Result<usize>;
}

pub trait UserRepo {
    fn create_user(&self, user: &User) -> Result<()>;
    fn update_user(&self, user: &User) -> Result<()>;
    fn delete_user(&self, id: &UserId) -> Result<()>;

    fn get_user(&self, id: &UserId) -> Result<User>;
    fn try_get_user(&self, id: &UserId) -> Result<Option<User>>;
    fn all_users(&self, pagination: &Pagination) -> Result<Vec<User>>;
}

pub trait SessionRepo {
    fn create_session(&self, session: &Session) -> Result<()>;
    fn delete_session_of_user(&self, user_id: &UserId) -> Result<usize>;

    fn try_get_session_of_user(&self, user_id: &UserId) -> Result<Option<Session>>;
    fn try_get_session_by_token(&self, token: &str) -> Result<Option<Session>>;
    fn all_logged_in_user_ids(&self) -> Result<Vec<UserId>>;

    fn device_token_of_user(&self, user_id: &UserId) -> Result<Option<String>> {
        Ok(self
            .try_get_session_of_user(user_id)?
            .and_then(|s| s.device_token))
    }
}

pub trait SavedListRepo {
    fn create_list(&self, list: &NewSavedList) -> Result<ListId>;
    // Only name and description are updated
    fn update_list(&self, list: &SavedList) -> Result<()>;
    fn delete_list(&self, id: ListId) -> Result<()>;

    fn get_list(&self, id: ListId) -> Result<SavedList>;
    fn lists_of_user(&self, user_id: &UserId, pagination: &Pagination) -> Result<Vec<SavedList>>;

    fn add_event_to_list(&self, id: ListId, event_id: EventId) -> Result<()>;
    fn remove_event_from_list(&self, id: ListId, event_id: EventId) -> Result<()>;
    fn remove_event_from_all_lists(&self, event_id: EventId) -> Result<usize>;

    fn delete_lists_of_user(&self, user_id: &UserId) -> Result<usize>;
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IncidentQuery<'a> {
    pub user_id: Option<&'a UserId>,
    pub event_id: Option<EventId>,
    pub resolved: Option<bool>,
}

pub trait IncidentRepo {
    fn create_incident(&self, incident: &NewIncident) -> Result<IncidentId>;
    fn update_incident(&self, incident: &Incident) -> Result<()>;
    fn delete_incident(&self, id: IncidentId) -> Result<()>;

    fn get_incident(&self, id: IncidentId) -> Result<Incident>;
    fn query_incidents(
        &self,
        query: &IncidentQuery,
        pagination: &Pagination,
    ) -> Result<Vec<Incident>>;

    // The resolution state of the query is ignored
    fn delete_incidents(&self, query: &IncidentQuery) -> Result<usize>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paginate_in_memory() {
        let items = 0..25;
        assert_eq!(Pagination::page(0, 10).apply(items.clone()).len(), 10);
        assert_eq!(Pagination::page(2, 10).apply(items.clone()), vec![20, 21, 22, 23, 24]);
        assert_eq!(Pagination::default().apply(items).len(), 25);
    }
}
