use std::cell::{Cell, RefCell};

use anyhow::anyhow;

use super::prelude::*;
use crate::{
    filter::{is_tagged_with, EventFilter},
    gateways::notify::PushNotificationGateway,
};

type RepoResult<T> = std::result::Result<T, RepoError>;

#[derive(Default)]
pub struct MockDb {
    pub events: RefCell<Vec<Event>>,
    pub ratings: RefCell<Vec<Rating>>,
    pub assistances: RefCell<Vec<Assistance>>,
    pub users: RefCell<Vec<User>>,
    pub sessions: RefCell<Vec<Session>>,
    pub lists: RefCell<Vec<SavedList>>,
    pub incidents: RefCell<Vec<Incident>>,
    last_id: Cell<i64>,
}

impl MockDb {
    fn next_id(&self) -> i64 {
        let id = self.last_id.get() + 1;
        self.last_id.set(id);
        id
    }
}

fn get<T: Clone>(items: &RefCell<Vec<T>>, pred: impl Fn(&T) -> bool) -> RepoResult<T> {
    items
        .borrow()
        .iter()
        .find(|x| pred(x))
        .cloned()
        .ok_or(RepoError::NotFound)
}

fn try_get<T: Clone>(items: &RefCell<Vec<T>>, pred: impl Fn(&T) -> bool) -> RepoResult<Option<T>> {
    Ok(items.borrow().iter().find(|x| pred(x)).cloned())
}

fn create<T>(items: &RefCell<Vec<T>>, item: T, exists: impl Fn(&T) -> bool) -> RepoResult<()> {
    if items.borrow().iter().any(exists) {
        return Err(RepoError::AlreadyExists);
    }
    items.borrow_mut().push(item);
    Ok(())
}

fn update<T>(items: &RefCell<Vec<T>>, item: T, pred: impl Fn(&T) -> bool) -> RepoResult<()> {
    let mut items = items.borrow_mut();
    let pos = items.iter().position(pred).ok_or(RepoError::NotFound)?;
    items[pos] = item;
    Ok(())
}

fn delete<T>(items: &RefCell<Vec<T>>, pred: impl Fn(&T) -> bool) -> RepoResult<()> {
    let mut items = items.borrow_mut();
    let pos = items.iter().position(pred).ok_or(RepoError::NotFound)?;
    items.remove(pos);
    Ok(())
}

fn delete_all<T>(items: &RefCell<Vec<T>>, pred: impl Fn(&T) -> bool) -> usize {
    let mut items = items.borrow_mut();
    let len = items.len();
    items.retain(|x| !pred(x));
    len - items.len()
}

impl EventRepo for MockDb {
    fn create_event(&self, details: &EventDetails) -> RepoResult<EventId> {
        let id = EventId::new(self.next_id());
        self.events.borrow_mut().push(Event {
            id,
            details: details.clone(),
        });
        Ok(id)
    }
    fn update_event(&self, event: &Event) -> RepoResult<()> {
        update(&self.events, event.clone(), |e| e.id == event.id)
    }
    fn delete_event(&self, id: EventId) -> RepoResult<()> {
        delete(&self.events, |e| e.id == id)
    }

    fn get_event(&self, id: EventId) -> RepoResult<Event> {
        get(&self.events, |e| e.id == id)
    }
    fn try_get_event(&self, id: EventId) -> RepoResult<Option<Event>> {
        try_get(&self.events, |e| e.id == id)
    }
    fn exists_event_with_key(&self, key: &EventKey) -> RepoResult<bool> {
        Ok(self
            .events
            .borrow()
            .iter()
            .any(|e| &e.details.dedup_key() == key))
    }

    fn all_events(&self, pagination: &Pagination) -> RepoResult<Vec<Event>> {
        Ok(pagination.apply(self.events.borrow().iter().cloned()))
    }

    fn query_events(&self, filter: &EventFilter, pagination: &Pagination) -> RepoResult<Vec<Event>> {
        Ok(pagination.apply(
            self.events
                .borrow()
                .iter()
                .filter(|e| filter.matches(&e.details))
                .cloned(),
        ))
    }

    fn events_tagged_with(
        &self,
        tag: &str,
        since: Date,
        pagination: &Pagination,
    ) -> RepoResult<Vec<Event>> {
        Ok(pagination.apply(
            self.events
                .borrow()
                .iter()
                .filter(|e| e.details.start_date >= since && is_tagged_with(&e.details, tag))
                .cloned(),
        ))
    }

    fn all_taxonomy_values(&self) -> RepoResult<Vec<String>> {
        Ok(self
            .events
            .borrow()
            .iter()
            .flat_map(|e| {
                [
                    e.details.ambit.clone(),
                    e.details.category.clone(),
                    e.details.other_categories.clone(),
                ]
            })
            .collect())
    }
}

impl RatingRepo for MockDb {
    fn create_rating(&self, rating: &Rating) -> RepoResult<()> {
        create(&self.ratings, rating.clone(), |r| {
            r.event_id == rating.event_id && r.user_id == rating.user_id
        })
    }
    fn delete_rating(&self, event_id: EventId, user_id: &UserId) -> RepoResult<()> {
        delete(&self.ratings, |r| r.event_id == event_id && &r.user_id == user_id)
    }

    fn try_get_rating(&self, event_id: EventId, user_id: &UserId) -> RepoResult<Option<Rating>> {
        try_get(&self.ratings, |r| r.event_id == event_id && &r.user_id == user_id)
    }
    fn load_ratings_of_event(&self, event_id: EventId) -> RepoResult<Vec<Rating>> {
        Ok(self
            .ratings
            .borrow()
            .iter()
            .filter(|r| r.event_id == event_id)
            .cloned()
            .collect())
    }

    fn delete_ratings_of_user(&self, user_id: &UserId) -> RepoResult<usize> {
        Ok(delete_all(&self.ratings, |r| &r.user_id == user_id))
    }
    fn delete_ratings_of_event(&self, event_id: EventId) -> RepoResult<usize> {
        Ok(delete_all(&self.ratings, |r| r.event_id == event_id))
    }
}

impl AssistanceRepo for MockDb {
    fn create_assistance(&self, assistance: &Assistance) -> RepoResult<()> {
        create(&self.assistances, assistance.clone(), |a| a == assistance)
    }
    fn delete_assistance(&self, user_id: &UserId, event_id: EventId) -> RepoResult<()> {
        delete(&self.assistances, |a| {
            &a.user_id == user_id && a.event_id == event_id
        })
    }
    fn exists_assistance(&self, user_id: &UserId, event_id: EventId) -> RepoResult<bool> {
        Ok(self
            .assistances
            .borrow()
            .iter()
            .any(|a| &a.user_id == user_id && a.event_id == event_id))
    }

    fn all_assistances(&self, pagination: &Pagination) -> RepoResult<Vec<Assistance>> {
        Ok(pagination.apply(self.assistances.borrow().iter().cloned()))
    }
    fn event_ids_attended_by(&self, user_id: &UserId) -> RepoResult<Vec<EventId>> {
        Ok(self
            .assistances
            .borrow()
            .iter()
            .filter(|a| &a.user_id == user_id)
            .map(|a| a.event_id)
            .collect())
    }
    fn count_assistants(&self, event_id: EventId) -> RepoResult<u64> {
        Ok(self
            .assistances
            .borrow()
            .iter()
            .filter(|a| a.event_id == event_id)
            .count() as u64)
    }

    fn most_attended_event_ids(&self, pagination: &Pagination) -> RepoResult<Vec<(EventId, u64)>> {
        let mut counts: Vec<(EventId, u64)> = Vec::new();
        for a in self.assistances.borrow().iter() {
            match counts.iter_mut().find(|(id, _)| *id == a.event_id) {
                Some((_, count)) => *count += 1,
                None => counts.push((a.event_id, 1)),
            }
        }
        counts.sort_by(|(_, a), (_, b)| b.cmp(a));
        Ok(pagination.apply(counts))
    }

    fn delete_assistances_of_user(&self, user_id: &UserId) -> RepoResult<usize> {
        Ok(delete_all(&self.assistances, |a| &a.user_id == user_id))
    }
    fn delete_assistances_of_event(&self, event_id: EventId) -> RepoResult<usize> {
        Ok(delete_all(&self.assistances, |a| a.event_id == event_id))
    }
}

impl UserRepo for MockDb {
    fn create_user(&self, user: &User) -> RepoResult<()> {
        create(&self.users, user.clone(), |u| u.id == user.id)
    }
    fn update_user(&self, user: &User) -> RepoResult<()> {
        update(&self.users, user.clone(), |u| u.id == user.id)
    }
    fn delete_user(&self, id: &UserId) -> RepoResult<()> {
        delete(&self.users, |u| &u.id == id)
    }

    fn get_user(&self, id: &UserId) -> RepoResult<User> {
        get(&self.users, |u| &u.id == id)
    }
    fn try_get_user(&self, id: &UserId) -> RepoResult<Option<User>> {
        try_get(&self.users, |u| &u.id == id)
    }
    fn all_users(&self, pagination: &Pagination) -> RepoResult<Vec<User>> {
        Ok(pagination.apply(self.users.borrow().iter().cloned()))
    }
}

impl SessionRepo for MockDb {
    fn create_session(&self, session: &Session) -> RepoResult<()> {
        create(&self.sessions, session.clone(), |s| s.user_id == session.user_id)
    }
    fn delete_session_of_user(&self, user_id: &UserId) -> RepoResult<usize> {
        Ok(delete_all(&self.sessions, |s| &s.user_id == user_id))
    }

    fn try_get_session_of_user(&self, user_id: &UserId) -> RepoResult<Option<Session>> {
        try_get(&self.sessions, |s| &s.user_id == user_id)
    }
    fn try_get_session_by_token(&self, token: &str) -> RepoResult<Option<Session>> {
        try_get(&self.sessions, |s| s.token == token)
    }
    fn all_logged_in_user_ids(&self) -> RepoResult<Vec<UserId>> {
        Ok(self
            .sessions
            .borrow()
            .iter()
            .map(|s| s.user_id.clone())
            .collect())
    }
}

impl SavedListRepo for MockDb {
    fn create_list(&self, list: &NewSavedList) -> RepoResult<ListId> {
        let id = ListId::new(self.next_id());
        self.lists.borrow_mut().push(SavedList {
            id,
            owner: list.owner.clone(),
            name: list.name.clone(),
            description: list.description.clone(),
            events: Default::default(),
        });
        Ok(id)
    }
    fn update_list(&self, list: &SavedList) -> RepoResult<()> {
        let mut lists = self.lists.borrow_mut();
        let stored = lists
            .iter_mut()
            .find(|l| l.id == list.id)
            .ok_or(RepoError::NotFound)?;
        stored.name = list.name.clone();
        stored.description = list.description.clone();
        Ok(())
    }
    fn delete_list(&self, id: ListId) -> RepoResult<()> {
        delete(&self.lists, |l| l.id == id)
    }

    fn get_list(&self, id: ListId) -> RepoResult<SavedList> {
        get(&self.lists, |l| l.id == id)
    }
    fn lists_of_user(&self, user_id: &UserId, pagination: &Pagination) -> RepoResult<Vec<SavedList>> {
        Ok(pagination.apply(
            self.lists
                .borrow()
                .iter()
                .filter(|l| &l.owner == user_id)
                .cloned(),
        ))
    }

    fn add_event_to_list(&self, id: ListId, event_id: EventId) -> RepoResult<()> {
        let mut lists = self.lists.borrow_mut();
        let list = lists
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or(RepoError::NotFound)?;
        if !list.events.insert(event_id) {
            return Err(RepoError::AlreadyExists);
        }
        Ok(())
    }
    fn remove_event_from_list(&self, id: ListId, event_id: EventId) -> RepoResult<()> {
        let mut lists = self.lists.borrow_mut();
        let list = lists
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or(RepoError::NotFound)?;
        if !list.events.remove(&event_id) {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
    fn remove_event_from_all_lists(&self, event_id: EventId) -> RepoResult<usize> {
        Ok(self
            .lists
            .borrow_mut()
            .iter_mut()
            .map(|l| l.events.remove(&event_id))
            .filter(|removed| *removed)
            .count())
    }

    fn delete_lists_of_user(&self, user_id: &UserId) -> RepoResult<usize> {
        Ok(delete_all(&self.lists, |l| &l.owner == user_id))
    }
}

fn incident_matches(query: &IncidentQuery, incident: &Incident) -> bool {
    query.user_id.map_or(true, |u| u == &incident.user_id)
        && query.event_id.map_or(true, |e| e == incident.event_id)
        && query.resolved.map_or(true, |r| r == incident.resolved)
}

impl IncidentRepo for MockDb {
    fn create_incident(&self, incident: &NewIncident) -> RepoResult<IncidentId> {
        let id = IncidentId::new(self.next_id());
        self.incidents.borrow_mut().push(Incident {
            id,
            user_id: incident.user_id.clone(),
            event_id: incident.event_id,
            description: incident.description.clone(),
            response: None,
            resolved: false,
        });
        Ok(id)
    }
    fn update_incident(&self, incident: &Incident) -> RepoResult<()> {
        update(&self.incidents, incident.clone(), |i| i.id == incident.id)
    }
    fn delete_incident(&self, id: IncidentId) -> RepoResult<()> {
        delete(&self.incidents, |i| i.id == id)
    }

    fn get_incident(&self, id: IncidentId) -> RepoResult<Incident> {
        get(&self.incidents, |i| i.id == id)
    }
    fn query_incidents(
        &self,
        query: &IncidentQuery,
        pagination: &Pagination,
    ) -> RepoResult<Vec<Incident>> {
        Ok(pagination.apply(
            self.incidents
                .borrow()
                .iter()
                .filter(|i| incident_matches(query, i))
                .cloned(),
        ))
    }

    fn delete_incidents(&self, query: &IncidentQuery) -> RepoResult<usize> {
        let query = IncidentQuery {
            resolved: None,
            ..query.clone()
        };
        Ok(delete_all(&self.incidents, |i| incident_matches(&query, i)))
    }
}

/// Records all sent notifications as (device, title, body).
#[derive(Default)]
pub struct MockNotificationGateway {
    pub sent: RefCell<Vec<(String, String, String)>>,
    pub fail: bool,
}

impl PushNotificationGateway for MockNotificationGateway {
    fn send_push(&self, device_token: &str, title: &str, body: &str) -> anyhow::Result<()> {
        if self.fail {
            return Err(anyhow!("Push service unavailable"));
        }
        self.sent
            .borrow_mut()
            .push((device_token.into(), title.into(), body.into()));
        Ok(())
    }
}
