use crate::id::*;

#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Incident {
    pub id          : IncidentId,
    pub user_id     : UserId,
    pub event_id    : EventId,
    pub description : String,
    pub response    : Option<String>,
    pub resolved    : bool,
}

impl Incident {
    pub fn is_reported_by(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIncident {
    pub user_id: UserId,
    pub event_id: EventId,
    pub description: String,
}
