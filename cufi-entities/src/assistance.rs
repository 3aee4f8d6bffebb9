use crate::id::*;

/// A user intends to attend an event.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Assistance {
    pub user_id: UserId,
    pub event_id: EventId,
}
