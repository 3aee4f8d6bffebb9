use std::collections::BTreeSet;

use crate::id::*;

/// Reserved name of the list every user gets on registration.
pub const FAVORITES_LIST_NAME: &str = "Favorits";

pub const FAVORITES_LIST_DESCRIPTION: &str = "Llista dels esdeveniments que més m'interessen!";

pub const DEFAULT_LIST_DESCRIPTION: &str = "Llista dels esdeveniments que m'interessen!";

#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedList {
    pub id          : ListId,
    pub owner       : UserId,
    pub name        : String,
    pub description : String,
    pub events      : BTreeSet<EventId>,
}

impl SavedList {
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.owner == user_id
    }

    pub fn is_favorites(&self) -> bool {
        self.name == FAVORITES_LIST_NAME
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSavedList {
    pub owner: UserId,
    pub name: String,
    pub description: String,
}
