use crate::{event::split_tags, id::UserId};

#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id                   : UserId,
    pub name                 : String,
    pub birth_date           : String,
    pub profile_image        : String,
    /// Comma-joined category tokens
    pub preferred_categories : String,
    pub is_admin             : bool,
}

impl User {
    /// The category tokens in their original order, including repetitions.
    pub fn preferred_category_tokens(&self) -> impl Iterator<Item = &str> {
        split_tags(&self.preferred_categories)
    }
}
