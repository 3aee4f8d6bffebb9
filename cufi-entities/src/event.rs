use itertools::Itertools as _;

use crate::{id::*, time::*};

/// All attributes of an event apart from its identity.
#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq)]
pub struct EventDetails {
    pub start_date       : Date,
    pub end_date         : Date,
    pub denomination     : String,
    pub description      : String,
    pub price            : String,
    pub schedule         : String,
    pub subtitle         : String,
    // Comma-joined tag lists
    pub ambit            : String,
    pub category         : String,
    pub other_categories : String,
    pub link             : String,
    // Comma-joined image paths
    pub images           : String,
    pub address          : String,
    // County and municipality
    pub region           : String,
    pub email            : String,
    pub space            : String,
    pub latitude         : f64,
    pub longitude        : f64,
    pub phone            : String,
    pub app_image        : String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: EventId,
    pub details: EventDetails,
}

/// The natural key that identifies duplicate events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventKey<'a> {
    pub start_date: Date,
    pub end_date: Date,
    pub denomination: &'a str,
    pub description: &'a str,
}

impl EventDetails {
    pub fn dedup_key(&self) -> EventKey<'_> {
        EventKey {
            start_date: self.start_date,
            end_date: self.end_date,
            denomination: &self.denomination,
            description: &self.description,
        }
    }

    pub fn image_paths(&self) -> impl Iterator<Item = &str> {
        split_tags(&self.images)
    }

    /// All tokens of the three-tier taxonomy.
    pub fn taxonomy_tags(&self) -> impl Iterator<Item = &str> {
        split_tags(&self.ambit)
            .chain(split_tags(&self.category))
            .chain(split_tags(&self.other_categories))
    }
}

/// Split a comma-joined tag list into its non-empty tokens.
pub fn split_tags(tags: &str) -> impl Iterator<Item = &str> {
    tags.split(',').filter(|t| !t.is_empty())
}

pub fn join_tags<'a>(tags: impl IntoIterator<Item = &'a str>) -> String {
    tags.into_iter().join(",")
}

/// An event together with values that are derived on every read.
#[derive(Debug, Clone, PartialEq)]
pub struct DecoratedEvent {
    pub event: Event,
    pub score: f64,
    pub number_of_assistants: u64,
}
