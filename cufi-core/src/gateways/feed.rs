use anyhow::Result as Fallible;

/// Source of the external cultural agenda.
pub trait EventFeedGateway {
    /// Fetch all upcoming events as a raw JSON array.
    fn fetch_events_json(&self) -> Fallible<String>;
}
