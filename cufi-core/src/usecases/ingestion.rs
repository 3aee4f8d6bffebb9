use super::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    Created(EventId),
    /// An event with the same natural key has been imported before
    Skipped,
}

/// Insert an event from an external source if it is new.
pub fn import_event<R: EventRepo>(repo: &R, details: &EventDetails) -> Result<ImportOutcome> {
    if repo.exists_event_with_key(&details.dedup_key())? {
        log::debug!("Skipping known event '{}'", details.denomination);
        return Ok(ImportOutcome::Skipped);
    }
    let id = repo.create_event(details)?;
    log::debug!("Imported event '{}' as {id}", details.denomination);
    Ok(ImportOutcome::Created(id))
}
