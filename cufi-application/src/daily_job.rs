use cufi_core::gateways::{feed::EventFeedGateway, notify::PushNotificationGateway};

use super::{
    import_events::{import_events_from_feed, ImportSummary},
    notifications::notify_near_events,
    *,
};

/// Import new events and afterwards remind attendees of
/// the events that start tomorrow.
///
/// A failing notification scan does not affect the result of the import.
pub fn run_daily_job<F, G>(
    connections: &sqlite::Connections,
    feed: &F,
    push: &G,
    today: Date,
) -> Result<ImportSummary>
where
    F: EventFeedGateway + ?Sized,
    G: PushNotificationGateway + ?Sized,
{
    let imported = import_events_from_feed(connections, feed);
    match &imported {
        Ok(summary) => debug!("Daily import finished: {summary:?}"),
        Err(err) => error!("Daily import failed: {err}"),
    }
    if let Err(err) = notify_near_events(connections, push, today) {
        error!("Failed to notify attendees of near events: {err}");
    }
    imported
}
