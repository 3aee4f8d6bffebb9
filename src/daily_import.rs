use std::sync::Arc;

use cufi_application::prelude::{import_events_from_feed, run_daily_job};
use cufi_db_sqlite::Connections;
use cufi_gateways::agenda::OpenDataAgenda;
use time::{OffsetDateTime, Time};

use crate::{config, gateways::PushGw};

pub async fn run(
    connections: Connections,
    feed: OpenDataAgenda,
    push: PushGw,
    cfg: config::Ingestion,
) {
    let feed = Arc::new(feed);
    let push = Arc::new(push);
    loop {
        let delay = delay_until(now(), cfg.daily_at);
        log::info!(
            "Next import of events in {}h {}min",
            delay.as_secs() / 3600,
            delay.as_secs() % 3600 / 60
        );
        tokio::time::sleep(delay).await;

        let connections = connections.clone();
        let feed = Arc::clone(&feed);
        let push = Arc::clone(&push);
        let notify_near_events = cfg.notify_near_events;
        // Database and HTTP requests are blocking
        let job = tokio::task::spawn_blocking(move || {
            if notify_near_events {
                run_daily_job(&connections, &*feed, &*push, now().date())
            } else {
                import_events_from_feed(&connections, &*feed)
            }
        });
        match job.await {
            Ok(Ok(summary)) => log::info!(
                "Daily import finished with {} new and {} known event(s)",
                summary.created,
                summary.skipped
            ),
            Ok(Err(err)) => log::warn!("Daily import failed: {err}"),
            Err(err) => log::error!("Daily import aborted: {err}"),
        }
    }
}

pub fn now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

/// Time to wait until the next occurrence of `at`.
///
/// If `now` is exactly `at` the job runs immediately.
fn delay_until(now: OffsetDateTime, at: Time) -> std::time::Duration {
    let mut next = now.replace_time(at);
    if next < now {
        next += time::Duration::DAY;
    }
    (next - now).try_into().unwrap_or_default()
}
