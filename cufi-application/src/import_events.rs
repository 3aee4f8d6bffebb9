use cufi_core::{
    feed::{normalize, parse_feed},
    gateways::feed::EventFeedGateway,
    usecases::ImportOutcome,
};

use super::{error::AppError, *};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub created: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Fetch the upcoming events from the feed and store all new ones.
///
/// Every record is imported within its own transaction. Records that
/// fail are logged and counted, the remaining records are still imported.
pub fn import_events_from_feed<F>(
    connections: &sqlite::Connections,
    feed: &F,
) -> Result<ImportSummary>
where
    F: EventFeedGateway + ?Sized,
{
    let json = feed.fetch_events_json().map_err(AppError::Feed)?;
    import_events_json(connections, &json)
}

/// Import a raw JSON array of feed records.
pub fn import_events_json(connections: &sqlite::Connections, json: &str) -> Result<ImportSummary> {
    import_feed_records(json, |details| {
        let mut db = connections.exclusive()?;
        Ok(db.transaction(|conn| usecases::import_event(conn, details))?)
    })
}

// A failing record, including a failed checkout of a
// connection, is counted and does not stop the batch.
fn import_feed_records<F>(json: &str, mut store: F) -> Result<ImportSummary>
where
    F: FnMut(&EventDetails) -> Result<ImportOutcome>,
{
    let records = parse_feed(json)?;
    info!("Importing {} event(s) from the feed", records.len());
    let mut summary = ImportSummary::default();
    for (index, record) in records.into_iter().enumerate() {
        let details = match record {
            Ok(raw) => match normalize(raw) {
                Ok(details) => details,
                Err(err) => {
                    warn!("Failed to normalize feed record #{index}: {err}");
                    summary.failed += 1;
                    continue;
                }
            },
            Err(err) => {
                warn!("Failed to decode feed record #{index}: {err}");
                summary.failed += 1;
                continue;
            }
        };
        match store(&details) {
            Ok(ImportOutcome::Created(_)) => summary.created += 1,
            Ok(ImportOutcome::Skipped) => summary.skipped += 1,
            Err(err) => {
                warn!(
                    "Failed to import event '{}' of feed record #{index}: {err}",
                    details.denomination
                );
                summary.failed += 1;
            }
        }
    }
    info!(
        "Imported {} new event(s), skipped {} known and {} invalid record(s)",
        summary.created, summary.skipped, summary.failed
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    const BATCH: &str = r#"[
        {"data_inici": "2024-06-01T00:00:00.000", "denominaci": "First"},
        {"data_inici": "2024-06-02T00:00:00.000", "denominaci": "Second"},
        {"data_inici": "2024-06-03T00:00:00.000", "denominaci": "Third"}
    ]"#;

    #[test]
    fn keep_importing_after_a_storage_failure() {
        let mut stored = vec![];
        let summary = import_feed_records(BATCH, |details| {
            if details.denomination == "Second" {
                return Err(AppError::Other(anyhow!("no connection available")));
            }
            stored.push(details.denomination.clone());
            Ok(ImportOutcome::Created(EventId::from(stored.len() as i64)))
        })
        .unwrap();
        assert_eq!(stored, ["First", "Third"]);
        assert_eq!(
            summary,
            ImportSummary {
                created: 2,
                skipped: 0,
                failed: 1
            }
        );
    }
}
