use std::time::Duration;

use anyhow::{anyhow, Result};
use cufi_core::gateways::feed::EventFeedGateway;
use time::{macros::format_description, OffsetDateTime};

/// Open data endpoint of the cultural agenda of Catalonia.
pub const DEFAULT_API_URL: &str =
    "https://analisi.transparenciacatalunya.cat/resource/rhpv-yr4f.json";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Fetches upcoming events from the cultural agenda.
#[derive(Debug, Clone)]
pub struct OpenDataAgenda {
    pub api_url: String,
    /// Optional application token for higher rate limits
    pub app_token: Option<String>,
    pub timeout: Duration,
}

impl Default for OpenDataAgenda {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            app_token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Only events starting after the given point in time are requested.
fn where_clause(now: OffsetDateTime) -> Result<String> {
    let now = now.format(format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]"
    ))?;
    Ok(format!("data_inici > '{now}'"))
}

#[cfg(not(test))]
fn fetch_raw(url: &str, app_token: Option<&str>, query: &str, timeout: Duration) -> Result<String> {
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()?;
    let mut request = client.get(url).query(&[("$where", query)]);
    if let Some(token) = app_token {
        request = request.header("X-App-Token", token);
    }
    let response = request.send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(anyhow!("Agenda responded with status {status}"));
    }
    log::debug!("Agenda response: {status}");
    Ok(response.text()?)
}

/// Don't request the real endpoint while running the tests.
#[cfg(test)]
fn fetch_raw(url: &str, _: Option<&str>, query: &str, _: Duration) -> Result<String> {
    log::debug!("Would fetch events from {url} where {query}");
    if url.is_empty() {
        return Err(anyhow!("No URL"));
    }
    Ok("[]".to_owned())
}

impl EventFeedGateway for OpenDataAgenda {
    fn fetch_events_json(&self) -> Result<String> {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        let query = where_clause(now)?;
        log::info!("Fetching events from {}", self.api_url);
        fetch_raw(&self.api_url, self.app_token.as_deref(), &query, self.timeout)
    }
}
