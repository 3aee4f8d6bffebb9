//! Normalization of records from the external cultural agenda.
//!
//! The feed delivers loosely typed records with its own field names.
//! Every record is normalized independently such that a single
//! malformed record does not affect the others.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::entities::*;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFeedEvent {
    #[serde(rename = "data_inici", default)]
    pub start_date: Value,
    #[serde(rename = "data_fi", default)]
    pub end_date: Value,
    #[serde(rename = "denominaci", default)]
    pub denomination: Value,
    #[serde(rename = "descripcio", default)]
    pub description: Value,
    #[serde(rename = "entrades", default)]
    pub price: Value,
    #[serde(rename = "horari", default)]
    pub schedule: Value,
    #[serde(rename = "subt_tol", default)]
    pub subtitle: Value,
    #[serde(rename = "tags_mbits", default)]
    pub ambit: Value,
    #[serde(rename = "tags_categor_es", default)]
    pub category: Value,
    #[serde(rename = "tags_altres_categor_es", default)]
    pub other_categories: Value,
    #[serde(rename = "enlla_os", default)]
    pub link: Value,
    #[serde(rename = "imatges", default)]
    pub images: Value,
    #[serde(rename = "adre_a", default)]
    pub address: Value,
    #[serde(rename = "comarca_i_municipi", default)]
    pub region: Value,
    #[serde(default)]
    pub email: Value,
    #[serde(rename = "espai", default)]
    pub space: Value,
    #[serde(rename = "latitud", default)]
    pub latitude: Value,
    #[serde(rename = "longitud", default)]
    pub longitude: Value,
    #[serde(rename = "tel_fon", default)]
    pub phone: Value,
    #[serde(rename = "imgapp", default)]
    pub app_image: Value,
}

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("Invalid coordinate '{0}'")]
    Coordinate(String),
}

/// Split the top-level JSON array into individually decoded records.
pub fn parse_feed(json: &str) -> Result<Vec<Result<RawFeedEvent, serde_json::Error>>, serde_json::Error> {
    let records: Vec<Value> = serde_json::from_str(json)?;
    Ok(records.into_iter().map(serde_json::from_value).collect())
}

pub fn normalize(raw: RawFeedEvent) -> Result<EventDetails, NormalizeError> {
    let RawFeedEvent {
        start_date,
        end_date,
        denomination,
        description,
        price,
        schedule,
        subtitle,
        ambit,
        category,
        other_categories,
        link,
        images,
        address,
        region: region_path,
        email,
        space,
        latitude,
        longitude,
        phone,
        app_image,
    } = raw;
    Ok(EventDetails {
        start_date: feed_date(&text(start_date)),
        end_date: feed_date(&text(end_date)),
        denomination: text(denomination),
        description: plain_text(&text(description)),
        price: text(price),
        schedule: text(schedule),
        subtitle: text(subtitle),
        ambit: strip_tag_prefixes(&text(ambit)),
        category: strip_tag_prefixes(&text(category)),
        other_categories: strip_tag_prefixes(&text(other_categories)),
        link: text(link),
        images: text(images),
        address: text(address),
        region: region(&text(region_path)),
        email: text(email),
        space: text(space),
        latitude: coordinate(&text(latitude))?,
        longitude: coordinate(&text(longitude))?,
        phone: text(phone),
        app_image: text(app_image),
    })
}

// Missing values and the literal "null" are both treated as empty.
fn text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) if s == "null" => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Parse `YYYY-MM-DDThh:mm:ss` into a date, falling back to the
/// sentinel date.
pub fn feed_date(input: &str) -> Date {
    let day = input.split('T').next().unwrap_or_default();
    let mut parts = day.split('-');
    let reordered = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(year), Some(month), Some(day), None) => format!("{day}-{month}-{year}"),
        _ => return SENTINEL_DATE,
    };
    parse_date(&reordered).unwrap_or_else(|err| {
        log::debug!("Replacing unparsable date '{input}' of feed record: {err}");
        SENTINEL_DATE
    })
}

/// Remove the path-style prefix of each comma-separated tag,
/// e.g. `agenda:ambits/cultura` becomes `cultura`.
pub fn strip_tag_prefixes(tags: &str) -> String {
    if tags.is_empty() {
        return String::new();
    }
    join_tags(
        tags.split(',')
            .map(|tag| tag.rfind('/').map_or(tag, |pos| &tag[pos + 1..])),
    )
}

/// Extract the county and municipality from a location path.
///
/// Paths with two or three segments yield the second segment. Longer
/// paths yield the fourth and the second segment joined by a comma.
pub fn region(path: &str) -> String {
    let mut segments: Vec<_> = path.split('/').collect();
    while segments.len() > 1 && segments.last().is_some_and(|s| s.is_empty()) {
        segments.pop();
    }
    match segments.len() {
        0 | 1 => path.to_owned(),
        2 | 3 => segments[1].to_owned(),
        _ => format!("{},{}", segments[3], segments[1]),
    }
}

fn coordinate(input: &str) -> Result<f64, NormalizeError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    trimmed
        .parse()
        .map_err(|_| NormalizeError::Coordinate(input.to_owned()))
}

lazy_static! {
    static ref HTML_HIDDEN_RE: Regex =
        Regex::new(r"(?is)<(script|style)\b[^>]*>.*?</(script|style)\s*>").unwrap();
    static ref HTML_BLOCK_RE: Regex = Regex::new(
        r"(?i)</?(p|br|div|li|ul|ol|h[1-6]|tr|td|th|table|blockquote|section|article)\b[^>]*>"
    )
    .unwrap();
    static ref HTML_TAG_RE: Regex = Regex::new(r"(?s)<[^>]*>").unwrap();
    static ref HTML_ENTITY_RE: Regex =
        Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z][a-zA-Z0-9]{1,7});").unwrap();
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
}

/// Convert an HTML fragment into plain text without the middle dot
/// character that the feed uses as a separator.
pub fn plain_text(html: &str) -> String {
    let text = HTML_HIDDEN_RE.replace_all(html, "");
    let text = HTML_BLOCK_RE.replace_all(&text, " ");
    let text = HTML_TAG_RE.replace_all(&text, "");
    let text = HTML_ENTITY_RE.replace_all(&text, |caps: &Captures| {
        decode_entity(&caps[1]).map_or_else(|| caps[0].to_owned(), String::from)
    });
    let text = WHITESPACE_RE.replace_all(&text, " ");
    text.trim().replace('·', "")
}

fn decode_entity(entity: &str) -> Option<char> {
    if let Some(hex) = entity
        .strip_prefix("#x")
        .or_else(|| entity.strip_prefix("#X"))
    {
        return u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
    }
    if let Some(dec) = entity.strip_prefix('#') {
        return dec.parse().ok().and_then(char::from_u32);
    }
    let c = match entity {
        "nbsp" => ' ',
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "middot" => '·',
        "laquo" => '«',
        "raquo" => '»',
        "ndash" => '–',
        "mdash" => '—',
        "hellip" => '…',
        "rsquo" => '’',
        "lsquo" => '‘',
        "rdquo" => '”',
        "ldquo" => '“',
        "euro" => '€',
        "agrave" => 'à',
        "Agrave" => 'À',
        "aacute" => 'á',
        "egrave" => 'è',
        "Egrave" => 'È',
        "eacute" => 'é',
        "Eacute" => 'É',
        "iacute" => 'í',
        "Iacute" => 'Í',
        "iuml" => 'ï',
        "ograve" => 'ò',
        "Ograve" => 'Ò',
        "oacute" => 'ó',
        "Oacute" => 'Ó',
        "uacute" => 'ú',
        "Uacute" => 'Ú',
        "uuml" => 'ü',
        "ccedil" => 'ç',
        "Ccedil" => 'Ç',
        "ntilde" => 'ñ',
        "Ntilde" => 'Ñ',
        _ => return None,
    };
    Some(c)
}
