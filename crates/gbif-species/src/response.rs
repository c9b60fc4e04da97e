//! Decoding response bodies into typed records and pages
//!
//! Listing endpoints answer either with a bare JSON array or with an
//! envelope `{offset, limit, endOfRecords, count, results}`. Both end up as
//! a [`Page`]. A page decodes completely or not at all.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{GbifError, Result};
use crate::paging::{Facet, Page, Paging};
use crate::types::de;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    offset: Option<u64>,
    limit: Option<u32>,
    end_of_records: Option<bool>,
    count: Option<u64>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    results: Vec<Value>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    facets: Vec<Facet>,
}

fn parse_body(body: &[u8]) -> Result<Value> {
    serde_json::from_slice(body)
        .map_err(|e| GbifError::malformed(format!("response is not valid JSON: {}", e)))
}

fn decode_items<T: DeserializeOwned>(items: Vec<Value>) -> Result<Vec<T>> {
    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| {
            serde_json::from_value(item)
                .map_err(|e| GbifError::malformed(format!("record {}: {}", idx, e)))
        })
        .collect()
}

fn into_envelope(value: Value) -> Result<Envelope> {
    match value {
        Value::Array(items) => Ok(Envelope {
            offset: None,
            limit: None,
            end_of_records: None,
            count: None,
            results: items,
            facets: Vec::new(),
        }),
        Value::Object(map) if map.contains_key("results") => {
            Ok(serde_json::from_value(Value::Object(map))?)
        }
        other => Err(GbifError::malformed(format!(
            "expected a JSON array or paged envelope, got {}",
            kind(&other)
        ))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Decode a single JSON object.
pub fn decode_record<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    let value = parse_body(body)?;
    serde_json::from_value(value).map_err(|e| GbifError::malformed(e.to_string()))
}

/// Decode a list of records from a bare array or the `results` of an envelope.
pub fn decode_records<T: DeserializeOwned>(body: &[u8]) -> Result<Vec<T>> {
    let envelope = into_envelope(parse_body(body)?)?;
    decode_items(envelope.results)
}

/// Decode one page of records.
///
/// Offset and limit echoed by the server take precedence over `requested`.
pub fn decode_page<T: DeserializeOwned>(body: &[u8], requested: Paging) -> Result<Page<T>> {
    let envelope = into_envelope(parse_body(body)?)?;
    let offset = envelope.offset.unwrap_or(requested.offset());
    let limit = envelope.limit.unwrap_or(requested.limit());
    if limit == 0 {
        return Err(GbifError::malformed("page limit must be positive, got 0"));
    }

    if envelope.results.len() > limit as usize {
        return Err(GbifError::malformed(format!(
            "page holds {} records but its limit is {}",
            envelope.results.len(),
            limit
        )));
    }

    let page = Page {
        offset,
        limit,
        end_of_records: envelope.end_of_records,
        count: envelope.count,
        results: decode_items(envelope.results)?,
        facets: envelope.facets,
    };

    debug!(
        offset = page.offset,
        limit = page.limit,
        records = page.results.len(),
        last_page = page.is_last_page(),
        "Decoded page"
    );

    Ok(page)
}
