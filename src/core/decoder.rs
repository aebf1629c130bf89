use crate::models::MatchRecord;
use serde_json::Value;
use thiserror::Error;

/// Bodies at or below this length are plain-text failure messages, not results.
///
/// This is the search service's own convention, not a property of JSON. Revisit
/// it if the service changes how it reports errors.
pub const UPSTREAM_ERROR_MAX_LEN: usize = 30;

/// Position of the score inside one result entry
const SCORE_PATH: &[usize] = &[0];

/// Position of the image URL inside one result entry: `[_, [[url, ..], ..], ..]`
const IMAGE_URL_PATH: &[usize] = &[1, 0, 0];

/// Minimum number of elements an entry must carry
const MIN_ENTRY_LEN: usize = 2;

/// Errors that can occur while decoding a search response
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The service answered with a short plain-text message
    #[error("{0}")]
    UpstreamError(String),

    /// The body is not the positional array layout the service normally returns
    #[error("Malformed response: {reason}")]
    MalformedResponse {
        reason: String,
        #[source]
        source: Option<serde_json::Error>,
    },
}

impl DecodeError {
    fn malformed(reason: impl Into<String>) -> Self {
        DecodeError::MalformedResponse {
            reason: reason.into(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        DecodeError::MalformedResponse {
            reason: format!("invalid JSON: {}", err),
            source: Some(err),
        }
    }
}

/// Decode a raw search service body into ranked match records
///
/// The body carries no field names, every value is addressed by position:
///
/// ```text
/// [ [score, [[image_url, ...], ...], ...], ... ]
/// ```
///
/// # Policy
/// - body length `<= UPSTREAM_ERROR_MAX_LEN`: `UpstreamError` with the body text
/// - body not JSON, not an array, or an entry that is not an array of at
///   least two elements: `MalformedResponse`, the whole decode fails
/// - score or URL missing / wrongly typed inside an entry: that field falls
///   back to `0.0` / `""` and the entry is kept
///
/// Upstream order is preserved.
pub fn decode(raw: &[u8]) -> Result<Vec<MatchRecord>, DecodeError> {
    if raw.len() <= UPSTREAM_ERROR_MAX_LEN {
        return Err(DecodeError::UpstreamError(
            String::from_utf8_lossy(raw).into_owned(),
        ));
    }

    let root: Value = serde_json::from_slice(raw)?;

    let entries = root.as_array().ok_or_else(|| {
        DecodeError::malformed(format!("expected top-level array, got {}", kind(&root)))
    })?;

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| decode_entry(index, entry))
        .collect()
}

/// Decode a single `[score, [[url, ..], ..], ..]` entry
fn decode_entry(index: usize, entry: &Value) -> Result<MatchRecord, DecodeError> {
    // Strict: the entry itself must be an array with room for score and images
    let fields = entry.as_array().ok_or_else(|| {
        DecodeError::malformed(format!("entry {} is {}, expected array", index, kind(entry)))
    })?;

    if fields.len() < MIN_ENTRY_LEN {
        return Err(DecodeError::malformed(format!(
            "entry {} has {} element(s), expected at least {}",
            index,
            fields.len(),
            MIN_ENTRY_LEN
        )));
    }

    // Tolerant: missing inner fields degrade to defaults
    let score = lookup(entry, SCORE_PATH)
        .and_then(Value::as_f64)
        .unwrap_or_default();

    let image_url = lookup(entry, IMAGE_URL_PATH)
        .and_then(Value::as_str)
        .unwrap_or_default();

    if image_url.is_empty() {
        tracing::debug!("Search entry {} has no image URL", index);
    }

    Ok(MatchRecord::new(score, image_url))
}

/// Follow a path of array indices, `None` as soon as a step is not an array
/// or the index is out of bounds
fn lookup<'a>(value: &'a Value, path: &[usize]) -> Option<&'a Value> {
    path.iter()
        .try_fold(value, |current, &index| current.as_array()?.get(index))
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_two_matches_in_order() {
        let raw = br#"[[0.987,[["http://x/a.jpg"]]],[0.5,[["http://x/b.jpg"]]]]"#;
        let records = decode(raw).unwrap();

        assert_eq!(
            records,
            vec![
                MatchRecord::new(0.987, "http://x/a.jpg"),
                MatchRecord::new(0.5, "http://x/b.jpg"),
            ]
        );
    }

    #[test]
    fn test_short_body_is_upstream_error() {
        match decode(b"no face") {
            Err(DecodeError::UpstreamError(detail)) => assert_eq!(detail, "no face"),
            other => panic!("expected upstream error, got {:?}", other),
        }
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let at_limit = "x".repeat(UPSTREAM_ERROR_MAX_LEN);
        assert!(matches!(
            decode(at_limit.as_bytes()),
            Err(DecodeError::UpstreamError(_))
        ));

        // One byte over the limit is parsed as JSON
        let over_limit = "y".repeat(UPSTREAM_ERROR_MAX_LEN + 1);
        assert!(matches!(
            decode(over_limit.as_bytes()),
            Err(DecodeError::MalformedResponse { source: Some(_), .. })
        ));
    }

    #[test]
    fn test_short_valid_json_is_still_upstream_error() {
        // "[]" is valid JSON but the length rule wins
        assert!(matches!(decode(b"[]"), Err(DecodeError::UpstreamError(_))));
    }

    #[test]
    fn test_empty_body_is_upstream_error() {
        match decode(b"") {
            Err(DecodeError::UpstreamError(detail)) => assert!(detail.is_empty()),
            other => panic!("expected upstream error, got {:?}", other),
        }
    }

    #[test]
    fn test_object_is_malformed() {
        let raw = br#"{"status": "ok", "results": [1, 2, 3, 4, 5]}"#;
        assert!(matches!(
            decode(raw),
            Err(DecodeError::MalformedResponse { source: None, .. })
        ));
    }

    #[test]
    fn test_number_is_malformed() {
        let raw = b"12345678901234567890123456789012345";
        assert!(raw.len() > UPSTREAM_ERROR_MAX_LEN);
        assert!(matches!(
            decode(raw),
            Err(DecodeError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn test_missing_url_is_tolerated() {
        let raw = br#"[[1.5, []], [2.5, [["http://x/c.jpg"]]]]"#;
        let records = decode(raw).unwrap();

        assert_eq!(records[0], MatchRecord::new(1.5, ""));
        assert_eq!(records[1], MatchRecord::new(2.5, "http://x/c.jpg"));
    }

    #[test]
    fn test_non_numeric_score_is_zero() {
        let raw = br#"[["high", [["http://x/a.jpg", 12, 34]]]]"#;
        let records = decode(raw).unwrap();

        assert_eq!(records, vec![MatchRecord::new(0.0, "http://x/a.jpg")]);
    }

    #[test]
    fn test_wrongly_typed_url_is_empty() {
        let raw = br#"[[0.75, [[12345, "http://x/ignored.jpg"]]]]"#;
        let records = decode(raw).unwrap();

        assert_eq!(records, vec![MatchRecord::new(0.75, "")]);
    }

    #[test]
    fn test_non_array_entry_aborts_decode() {
        let raw = br#"[[0.9, [["http://x/a.jpg"]]], {"score": 0.8}]"#;
        match decode(raw) {
            Err(DecodeError::MalformedResponse { reason, .. }) => {
                assert!(reason.contains("entry 1"), "unexpected reason: {}", reason)
            }
            other => panic!("expected malformed response, got {:?}", other),
        }
    }

    #[test]
    fn test_single_element_entry_aborts_decode() {
        let raw = br#"[[0.9, [["http://x/a.jpg"]]], [0.8]]"#;
        assert!(matches!(
            decode(raw),
            Err(DecodeError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let raw =
            br#"[[0.61, [["http://x/a.jpg", "id1"], ["http://x/a2.jpg"]], "vk.com/id1", 17]]"#;
        let records = decode(raw).unwrap();

        assert_eq!(records, vec![MatchRecord::new(0.61, "http://x/a.jpg")]);
    }

    #[test]
    fn test_lookup_path() {
        let value: Value = serde_json::from_str(r#"[1, [["a", "b"]]]"#).unwrap();

        assert_eq!(lookup(&value, &[1, 0, 1]), Some(&Value::from("b")));
        assert_eq!(lookup(&value, &[1, 1, 0]), None);
        assert_eq!(lookup(&value, &[0, 0]), None);
        assert_eq!(lookup(&value, &[]), Some(&value));
    }
}
