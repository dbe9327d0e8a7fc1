//! Form and submission IDs derived from a stored form URL
//!
//! A form URL looks like `https://host/form/<formId>/submission/<submissionId>`.
//! Extraction locates the `/form/` and `/submission/` markers and slices
//! between them with half-open, clamping index semantics where a missing
//! marker is position `-1` and a negative bound counts from the end. URLs
//! without a marker therefore yield odd but deterministic results, e.g. a URL
//! with no `/submission/` produces a submission ID of everything from its
//! twelfth character on.

use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};

const FORM_MARKER: &str = "/form/";
const SUBMISSION_MARKER: &str = "/submission/";

/// IDs extracted from a form URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormUrlParts {
    pub form_id: String,
    pub submission_id: String,
}

/// Character index of `needle` in `haystack`, or -1.
fn char_find(haystack: &str, needle: &str) -> i64 {
    haystack
        .find(needle)
        .map(|byte| haystack[..byte].chars().count() as i64)
        .unwrap_or(-1)
}

/// Half-open character slice with negative-from-end, clamped bounds.
fn slice_chars(chars: &[char], start: i64, end: i64) -> String {
    let len = chars.len() as i64;
    let clamp = |i: i64| {
        let i = if i < 0 { i + len } else { i };
        i.clamp(0, len) as usize
    };
    let (start, end) = (clamp(start), clamp(end));
    if start >= end {
        return String::new();
    }
    chars[start..end].iter().collect()
}

/// Split a form URL into its form and submission IDs.
pub fn apply_attributes(form_url: &str) -> FormUrlParts {
    let chars: Vec<char> = form_url.chars().collect();
    let form_at = char_find(form_url, FORM_MARKER);
    let submission_at = char_find(form_url, SUBMISSION_MARKER);

    FormUrlParts {
        form_id: slice_chars(&chars, form_at + FORM_MARKER.len() as i64, submission_at),
        submission_id: slice_chars(
            &chars,
            submission_at + SUBMISSION_MARKER.len() as i64,
            chars.len() as i64,
        ),
    }
}

fn record_parts(record: &Value) -> Result<FormUrlParts> {
    match record.get("formUrl") {
        Some(Value::String(url)) => Ok(apply_attributes(url)),
        _ => Err(Error::MissingField("formUrl".to_string())),
    }
}

fn insert_parts(record: &mut Value, parts: FormUrlParts) {
    if let Some(map) = record.as_object_mut() {
        map.insert("formId".to_string(), Value::String(parts.form_id));
        map.insert("submissionId".to_string(), Value::String(parts.submission_id));
    }
}

/// Add `formId` and `submissionId` to a serialized application, or to every
/// entry of a serialized list.
///
/// Every entry is checked first: on error the value is left unchanged.
pub fn apply_custom_attributes(value: &mut Value) -> Result<()> {
    match value {
        Value::Array(entries) => {
            let parts = entries.iter().map(record_parts).collect::<Result<Vec<_>>>()?;
            for (entry, parts) in entries.iter_mut().zip(parts) {
                insert_parts(entry, parts);
            }
        }
        record => {
            let parts = record_parts(record)?;
            insert_parts(record, parts);
        }
    }
    Ok(())
}
