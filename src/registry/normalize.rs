//! Normalization of registry responses.
//!
//! Different npm versions disagree on where `npm view --json` writes its
//! payload and how it reports an unpublished package. Some print the JSON
//! error on stdout, some on stderr, and some mix human-readable warnings
//! into the same stream. Each channel is classified once into a
//! [`ChannelPayload`] and the two are reconciled by [`reconcile`].

use crate::types::LookupResult;
use serde_json::Value;
use tracing::{debug, trace};

/// Error code npm uses for a package that was never published.
pub const NOT_FOUND_CODE: &str = "E404";

/// What one output channel turned out to contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelPayload {
    /// Published version strings.
    VersionList(Vec<String>),
    /// Structured "package not found" error.
    NotFoundError,
    /// Any other structured error, with its message.
    OtherError(String),
    /// Text with no recognizable JSON payload.
    Unparseable,
    /// Nothing but whitespace.
    Empty,
}

/// Classify the raw text of one channel.
///
/// Noisy output is scanned for embedded JSON. Candidates that say nothing
/// (`[1]`, `{}`) are skipped, and an empty list only counts when no later
/// candidate is more specific.
pub fn classify(channel: &str) -> ChannelPayload {
    let text = channel.trim();
    if text.is_empty() {
        return ChannelPayload::Empty;
    }

    match serde_json::from_str::<Value>(text) {
        Ok(value) => return classify_value(&value),
        Err(e) => trace!("Output is not plain JSON: {}", e),
    }

    let mut empty_list = None;
    for value in embedded_json(text) {
        match classify_value(&value) {
            ChannelPayload::Unparseable => continue,
            ChannelPayload::VersionList(versions) if versions.is_empty() => {
                empty_list.get_or_insert(ChannelPayload::VersionList(versions));
            }
            payload => return payload,
        }
    }

    empty_list.unwrap_or_else(|| {
        debug!("No JSON payload found in output: {}", text);
        ChannelPayload::Unparseable
    })
}

/// Every JSON value that starts at a `{` or `[` inside `text`, in order.
pub fn embedded_json(text: &str) -> impl Iterator<Item = Value> + '_ {
    text.match_indices(['{', '[']).filter_map(move |(start, _)| {
        let mut stream = serde_json::Deserializer::from_str(&text[start..]).into_iter::<Value>();
        match stream.next() {
            Some(Ok(value)) => {
                debug!("Extracted embedded JSON at offset {}", start);
                Some(value)
            }
            Some(Err(e)) => {
                trace!("No JSON at offset {}: {}", start, e);
                None
            }
            None => None,
        }
    })
}

/// Classify an already-parsed JSON payload.
pub fn classify_value(value: &Value) -> ChannelPayload {
    if let Some(error) = value.get("error") {
        return classify_error(error);
    }

    match value {
        Value::String(version) => ChannelPayload::VersionList(vec![version.clone()]),
        Value::Array(items) => version_list(items),
        Value::Object(map) => match map.get("versions") {
            Some(Value::Array(items)) => version_list(items),
            Some(Value::Object(versions)) => {
                ChannelPayload::VersionList(versions.keys().cloned().collect())
            }
            Some(Value::String(version)) => ChannelPayload::VersionList(vec![version.clone()]),
            _ => {
                debug!("JSON object without versions: {}", value);
                ChannelPayload::Unparseable
            }
        },
        _ => {
            debug!("Unexpected JSON payload: {}", value);
            ChannelPayload::Unparseable
        }
    }
}

fn version_list(items: &[Value]) -> ChannelPayload {
    let versions: Option<Vec<String>> = items
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect();

    match versions {
        Some(versions) => ChannelPayload::VersionList(versions),
        None => {
            debug!("Version list contains non-string entries");
            ChannelPayload::Unparseable
        }
    }
}

/// Classify the value of an `error` field.
///
/// npm CLI errors are objects (`{"code": "E404", "summary": ...}`); registry
/// documents use plain strings (`{"error": "Not found"}`).
fn classify_error(error: &Value) -> ChannelPayload {
    match error {
        Value::String(message) => {
            if message.eq_ignore_ascii_case("not found") {
                ChannelPayload::NotFoundError
            } else {
                ChannelPayload::OtherError(message.clone())
            }
        }
        Value::Object(map) => {
            let code = map.get("code").and_then(Value::as_str);
            if code == Some(NOT_FOUND_CODE) {
                return ChannelPayload::NotFoundError;
            }

            let message = ["message", "summary", "detail"]
                .iter()
                .filter_map(|key| map.get(*key).and_then(Value::as_str))
                .find(|s| !s.trim().is_empty())
                .or(code)
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            ChannelPayload::OtherError(message)
        }
        other => ChannelPayload::OtherError(other.to_string()),
    }
}

/// Reconcile both channels and the exit status into a lookup result.
///
/// `exit_code` is `None` when the process was killed by a signal.
pub fn reconcile(stdout: &str, stderr: &str, success: bool, exit_code: Option<i32>) -> LookupResult {
    let primary = classify(stdout);
    let secondary = classify(stderr);
    debug!("Classified stdout as {:?}, stderr as {:?}", primary, secondary);

    if primary == ChannelPayload::NotFoundError || secondary == ChannelPayload::NotFoundError {
        return LookupResult::NotFound;
    }

    for payload in [&primary, &secondary] {
        if let ChannelPayload::OtherError(message) = payload {
            return LookupResult::Failed(message.clone());
        }
    }

    if !success {
        let raw = stderr.trim();
        if !raw.is_empty() {
            return LookupResult::Failed(raw.to_string());
        }
        return LookupResult::Failed(match exit_code {
            Some(code) => format!("npm exited with status {}", code),
            None => "npm was terminated by a signal".to_string(),
        });
    }

    match primary {
        ChannelPayload::VersionList(versions) => LookupResult::from_versions(versions),
        ChannelPayload::Empty => LookupResult::NotFound,
        _ => LookupResult::Failed("unrecognized registry response".to_string()),
    }
}
