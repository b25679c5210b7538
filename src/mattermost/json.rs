//! Safe access into the untyped JSON returned by Mattermost.

use super::error::MattermostError;
use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Serializer, Value};

/// Get the string stored under `key` in a JSON object.
///
/// Anything other than an object is an unexpected format; an object without a
/// string under `key` is a missing key.
pub fn get_kv<'a>(response: &'a Value, key: &str) -> Result<&'a str, MattermostError> {
    let obj = response
        .as_object()
        .ok_or(MattermostError::UnexpectedFormat)?;

    obj.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| MattermostError::MissingKey(key.to_owned()))
}

/// Render a response as indented JSON for the terminal.
pub fn to_pretty_string(v: &Value) -> Result<String, MattermostError> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    v.serialize(&mut ser).map_err(MattermostError::Serialize)?;

    // serde_json only ever writes valid UTF-8.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
