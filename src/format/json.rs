//! JSON encoding helpers shared by the format implementations.

use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::format::error::FormatError;

/// Default indentation width for pretty-printed files.
pub const DEFAULT_INDENT: usize = 4;

/// Pretty-print `value` with `indent` spaces per level.
///
/// Object keys come out sorted when `value` is a [`serde_json::Value`].
pub fn to_pretty_bytes<T: Serialize + ?Sized>(
    value: &T,
    indent: usize,
) -> Result<Vec<u8>, FormatError> {
    let indent = vec![b' '; indent];
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(&indent));
    value.serialize(&mut ser)?;
    Ok(buf)
}

/// Parse a JSON file into `T`, or `None` if the file does not exist.
pub fn read_if_exists<T: serde::de::DeserializeOwned>(
    path: &Path,
) -> Result<Option<T>, FormatError> {
    if !path.is_file() {
        return Ok(None);
    }
    let json = std::fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&json)?))
}
