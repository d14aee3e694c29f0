//! Serialization of a result set into the published JSON document.

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use super::models::ResultSet;
use crate::errors::{NewsflowError, Result};

const INDENT: &[u8] = b"    ";

/// Serializes a result set as pretty JSON with four-space indentation.
///
/// Non-ASCII characters are written as UTF-8, not escaped. Passing `None`
/// fails with [`NewsflowError::EmptyInput`]; an empty result set is valid and
/// produces `{"content": {}}`.
pub fn serialize(result_set: Option<&ResultSet>) -> Result<Vec<u8>> {
    let result_set = result_set.ok_or(NewsflowError::EmptyInput)?;

    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    result_set
        .serialize(&mut ser)
        .map_err(|e| NewsflowError::Serialization(e.to_string()))?;
    Ok(buf)
}
