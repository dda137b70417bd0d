//! Key layout for records, fields and secondary indexes
//!
//! Every record is spread over three kinds of keys:
//!
//! ```text
//! schema:table:id                                  existence (sentinel value)
//! schema:table:id:field                            field value
//! index.system:schema:table:field:value:id         index entry (value = id)
//! ```
//!
//! ## Contract
//!
//! - Segments are joined with `:`.
//! - Inside a segment `\` is written as `\\` and `:` as `\:`, so a segment
//!   never contains a bare separator. Binary index values are safe and
//!   `St` never prefix-matches `St:Leonards`.
//! - Fixing every segment except the last one yields a contiguous prefix
//!   range. The id is always the last segment of an index key, so scanning
//!   `index.system:schema:table:field:value:` enumerates exactly the ids
//!   holding that value.
//! - Schema, table, id and field segments must not be empty. Encoded values
//!   may be (an empty blob or string is a legal indexed value).

use crate::error::{Error, Result};

/// Namespace all index keys live under
pub const INDEX_NAMESPACE: &str = "index.system";

/// Identifiers user schemas may not use for schema, table or field names
pub const RESERVED_WORDS: &[&str] = &[INDEX_NAMESPACE];

/// Segment separator
pub const SEPARATOR: u8 = b':';

const ESCAPE: u8 = b'\\';

/// Value stored under a record-existence key
pub const SENTINEL: &[u8] = &[0];

/// Returns true if `name` is reserved for internal use
pub fn is_reserved(name: &str) -> bool {
    RESERVED_WORDS.contains(&name)
}

/// Builds keys for one `(schema, table)` partition
#[derive(Debug, Clone, Copy)]
pub struct KeyBuilder<'a> {
    schema: &'a str,
    table: &'a str,
}

/// A key found under [`KeyBuilder::table_prefix`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEntry {
    /// Record-existence key carrying the record id
    Record(String),
    /// Field-value key of the given record
    Field {
        /// Record id
        id: String,
        /// Field name
        field: String,
    },
}

impl<'a> KeyBuilder<'a> {
    /// Create a builder for keys under `schema` and `table`
    pub fn new(schema: &'a str, table: &'a str) -> Self {
        Self { schema, table }
    }

    /// `schema:table:id`
    pub fn record_key(&self, id: &str) -> Result<Vec<u8>> {
        self.check_partition()?;
        let mut key = Vec::new();
        push_segments(&mut key, &[self.schema.as_bytes(), self.table.as_bytes()]);
        push_segment(&mut key, required(id, "id")?);
        Ok(key)
    }

    /// `schema:table:id:field`
    pub fn field_key(&self, id: &str, field: &str) -> Result<Vec<u8>> {
        let mut key = self.record_key(id)?;
        push_segment(&mut key, required(field, "field")?);
        Ok(key)
    }

    /// `schema:table:id:`: every field key of one record
    pub fn field_prefix(&self, id: &str) -> Result<Vec<u8>> {
        let mut key = self.record_key(id)?;
        key.push(SEPARATOR);
        Ok(key)
    }

    /// `schema:table:`: existence and field keys of every record in the table
    pub fn table_prefix(&self) -> Result<Vec<u8>> {
        self.check_partition()?;
        let mut key = Vec::new();
        push_segments(&mut key, &[self.schema.as_bytes(), self.table.as_bytes()]);
        key.push(SEPARATOR);
        Ok(key)
    }

    /// `index.system:schema:table:field:value:id`
    pub fn index_key(&self, field: &str, value: &[u8], id: &str) -> Result<Vec<u8>> {
        let mut key = self.index_prefix(field, value)?;
        push_escaped(&mut key, required(id, "id")?);
        Ok(key)
    }

    /// `index.system:schema:table:field:value:`: ids holding `value` in `field`
    pub fn index_prefix(&self, field: &str, value: &[u8]) -> Result<Vec<u8>> {
        self.check_partition()?;
        let mut key = Vec::new();
        push_segments(
            &mut key,
            &[
                INDEX_NAMESPACE.as_bytes(),
                self.schema.as_bytes(),
                self.table.as_bytes(),
                required(field, "field")?,
            ],
        );
        push_segment(&mut key, value);
        key.push(SEPARATOR);
        Ok(key)
    }

    /// Classify a key found by scanning [`table_prefix`](Self::table_prefix)
    ///
    /// Returns `Ok(None)` if the key does not belong to this table.
    pub fn parse_table_entry(&self, key: &[u8]) -> Result<Option<TableEntry>> {
        let prefix = self.table_prefix()?;
        let Some(rest) = key.strip_prefix(prefix.as_slice()) else {
            return Ok(None);
        };
        let mut segments = split_segments(rest)?;
        let entry = match segments.len() {
            1 => TableEntry::Record(into_string(segments.remove(0))?),
            2 => {
                let field = into_string(segments.remove(1))?;
                TableEntry::Field {
                    id: into_string(segments.remove(0))?,
                    field,
                }
            }
            n => {
                return Err(Error::MalformedKey(format!(
                    "expected 1 or 2 segments after table prefix, found {}",
                    n
                )))
            }
        };
        Ok(Some(entry))
    }

    fn check_partition(&self) -> Result<()> {
        required(self.schema, "schema")?;
        required(self.table, "table")?;
        Ok(())
    }
}

fn required<'s>(segment: &'s str, what: &str) -> Result<&'s [u8]> {
    if segment.is_empty() {
        return Err(Error::MalformedKey(format!("empty {}", what)));
    }
    Ok(segment.as_bytes())
}

fn push_segments(key: &mut Vec<u8>, segments: &[&[u8]]) {
    for segment in segments {
        push_segment(key, segment);
    }
}

/// Append a separator (unless `key` is empty) followed by the escaped segment
fn push_segment(key: &mut Vec<u8>, segment: &[u8]) {
    if !key.is_empty() {
        key.push(SEPARATOR);
    }
    push_escaped(key, segment);
}

fn push_escaped(key: &mut Vec<u8>, segment: &[u8]) {
    for &b in segment {
        if b == SEPARATOR || b == ESCAPE {
            key.push(ESCAPE);
        }
        key.push(b);
    }
}

/// Split on unescaped separators, unescaping each segment
fn split_segments(raw: &[u8]) -> Result<Vec<Vec<u8>>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();
    let mut escaped = false;
    for &b in raw {
        if escaped {
            current.push(b);
            escaped = false;
        } else if b == ESCAPE {
            escaped = true;
        } else if b == SEPARATOR {
            segments.push(std::mem::take(&mut current));
        } else {
            current.push(b);
        }
    }
    if escaped {
        return Err(Error::MalformedKey("dangling escape byte".to_string()));
    }
    segments.push(current);
    Ok(segments)
}

fn into_string(segment: Vec<u8>) -> Result<String> {
    String::from_utf8(segment)
        .map_err(|_| Error::MalformedKey("key segment is not valid UTF-8".to_string()))
}
