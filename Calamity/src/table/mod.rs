//! Hash list loading
//!
//! The hash list maps every model to the texture instance and the
//! `kidsobjdb` entry that resolves it. Each non-empty line holds three
//! whitespace-separated tokens:
//!
//! ```text
//! <asset id> <texture key> <database key>
//! ```
//!
//! Lines that do not have exactly three tokens are kept aside as
//! [`RejectedLine`]s instead of failing the whole load, so the remap can
//! report them next to the other per-row failures.

use std::fmt;
use std::path::Path;

use crate::error::{Error, Result};

/// One row of the hash list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// Base name shared by the `.g1m` model and its output bundle folder
    pub asset_id: String,
    /// Texture instance identifier (names the `.ktid` / `.g1t` pair)
    pub texture_key: String,
    /// `<category>/<rest>` key into `KIDSSystemResource/kidsobjdb`
    pub database_key: String,
}

impl TableRow {
    /// Create a row from its three fields
    pub fn new(
        asset_id: impl Into<String>,
        texture_key: impl Into<String>,
        database_key: impl Into<String>,
    ) -> Self {
        Self {
            asset_id: asset_id.into(),
            texture_key: texture_key.into(),
            database_key: database_key.into(),
        }
    }
}

impl fmt::Display for TableRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.asset_id, self.texture_key, self.database_key)
    }
}

/// A non-empty line that could not be parsed into a [`TableRow`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedLine {
    /// 1-indexed line number in the source
    pub line: usize,
    /// The raw line text (trailing line ending stripped)
    pub text: String,
    /// Number of tokens found
    pub token_count: usize,
}

impl fmt::Display for RejectedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}: expected 3 fields, found {} in {:?}",
            self.line, self.token_count, self.text
        )
    }
}

/// The parsed hash list, in source order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathTable {
    rows: Vec<TableRow>,
    rejected: Vec<RejectedLine>,
}

impl PathTable {
    /// Parse a hash list from text.
    ///
    /// Never fails: malformed lines end up in [`PathTable::rejected`].
    pub fn parse(text: &str) -> Self {
        let mut table = PathTable::default();

        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim_end_matches('\r');
            let tokens: Vec<&str> = line.split_whitespace().collect();

            match tokens.as_slice() {
                [] => {}
                [asset_id, texture_key, database_key] => {
                    table.rows.push(TableRow::new(*asset_id, *texture_key, *database_key));
                }
                other => table.rejected.push(RejectedLine {
                    line: index + 1,
                    text: line.to_string(),
                    token_count: other.len(),
                }),
            }
        }

        table
    }

    /// Read and parse a hash list file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::TableRead {
            path: path.to_path_buf(),
            source,
        })?;

        let table = Self::parse(&text);
        tracing::info!(
            "Loaded hash list {}: {} rows, {} rejected",
            path.display(),
            table.rows.len(),
            table.rejected.len()
        );
        Ok(table)
    }

    /// Build a table directly from rows
    pub fn from_rows(rows: Vec<TableRow>) -> Self {
        Self {
            rows,
            rejected: Vec::new(),
        }
    }

    /// Well-formed rows in source order
    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    /// Malformed lines in source order
    pub fn rejected(&self) -> &[RejectedLine] {
        &self.rejected
    }

    /// Number of well-formed rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no well-formed rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_rows_in_order() {
        let table = PathTable::parse(
            "modelA tex01 CharacterEditor/foo/bar\nmodelB tex02 FieldEditor4/baz\n",
        );

        assert_eq!(
            table.rows(),
            &[
                TableRow::new("modelA", "tex01", "CharacterEditor/foo/bar"),
                TableRow::new("modelB", "tex02", "FieldEditor4/baz"),
            ]
        );
        assert!(table.rejected().is_empty());
    }

    #[test]
    fn test_parse_skips_blank_and_crlf() {
        let table = PathTable::parse("a b c\r\n\r\n   \nd e f\r\n");
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[1].database_key, "f");
        assert!(table.rejected().is_empty());
    }

    #[test]
    fn test_parse_rejects_wrong_field_count() {
        let table = PathTable::parse("a b c\nonly two\na b c d\n");

        assert_eq!(table.len(), 1);
        assert_eq!(
            table.rejected(),
            &[
                RejectedLine { line: 2, text: "only two".to_string(), token_count: 2 },
                RejectedLine { line: 3, text: "a b c d".to_string(), token_count: 4 },
            ]
        );
    }

    #[test]
    fn test_parse_tolerates_extra_whitespace() {
        let table = PathTable::parse("  modelA\ttex01   CharacterEditor/x  ");
        assert_eq!(table.rows(), &[TableRow::new("modelA", "tex01", "CharacterEditor/x")]);
    }

    #[test]
    fn test_load_missing_file() {
        let err = PathTable::load("/definitely/not/a/hash-list").unwrap_err();
        assert!(matches!(err, Error::TableRead { .. }));
    }

    #[test]
    fn test_row_display() {
        let row = TableRow::new("m", "t", "CharacterEditor/k");
        assert_eq!(row.to_string(), "m t CharacterEditor/k");
    }
}
