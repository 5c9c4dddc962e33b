//! The CSV data table.

use std::fmt;
use std::path::Path;

/// Error loading the data table.
#[derive(Debug)]
pub enum TableError {
    /// The file could not be opened or read.
    Io(String),
    /// The CSV structure could not be parsed.
    Malformed(String),
    /// A cell contains an embedded line break. Slates are line-oriented, so
    /// the whole file is rejected rather than producing torn output.
    EmbeddedNewline { row: usize },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::Io(msg) => write!(f, "CSV file not readable: {}", msg),
            TableError::Malformed(msg) => write!(f, "CSV file not valid: {}", msg),
            TableError::EmbeddedNewline { row } => {
                write!(f, "CSV file not valid: row {} contains a line break", row)
            }
        }
    }
}

impl std::error::Error for TableError {}

impl From<csv::Error> for TableError {
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            TableError::Io(err.to_string())
        } else {
            TableError::Malformed(err.to_string())
        }
    }
}

/// An immutable table of string cells.
///
/// The table itself has no notion of a header; the orchestrator designates
/// one row as the header when it builds substitution contexts.
#[derive(Debug, Clone, Default)]
pub struct DataTable {
    rows: Vec<Vec<String>>,
}

impl DataTable {
    /// Load a UTF-8 CSV file.
    ///
    /// The reader is flexible: rows may carry different cell counts, and no
    /// row is consumed as an implicit header. Fully blank lines load as
    /// empty rows, so row numbers always match the file.
    pub fn load(path: &Path) -> Result<Self, TableError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)?;

        let mut rows: Vec<Vec<String>> = Vec::new();
        for record in reader.records() {
            let record = record?;
            // The reader swallows fully blank lines. Reinstate them as empty
            // rows from the record's file position; embedded newlines are
            // rejected below, so a record's start line is its row number.
            if let Some(line) = record.position().map(|p| p.line() as usize) {
                while rows.len() + 1 < line {
                    rows.push(Vec::new());
                }
            }
            let cells: Vec<String> = record.iter().map(str::to_string).collect();
            if cells.iter().any(|cell| cell.contains('\n') || cell.contains('\r')) {
                return Err(TableError::EmbeddedNewline { row: rows.len() + 1 });
            }
            rows.push(cells);
        }
        Ok(DataTable { rows })
    }

    /// Build a table from in-memory rows.
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        DataTable { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows, the header row included.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Row by 1-based number.
    pub fn row(&self, number: usize) -> Option<&[String]> {
        number
            .checked_sub(1)
            .and_then(|index| self.rows.get(index))
            .map(Vec::as_slice)
    }
}
