//! Delimited tables on disk
//!
//! Tables are read as plain rows of text cells. Rows may have different
//! lengths, and surrounding whitespace is trimmed from every cell. Giving
//! meaning to the cells is left to the domain layer.

use std::{
    fs::File,
    io::{Read, Write},
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::{debug, instrument};

use crate::domain::StudentPlan;

/// A row of text cells.
pub type Row = Vec<String>;

/// Errors reading or writing a delimited table.
#[derive(Debug, Error)]
pub enum TableError {
    /// The table file could not be opened or created.
    #[error("failed to open {}: {source}", .path.display())]
    Open {
        /// The table path.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },

    /// The delimiter is not a single-byte character.
    #[error("delimiter '{0}' must be a single-byte character")]
    Delimiter(char),

    /// A row could not be read.
    #[error("failed to read row {row}: {source}")]
    Read {
        /// 1-based row number.
        row: usize,
        /// The underlying CSV error.
        source: csv::Error,
    },

    /// A row could not be written.
    #[error("failed to write row for '{student}': {source}")]
    Write {
        /// The student the row belongs to.
        student: String,
        /// The underlying CSV error.
        source: csv::Error,
    },

    /// The output could not be flushed.
    #[error("failed to flush output: {0}")]
    Flush(#[from] std::io::Error),
}

fn delimiter_byte(delimiter: char) -> Result<u8, TableError> {
    u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or(TableError::Delimiter(delimiter))
}

/// Reads every row of a delimited table.
///
/// No row is treated as a header.
///
/// # Errors
///
/// Returns a [`TableError`] if the delimiter is invalid or a row cannot be
/// read.
pub fn read_rows<R: Read>(reader: R, delimiter: char) -> Result<Vec<Row>, TableError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .delimiter(delimiter_byte(delimiter)?)
        .from_reader(reader);

    reader
        .records()
        .enumerate()
        .map(|(index, record)| {
            record
                .map(|record| record.iter().map(ToString::to_string).collect())
                .map_err(|source| TableError::Read {
                    row: index + 1,
                    source,
                })
        })
        .collect()
}

/// Reads every row of a delimited table file.
///
/// # Errors
///
/// Returns a [`TableError`] if the file cannot be opened or a row cannot be
/// read.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn read_rows_from_path(path: &Path, delimiter: char) -> Result<Vec<Row>, TableError> {
    let file = File::open(path).map_err(|source| TableError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let rows = read_rows(file, delimiter)?;
    debug!(rows = rows.len(), "read table");
    Ok(rows)
}

/// Writes one row per student: the student id followed by their curriculum
/// units as `domain.standard`.
///
/// # Errors
///
/// Returns a [`TableError`] if the delimiter is invalid or the output cannot
/// be written.
pub fn write_plans<W: Write>(
    writer: W,
    plans: &[StudentPlan],
    delimiter: char,
) -> Result<(), TableError> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .delimiter(delimiter_byte(delimiter)?)
        .from_writer(writer);

    for plan in plans {
        let row = std::iter::once(plan.student_id.clone())
            .chain(plan.curriculum.iter().map(ToString::to_string));
        writer
            .write_record(row)
            .map_err(|source| TableError::Write {
                student: plan.student_id.clone(),
                source,
            })?;
    }

    writer.flush()?;
    Ok(())
}
