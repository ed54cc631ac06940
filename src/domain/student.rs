//! Student proficiency tables.
//!
//! The first row is a header naming the student-id column followed by one
//! standard per column. Every other row holds a student id followed by the
//! domain each standard was tested at, aligned with the header.

use thiserror::Error;

use crate::domain::{Domain, ProficiencyRecord, RankError, Standard};

/// Errors in the header of a student table. These make the whole table
/// unusable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StudentTableError {
    /// The table has no header row.
    #[error("the student table has no header row")]
    MissingHeader,

    /// A header cell after the id column is empty.
    #[error("header column {column} does not name a standard")]
    EmptyStandard {
        /// 1-based column number.
        column: usize,
    },

    /// The same standard heads two columns.
    #[error("standard '{0}' appears more than once in the header")]
    DuplicateStandard(Standard),
}

/// Errors confined to a single student.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StudentError {
    /// The student id cell is empty.
    #[error("row {row}: missing student id")]
    MissingId {
        /// 1-based row number.
        row: usize,
    },

    /// The row has more cells than the header has columns.
    #[error("row {row}: expected at most {expected} cells, found {found}")]
    TooManyCells {
        /// 1-based row number.
        row: usize,
        /// The number of header columns.
        expected: usize,
        /// The number of cells in the row.
        found: usize,
    },

    /// A tested domain cannot be ranked.
    #[error("student '{student}': {source}")]
    Rank {
        /// The student id.
        student: String,
        /// The underlying rank error.
        source: RankError,
    },
}

/// A student and their proficiency record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRecord {
    /// The student id, as given in the first column.
    pub id: String,
    /// The highest domain tested per standard.
    pub proficiency: ProficiencyRecord,
}

/// A parsed student table.
///
/// Rows that cannot be read are kept as errors so the remaining students
/// can still be planned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentTable {
    id_column: String,
    standards: Vec<Standard>,
    students: Vec<Result<StudentRecord, StudentError>>,
}

impl StudentTable {
    /// Parses a student table from raw rows.
    ///
    /// Empty cells, and cells missing from the end of a short row, mean the
    /// standard was not tested.
    ///
    /// # Errors
    ///
    /// Returns a [`StudentTableError`] if the header is missing or invalid.
    pub fn from_rows<R: AsRef<[String]>>(rows: &[R]) -> Result<Self, StudentTableError> {
        let (header, body) = rows.split_first().ok_or(StudentTableError::MissingHeader)?;
        let header = header.as_ref();
        let (id_column, standard_cells) = header
            .split_first()
            .ok_or(StudentTableError::MissingHeader)?;

        let mut standards: Vec<Standard> = Vec::with_capacity(standard_cells.len());
        for (index, cell) in standard_cells.iter().enumerate() {
            let standard = Standard::new(cell)
                .map_err(|_| StudentTableError::EmptyStandard { column: index + 2 })?;
            if standards.contains(&standard) {
                return Err(StudentTableError::DuplicateStandard(standard));
            }
            standards.push(standard);
        }

        let students = body
            .iter()
            .enumerate()
            .filter(|(_, row)| row.as_ref().iter().any(|cell| !cell.trim().is_empty()))
            .map(|(index, row)| parse_student(index + 2, row.as_ref(), &standards))
            .collect();

        Ok(Self {
            id_column: id_column.trim().to_string(),
            standards,
            students,
        })
    }

    /// The header of the student-id column.
    #[must_use]
    pub fn id_column(&self) -> &str {
        &self.id_column
    }

    /// The standards named in the header, in column order.
    #[must_use]
    pub fn standards(&self) -> &[Standard] {
        &self.standards
    }

    /// Every student row, in table order.
    #[must_use]
    pub fn students(&self) -> &[Result<StudentRecord, StudentError>] {
        &self.students
    }

    /// The number of student rows, including unreadable ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.students.len()
    }

    /// Whether the table has no student rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }
}

fn parse_student(
    row: usize,
    cells: &[String],
    standards: &[Standard],
) -> Result<StudentRecord, StudentError> {
    let (id, domains) = cells.split_first().ok_or(StudentError::MissingId { row })?;
    let id = id.trim();
    if id.is_empty() {
        return Err(StudentError::MissingId { row });
    }

    if domains.len() > standards.len() {
        return Err(StudentError::TooManyCells {
            row,
            expected: standards.len() + 1,
            found: cells.len(),
        });
    }

    let proficiency = standards
        .iter()
        .zip(domains)
        .filter_map(|(standard, cell)| {
            Domain::new(cell)
                .ok()
                .map(|domain| (standard.clone(), domain))
        })
        .collect();

    Ok(StudentRecord {
        id: id.to_string(),
        proficiency,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::mapper::tests::table;

    fn standard(s: &str) -> Standard {
        Standard::new(s).unwrap()
    }

    #[test]
    fn parses_header_and_students() {
        let rows = table(&[
            &["Student Name", "RF", "RL", "RI", "L"],
            &["Albin Stanton", "2", "3", "K", "3"],
            &["Erik Purdy", "3", "1", "1", "1"],
        ]);
        let table = StudentTable::from_rows(&rows).unwrap();

        assert_eq!(table.id_column(), "Student Name");
        assert_eq!(
            table.standards(),
            &[standard("RF"), standard("RL"), standard("RI"), standard("L")]
        );
        assert_eq!(table.len(), 2);

        let albin = table.students()[0].as_ref().unwrap();
        assert_eq!(albin.id, "Albin Stanton");
        assert_eq!(
            albin.proficiency.get(&standard("RI")),
            Some(&Domain::new("K").unwrap())
        );
    }

    #[test]
    fn blank_and_missing_cells_are_untested() {
        let rows = table(&[&["id", "RF", "RL", "RI"], &["a", "2", ""], &["b"]]);
        let table = StudentTable::from_rows(&rows).unwrap();

        let a = table.students()[0].as_ref().unwrap();
        assert_eq!(a.proficiency.len(), 1);
        assert_eq!(a.proficiency.get(&standard("RL")), None);

        let b = table.students()[1].as_ref().unwrap();
        assert!(b.proficiency.is_empty());
    }

    #[test]
    fn bad_rows_do_not_abort_the_table() {
        let rows = table(&[
            &["id", "RF"],
            &["", "2"],
            &["a", "1", "2"],
            &["b", "K"],
        ]);
        let table = StudentTable::from_rows(&rows).unwrap();

        assert_eq!(table.students()[0], Err(StudentError::MissingId { row: 2 }));
        assert_eq!(
            table.students()[1],
            Err(StudentError::TooManyCells {
                row: 3,
                expected: 2,
                found: 3,
            })
        );
        assert!(table.students()[2].is_ok());
    }

    #[test]
    fn blank_rows_are_skipped() {
        let rows = table(&[&["id", "RF"], &["", ""], &["a", "1"]]);
        let table = StudentTable::from_rows(&rows).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn missing_header_is_an_error() {
        let rows: Vec<Vec<String>> = Vec::new();
        assert_eq!(
            StudentTable::from_rows(&rows),
            Err(StudentTableError::MissingHeader)
        );
    }

    #[test]
    fn empty_header_standard_is_an_error() {
        let rows = table(&[&["id", "RF", " "]]);
        assert_eq!(
            StudentTable::from_rows(&rows),
            Err(StudentTableError::EmptyStandard { column: 3 })
        );
    }

    #[test]
    fn duplicate_header_standard_is_an_error() {
        let rows = table(&[&["id", "RF", "RF"]]);
        assert_eq!(
            StudentTable::from_rows(&rows),
            Err(StudentTableError::DuplicateStandard(standard("RF")))
        );
    }
}
