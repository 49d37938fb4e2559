//! Student roster spreadsheets.
//!
//! Rosters arrive as CSV exported from whatever the school office uses, so
//! columns are located by loose header matching rather than position.

use csv::{ReaderBuilder, Trim, WriterBuilder};
use serde::Deserialize;
use thiserror::Error;

use crate::entities::students;

const NAME_HEADERS: &[&str] = &["الاسم", "اسم", "name"];
const GRADE_HEADERS: &[&str] = &["الصف", "صف", "grade", "class"];
const PHONE_HEADERS: &[&str] = &["رقم", "هاتف", "ولي", "phone", "guardian"];

/// Column titles written by [`export`].
const EXPORT_HEADERS: [&str; 5] = [
    "الاسم",
    "الصف",
    "رقم ولي الأمر",
    "حالة خاصة",
    "المرض المزمن",
];

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("The file is empty or has no data rows")]
    Empty,

    #[error("No name column was found in the file")]
    MissingNameColumn,

    #[error("Could not read the file: {0}")]
    Malformed(#[from] csv::Error),
}

/// A candidate student, before reconciliation against the existing roster.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RosterEntry {
    pub name: String,
    #[serde(default, deserialize_with = "crate::domain::lenient::opt_text")]
    pub grade: Option<String>,
    #[serde(default, deserialize_with = "crate::domain::lenient::opt_text")]
    pub phone: Option<String>,
}

impl RosterEntry {
    /// Trims every field and turns blanks into absent values. Returns `None`
    /// when the name is blank.
    #[must_use]
    pub fn normalized(self) -> Option<Self> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return None;
        }
        Some(Self {
            name,
            grade: non_blank(self.grade),
            phone: non_blank(self.phone),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn find_column(headers: &csv::StringRecord, needles: &[&str]) -> Option<usize> {
    headers.iter().position(|header| {
        let header = header.to_lowercase();
        needles.iter().any(|needle| header.contains(needle))
    })
}

/// Parses a roster. The first row is the header.
///
/// # Errors
///
/// Fails when the file has no data rows, no header resembling a name column,
/// or is not valid CSV.
pub fn parse(data: &[u8]) -> Result<Vec<RosterEntry>, RosterError> {
    let data = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    let name_col = find_column(&headers, NAME_HEADERS);
    let grade_col = find_column(&headers, GRADE_HEADERS);
    let phone_col = find_column(&headers, PHONE_HEADERS);

    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(record?);
    }
    if rows.is_empty() {
        return Err(RosterError::Empty);
    }
    let name_col = name_col.ok_or(RosterError::MissingNameColumn)?;

    let cell = |row: &csv::StringRecord, col: Option<usize>| {
        col.and_then(|c| row.get(c)).map(str::to_string)
    };

    Ok(rows
        .iter()
        .filter_map(|row| {
            RosterEntry {
                name: cell(row, Some(name_col)).unwrap_or_default(),
                grade: cell(row, grade_col),
                phone: cell(row, phone_col),
            }
            .normalized()
        })
        .collect())
}

/// Writes the roster as CSV with Arabic column titles, ready to be opened
/// in a spreadsheet.
///
/// # Errors
///
/// Only fails if the CSV writer does.
pub fn export(students: &[students::Model]) -> Result<Vec<u8>, RosterError> {
    let mut writer = WriterBuilder::new().from_writer(b"\xEF\xBB\xBF".to_vec());
    writer.write_record(EXPORT_HEADERS)?;

    for student in students {
        writer.write_record([
            student.name.as_str(),
            student.grade.as_str(),
            student.phone.as_deref().unwrap_or_default(),
            if student.is_special_case { "نعم" } else { "لا" },
            student.chronic_condition.as_deref().unwrap_or_default(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| RosterError::Malformed(e.into_error().into()))
}
