use crate::common::constants::SCHEDULE_HEADER;
use crate::domain::{LoanRequest, LoanResponse, ScheduleRow, VerifyError};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("failed to parse JSON '{}': {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(
        "schedule header mismatch in '{}': found [{}], expected [{}]",
        .path.display(),
        .found.join(","),
        SCHEDULE_HEADER.join(",")
    )]
    HeaderShape { path: PathBuf, found: Vec<String> },
    #[error("failed to read CSV '{}' at row {row}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        row: usize,
        #[source]
        source: csv::Error,
    },
    #[error(
        "schedule row {row} in '{}' has {found} fields, expected {expected}",
        .path.display()
    )]
    FieldCount {
        path: PathBuf,
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error(
        "schedule row {row} in '{}' has non-integer {column} '{value}'",
        .path.display()
    )]
    Integer {
        path: PathBuf,
        row: usize,
        column: &'static str,
        value: String,
    },
}

impl From<ParseError> for VerifyError {
    fn from(error: ParseError) -> Self {
        let message = error.to_string();
        let code = match error {
            ParseError::Json { .. } => "FORMAT.JSON",
            ParseError::HeaderShape { .. } => "FORMAT.SCHEDULE_HEADER",
            ParseError::Csv { .. } | ParseError::FieldCount { .. } => "FORMAT.SCHEDULE_ROW",
            ParseError::Integer { .. } => "FORMAT.SCHEDULE_FIELD",
        };
        VerifyError::format_violation(code, message)
    }
}

pub fn parse_request_json(path: &Path, text: &str) -> Result<LoanRequest, ParseError> {
    parse_json(path, text)
}

pub fn parse_response_json(path: &Path, text: &str) -> Result<LoanResponse, ParseError> {
    parse_json(path, text)
}

fn parse_json<T: DeserializeOwned>(path: &Path, text: &str) -> Result<T, ParseError> {
    serde_json::from_str(text).map_err(|source| ParseError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses the schedule table. The header must match [`SCHEDULE_HEADER`]
/// exactly and is checked before any data row is read.
pub fn parse_schedule_csv(path: &Path, text: &str) -> Result<Vec<ScheduleRow>, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let header = reader.headers().map_err(|source| ParseError::Csv {
        path: path.to_path_buf(),
        row: 0,
        source,
    })?;
    if !header.iter().eq(SCHEDULE_HEADER.iter().copied()) {
        return Err(ParseError::HeaderShape {
            path: path.to_path_buf(),
            found: header.iter().map(str::to_string).collect(),
        });
    }

    let mut rows = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let row = index + 1;
        let record = result.map_err(|source| ParseError::Csv {
            path: path.to_path_buf(),
            row,
            source,
        })?;
        if record.len() != SCHEDULE_HEADER.len() {
            return Err(ParseError::FieldCount {
                path: path.to_path_buf(),
                row,
                found: record.len(),
                expected: SCHEDULE_HEADER.len(),
            });
        }

        let integer = |column: usize| -> Result<i64, ParseError> {
            let value = &record[column];
            value.trim().parse::<i64>().map_err(|_| ParseError::Integer {
                path: path.to_path_buf(),
                row,
                column: SCHEDULE_HEADER[column],
                value: value.to_string(),
            })
        };

        rows.push(ScheduleRow {
            period: integer(0)?,
            date: record[1].to_string(),
            payment_cents: integer(2)?,
            principal_cents: integer(3)?,
            interest_cents: integer(4)?,
            balance_cents: integer(5)?,
        });
    }

    Ok(rows)
}
