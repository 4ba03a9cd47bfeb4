use std::fs::File;
use std::path::Path;

use serde_json::{Map, Value as JsonValue};

use super::model::{GradeTable, Record};
use crate::config::ColumnNames;
use crate::error::DataFormatError;

/// Everything the loader needs besides the path.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub delimiter: u8,
    pub columns: ColumnNames,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            columns: ColumnNames::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a grade table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.tsv`  – tab separated, header row
/// * `.json` – `[{ "Alumno": "...", "Nota": 7.5, "Tipo_Examen": "..." }, ...]`
/// * anything else – delimited text using `options.delimiter`
pub fn load_file(path: &Path, options: &LoadOptions) -> Result<GradeTable, DataFormatError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "json" => load_json(path, &options.columns),
        "tsv" => load_delimited(path, b'\t', &options.columns),
        _ => load_delimited(path, options.delimiter, &options.columns),
    }
}

// ---------------------------------------------------------------------------
// Delimited text loader
// ---------------------------------------------------------------------------

/// Header row with column names; every row must have the header's width.
/// Columns other than the three configured ones are ignored.
fn load_delimited(
    path: &Path,
    delimiter: u8,
    columns: &ColumnNames,
) -> Result<GradeTable, DataFormatError> {
    let file = open(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader.headers()?.clone();
    let position = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| DataFormatError::MissingColumn(name.to_string()))
    };
    let student_idx = position(&columns.student)?;
    let score_idx = position(&columns.score)?;
    let exam_idx = position(&columns.exam_type)?;

    let mut records = Vec::new();

    for (i, result) in reader.records().enumerate() {
        let row = result?;
        let row_no = i + 1;

        let field = |idx: usize| row.get(idx).unwrap_or("");
        let score = parse_score(field(score_idx), row_no)?;
        records.push(build_record(
            row_no,
            field(student_idx),
            score,
            field(exam_idx),
        )?);
    }

    log::debug!(
        "read {} rows from {} (delimiter {:?})",
        records.len(),
        path.display(),
        delimiter as char
    );
    Ok(GradeTable::from_records(records, columns.clone()))
}

fn parse_score(raw: &str, row: usize) -> Result<f64, DataFormatError> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| DataFormatError::InvalidScore {
            row,
            value: raw.to_string(),
        })
}

fn build_record(
    row: usize,
    student: &str,
    score: f64,
    exam_type: &str,
) -> Result<Record, DataFormatError> {
    if exam_type.is_empty() {
        return Err(DataFormatError::InvalidRecord {
            row,
            reason: "empty exam type".to_string(),
        });
    }
    Ok(Record::new(student, score, exam_type))
}

fn open(path: &Path) -> Result<File, DataFormatError> {
    File::open(path).map_err(|source| DataFormatError::Io {
        path: path.display().to_string(),
        source,
    })
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
/// Scores may be numbers or numeric strings; labels may be any scalar.
fn load_json(path: &Path, columns: &ColumnNames) -> Result<GradeTable, DataFormatError> {
    let rows: Vec<Map<String, JsonValue>> = serde_json::from_reader(open(path)?)?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, obj) in rows.iter().enumerate() {
        let row_no = i + 1;
        let get = |name: &str| {
            obj.get(name)
                .ok_or_else(|| DataFormatError::MissingColumn(name.to_string()))
        };

        let score = match get(&columns.score)? {
            JsonValue::Number(n) => n.as_f64().filter(|v| v.is_finite()),
            JsonValue::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        }
        .ok_or_else(|| DataFormatError::InvalidScore {
            row: row_no,
            value: get(&columns.score).map(|v| v.to_string()).unwrap_or_default(),
        })?;

        let student = json_label(get(&columns.student)?);
        let exam_type = json_label(get(&columns.exam_type)?);
        records.push(build_record(row_no, &student, score, &exam_type)?);
    }

    Ok(GradeTable::from_records(records, columns.clone()))
}

fn json_label(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.trim().to_string(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}
