use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::config::ColumnNames;

// ---------------------------------------------------------------------------
// Record – one row of the input file
// ---------------------------------------------------------------------------

/// A single graded exam.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub student: String,
    pub score: f64,
    pub exam_type: String,
}

impl Record {
    pub fn new(student: &str, score: f64, exam_type: &str) -> Self {
        Self {
            student: student.to_string(),
            score,
            exam_type: exam_type.to_string(),
        }
    }
}

/// Addressable columns of a [`Record`], resolved from configured names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    Student,
    Score,
    ExamType,
}

impl RecordField {
    pub fn value(self, record: &Record) -> Value {
        match self {
            RecordField::Student => Value::from(record.student.as_str()),
            RecordField::Score => Value::from(record.score),
            RecordField::ExamType => Value::from(record.exam_type.as_str()),
        }
    }

    /// Text used to group rows by this field.
    pub fn key(self, record: &Record) -> String {
        match self {
            RecordField::Student => record.student.clone(),
            RecordField::Score => record.score.to_string(),
            RecordField::ExamType => record.exam_type.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// GradeTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// All records in file order, plus the distinct exam types.
#[derive(Debug, Clone)]
pub struct GradeTable {
    pub records: Vec<Record>,
    /// Header names the records were read from.
    pub columns: ColumnNames,
    /// Distinct exam types in order of first appearance.
    pub exam_types: Vec<String>,
}

impl GradeTable {
    pub fn from_records(records: Vec<Record>, columns: ColumnNames) -> Self {
        let mut exam_types: Vec<String> = Vec::new();
        for rec in &records {
            if !exam_types.iter().any(|t| *t == rec.exam_type) {
                exam_types.push(rec.exam_type.clone());
            }
        }
        GradeTable {
            records,
            columns,
            exam_types,
        }
    }

    /// Resolve a column name to a record field.
    pub fn field(&self, name: &str) -> Option<RecordField> {
        if name == self.columns.student {
            Some(RecordField::Student)
        } else if name == self.columns.score {
            Some(RecordField::Score)
        } else if name == self.columns.exam_type {
            Some(RecordField::ExamType)
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// GroupStatistic – one row of aggregated output
// ---------------------------------------------------------------------------

/// Summary of every score sharing one exam type, rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStatistic {
    pub exam_type: String,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// `None` when the group has fewer than two scores.
    pub std: Option<f64>,
}

impl fmt::Display for GroupStatistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: mean={:.2} median={:.2} std=",
            self.exam_type, self.mean, self.median
        )?;
        match self.std {
            Some(s) => write!(f, "{s:.2}"),
            None => write!(f, "NaN"),
        }
    }
}

/// Addressable columns of a [`GroupStatistic`].
///
/// The exam type keeps the input header name; the aggregates are always
/// `mean`, `median` and `std`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatField {
    ExamType,
    Mean,
    Median,
    Std,
}

impl StatField {
    pub fn resolve(name: &str, columns: &ColumnNames) -> Option<Self> {
        match name {
            "mean" => Some(StatField::Mean),
            "median" => Some(StatField::Median),
            "std" => Some(StatField::Std),
            _ if name == columns.exam_type => Some(StatField::ExamType),
            _ => None,
        }
    }

    /// Missing standard deviations become JSON `null`.
    pub fn value(self, stat: &GroupStatistic) -> Value {
        match self {
            StatField::ExamType => Value::from(stat.exam_type.as_str()),
            StatField::Mean => Value::from(stat.mean),
            StatField::Median => Value::from(stat.median),
            StatField::Std => stat.std.map(Value::from).unwrap_or(Value::Null),
        }
    }

    pub fn key(self, stat: &GroupStatistic) -> String {
        match self {
            StatField::ExamType => stat.exam_type.clone(),
            StatField::Mean => stat.mean.to_string(),
            StatField::Median => stat.median.to_string(),
            StatField::Std => stat
                .std
                .map(|s| s.to_string())
                .unwrap_or_else(|| "NaN".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> GradeTable {
        GradeTable::from_records(
            vec![
                Record::new("Ana", 8.0, "Parcial"),
                Record::new("Luis", 6.0, "Parcial"),
                Record::new("Ana", 9.0, "Final"),
                Record::new("Eva", 5.5, "Parcial"),
            ],
            ColumnNames::default(),
        )
    }

    #[test]
    fn exam_types_keep_first_appearance_order() {
        assert_eq!(table().exam_types, vec!["Parcial", "Final"]);
    }

    #[test]
    fn exam_types_are_case_sensitive() {
        let t = GradeTable::from_records(
            vec![
                Record::new("Ana", 8.0, "final"),
                Record::new("Luis", 6.0, "Final"),
            ],
            ColumnNames::default(),
        );
        assert_eq!(t.exam_types.len(), 2);
    }

    #[test]
    fn fields_resolve_by_configured_name() {
        let t = table();
        assert_eq!(t.field("Nota"), Some(RecordField::Score));
        assert_eq!(t.field("Alumno"), Some(RecordField::Student));
        assert_eq!(t.field("Tipo_Examen"), Some(RecordField::ExamType));
        assert_eq!(t.field("nota"), None);
    }

    #[test]
    fn stat_fields_resolve() {
        let cols = ColumnNames::default();
        assert_eq!(StatField::resolve("mean", &cols), Some(StatField::Mean));
        assert_eq!(
            StatField::resolve("Tipo_Examen", &cols),
            Some(StatField::ExamType)
        );
        assert_eq!(StatField::resolve("Nota", &cols), None);
    }

    #[test]
    fn missing_std_is_null_and_nan() {
        let stat = GroupStatistic {
            exam_type: "Final".to_string(),
            count: 1,
            mean: 9.0,
            median: 9.0,
            std: None,
        };
        assert_eq!(StatField::Std.value(&stat), Value::Null);
        assert_eq!(stat.to_string(), "Final: mean=9.00 median=9.00 std=NaN");
    }
}
