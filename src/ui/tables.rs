use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::ColumnDef;
use crate::data::model::{GradeTable, GroupStatistic, StatField};
use crate::error::RenderConfigError;

// ---------------------------------------------------------------------------
// Grid description
// ---------------------------------------------------------------------------
//
// Sorting, header filters and paging are done in the browser by the grid
// widget; these specs only carry columns, rows and switches.

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridColumn {
    pub title: String,
    pub field: String,
    /// Text shown in place of `null` cells.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub null_text: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSpec {
    pub columns: Vec<GridColumn>,
    pub data: Vec<Map<String, Value>>,
    /// Rows per page; `None` shows every row.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<usize>,
    pub sortable: bool,
    pub filterable: bool,
}

impl TableSpec {
    pub fn row_count(&self) -> usize {
        self.data.len()
    }
}

/// Raw records, paginated, sortable and filterable.
pub fn records_table(
    table: &GradeTable,
    columns: &[ColumnDef],
    page_size: usize,
) -> Result<TableSpec, RenderConfigError> {
    let fields = columns
        .iter()
        .map(|c| {
            table
                .field(&c.id)
                .map(|f| (c.id.as_str(), f))
                .ok_or_else(|| unknown("data table column", &c.id))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let data = table
        .records
        .iter()
        .map(|rec| {
            fields
                .iter()
                .map(|(id, f)| (id.to_string(), f.value(rec)))
                .collect()
        })
        .collect();

    Ok(TableSpec {
        columns: columns.iter().map(|c| grid_column(c, None)).collect(),
        data,
        page_size: Some(page_size.max(1)),
        sortable: true,
        filterable: true,
    })
}

/// One row per exam type, sortable and filterable but never paged.
/// Undefined standard deviations render as `NaN`.
pub fn statistics_table(
    table: &GradeTable,
    stats: &[GroupStatistic],
    columns: &[ColumnDef],
) -> Result<TableSpec, RenderConfigError> {
    let fields = columns
        .iter()
        .map(|c| {
            StatField::resolve(&c.id, &table.columns)
                .map(|f| (c.id.as_str(), f))
                .ok_or_else(|| unknown("statistics table column", &c.id))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let data = stats
        .iter()
        .map(|stat| {
            fields
                .iter()
                .map(|(id, f)| (id.to_string(), f.value(stat)))
                .collect()
        })
        .collect();

    let grid_columns = columns
        .iter()
        .zip(&fields)
        .map(|(c, (_, f))| grid_column(c, (*f != StatField::ExamType).then_some("NaN")))
        .collect();

    Ok(TableSpec {
        columns: grid_columns,
        data,
        page_size: None,
        sortable: true,
        filterable: true,
    })
}

fn grid_column(c: &ColumnDef, null_text: Option<&'static str>) -> GridColumn {
    GridColumn {
        title: c.name.clone(),
        field: c.id.clone(),
        null_text,
    }
}

fn unknown(context: &str, field: &str) -> RenderConfigError {
    RenderConfigError::UnknownField {
        context: context.to_string(),
        field: field.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ColumnNames, DashboardConfig};
    use crate::data::model::Record;
    use crate::data::stats::aggregate;

    fn table() -> GradeTable {
        let mut records = Vec::new();
        for i in 0..23 {
            let kind = if i % 3 == 0 { "Final" } else { "Parcial" };
            records.push(Record::new(&format!("S{i}"), (i % 10) as f64, kind));
        }
        records.push(Record::new("Solo", 4.0, "Recuperatorio"));
        GradeTable::from_records(records, ColumnNames::default())
    }

    #[test]
    fn records_table_has_one_row_per_record() {
        let t = table();
        let config = DashboardConfig::default();
        let spec = records_table(&t, &config.data_columns(), config.page_size).unwrap();

        assert_eq!(spec.row_count(), t.len());
        assert_eq!(spec.page_size, Some(10));
        assert!(spec.sortable && spec.filterable);
        assert_eq!(spec.data[0]["Alumno"], "S0");
        assert_eq!(spec.data[0]["Tipo_Examen"], "Final");
        assert_eq!(spec.columns[2].title, "Tipo Examen");
    }

    #[test]
    fn statistics_table_row_count_is_exam_type_count() {
        let t = table();
        let config = DashboardConfig::default();
        let spec = statistics_table(&t, &aggregate(&t), &config.statistics_columns()).unwrap();

        assert_eq!(spec.row_count(), 3);
        assert_eq!(spec.page_size, None);
        assert!(spec.sortable && spec.filterable);

        let solo = &spec.data[2];
        assert_eq!(solo["Tipo_Examen"], "Recuperatorio");
        assert_eq!(solo["std"], Value::Null);
        assert_eq!(spec.columns[3].null_text, Some("NaN"));
        assert_eq!(spec.columns[0].null_text, None);
    }

    #[test]
    fn unknown_column_id() {
        let t = table();
        let columns = vec![ColumnDef::new("Curso", "Curso")];
        let err = records_table(&t, &columns, 10).unwrap_err();
        assert!(matches!(err, RenderConfigError::UnknownField { ref field, .. } if field == "Curso"));

        let columns = vec![ColumnDef::new("Varianza", "var")];
        assert!(statistics_table(&t, &aggregate(&t), &columns).is_err());
    }
}
