//! Dashboard configuration.
//!
//! Every field has a default matching the stock `notas_1u.csv` layout, so an
//! optional JSON file only needs to carry the keys it changes.

use std::collections::BTreeMap;
use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Header names of the three input columns.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ColumnNames {
    pub student: String,
    pub score: String,
    pub exam_type: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            student: "Alumno".to_string(),
            score: "Nota".to_string(),
            exam_type: "Tipo_Examen".to_string(),
        }
    }
}

/// One visible grid column: `name` is the header text, `id` the bound field.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    pub id: String,
}

impl ColumnDef {
    pub fn new(name: &str, id: &str) -> Self {
        Self {
            name: name.to_string(),
            id: id.to_string(),
        }
    }
}

/// Title and optional field bindings of a single chart.
///
/// Unset bindings follow the configured [`ColumnNames`], so renaming the
/// input columns is enough to move every chart along with them.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChartConfig {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl ChartConfig {
    fn titled(title: &str) -> Self {
        Self {
            title: title.to_string(),
            x: None,
            y: None,
            color: None,
        }
    }

    fn bind(&self, x: &str, y: Option<&str>, color: &str) -> ChartBinding {
        ChartBinding {
            title: self.title.clone(),
            x: self.x.clone().unwrap_or_else(|| x.to_string()),
            y: self.y.clone().or_else(|| y.map(str::to_string)),
            color: self.color.clone().unwrap_or_else(|| color.to_string()),
        }
    }
}

/// A chart's bindings with defaults filled in from the column names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartBinding {
    pub title: String,
    pub x: String,
    pub y: Option<String>,
    pub color: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Headings {
    pub data: String,
    pub charts: String,
    pub statistics: String,
}

impl Default for Headings {
    fn default() -> Self {
        Self {
            data: "Tabla de datos".to_string(),
            charts: "Visualizaciones".to_string(),
            statistics: "Estadísticas por Tipo de Examen".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    /// Field separator for delimited input (`.tsv` files always use tab).
    pub delimiter: char,
    pub columns: ColumnNames,
    pub title: String,
    pub headings: Headings,
    /// Axis / legend titles keyed by field name.
    pub labels: BTreeMap<String, String>,
    pub histogram: ChartConfig,
    pub boxplot: ChartConfig,
    pub bar: ChartConfig,
    pub histogram_opacity: f64,
    pub graph_height_px: u32,
    /// Rows per page in the raw records grid.
    pub page_size: usize,
    /// Empty means the three input columns.
    pub data_table: Vec<ColumnDef>,
    /// Empty means exam type, mean, median and std.
    pub statistics_table: Vec<ColumnDef>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            columns: ColumnNames::default(),
            title: "Notas de alumnos Primera Unidad".to_string(),
            headings: Headings::default(),
            labels: BTreeMap::from([("mean".to_string(), "Promedio".to_string())]),
            histogram: ChartConfig::titled("Distribución de Notas"),
            boxplot: ChartConfig::titled("Comparación de Notas por Tipo de Examen"),
            bar: ChartConfig::titled("Promedio de Notas por Tipo de Examen"),
            histogram_opacity: 0.7,
            graph_height_px: 500,
            page_size: 10,
            data_table: Vec::new(),
            statistics_table: Vec::new(),
        }
    }
}

impl DashboardConfig {
    /// Loads configuration from a JSON file; absent keys keep their defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let buf = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let config: DashboardConfig = serde_json::from_slice(&buf)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Display label for a field. Explicit `labels` win, then the stock
    /// titles of the score and exam type columns, then the field name.
    pub fn label<'a>(&'a self, field: &'a str) -> &'a str {
        if let Some(label) = self.labels.get(field) {
            return label;
        }
        if field == self.columns.score {
            "Calificación"
        } else if field == self.columns.exam_type {
            "Tipo de Examen"
        } else {
            field
        }
    }

    /// Score distribution, coloured by exam type.
    pub fn histogram_binding(&self) -> ChartBinding {
        let c = &self.columns;
        self.histogram.bind(&c.score, None, &c.exam_type)
    }

    /// Scores per exam type.
    pub fn boxplot_binding(&self) -> ChartBinding {
        let c = &self.columns;
        self.boxplot.bind(&c.exam_type, Some(&c.score), &c.exam_type)
    }

    /// Mean score per exam type.
    pub fn bar_binding(&self) -> ChartBinding {
        let c = &self.columns;
        self.bar.bind(&c.exam_type, Some("mean"), &c.exam_type)
    }

    pub fn data_columns(&self) -> Vec<ColumnDef> {
        if !self.data_table.is_empty() {
            return self.data_table.clone();
        }
        let c = &self.columns;
        vec![
            ColumnDef::new("Alumno", &c.student),
            ColumnDef::new("Nota", &c.score),
            ColumnDef::new("Tipo Examen", &c.exam_type),
        ]
    }

    pub fn statistics_columns(&self) -> Vec<ColumnDef> {
        if !self.statistics_table.is_empty() {
            return self.statistics_table.clone();
        }
        vec![
            ColumnDef::new("Tipo de Examen", &self.columns.exam_type),
            ColumnDef::new("Media", "mean"),
            ColumnDef::new("Mediana", "median"),
            ColumnDef::new("Desviación Estándar", "std"),
        ]
    }

    /// The delimiter as the single byte the CSV reader expects.
    pub fn delimiter_byte(&self) -> Result<u8> {
        u8::try_from(u32::from(self.delimiter))
            .ok()
            .filter(u8::is_ascii)
            .with_context(|| format!("delimiter '{}' is not a single ASCII byte", self.delimiter))
    }
}
