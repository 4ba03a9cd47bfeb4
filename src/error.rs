use thiserror::Error;

// ---------------------------------------------------------------------------
// Startup error taxonomy
// ---------------------------------------------------------------------------

/// The input file could not be turned into a [`GradeTable`].
///
/// [`GradeTable`]: crate::data::model::GradeTable
#[derive(Debug, Error)]
pub enum DataFormatError {
    #[error("reading {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing CSV")]
    Csv(#[from] csv::Error),

    #[error("parsing JSON")]
    Json(#[from] serde_json::Error),

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("row {row}: score '{value}' is not a number")]
    InvalidScore { row: usize, value: String },

    #[error("row {row}: {reason}")]
    InvalidRecord { row: usize, reason: String },
}

/// A chart or table definition does not match the loaded data.
#[derive(Debug, Error)]
pub enum RenderConfigError {
    #[error("{context} references unknown field '{field}'")]
    UnknownField { context: String, field: String },

    #[error("serializing {context}")]
    Serialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Anything that can stop [`initialize`](crate::state::initialize).
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Data(#[from] DataFormatError),

    #[error(transparent)]
    Render(#[from] RenderConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_value() {
        let err = DataFormatError::InvalidScore {
            row: 3,
            value: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "row 3: score 'abc' is not a number");

        let err = RenderConfigError::UnknownField {
            context: "histogram x".to_string(),
            field: "Puntaje".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "histogram x references unknown field 'Puntaje'"
        );
    }

    #[test]
    fn dashboard_error_is_transparent() {
        let err: DashboardError = DataFormatError::MissingColumn("Nota".into()).into();
        assert_eq!(err.to_string(), "missing required column 'Nota'");
    }
}
