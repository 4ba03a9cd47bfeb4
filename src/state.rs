use std::path::Path;

use crate::config::DashboardConfig;
use crate::data::loader::{LoadOptions, load_file};
use crate::data::model::{GradeTable, GroupStatistic};
use crate::data::stats::aggregate;
use crate::error::DashboardError;
use crate::ui::charts::{ChartSet, build_charts};
use crate::ui::layout::{compose, render_page};
use crate::ui::tables::{TableSpec, records_table, statistics_table};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Everything computed at startup. Never mutated afterwards.
#[derive(Debug)]
pub struct AppState {
    pub config: DashboardConfig,
    pub table: GradeTable,
    pub statistics: Vec<GroupStatistic>,
    pub charts: ChartSet,
    pub records_view: TableSpec,
    pub statistics_view: TableSpec,
    /// The rendered dashboard page.
    pub page: String,
}

/// Load, aggregate, build charts and render the page.
pub fn initialize(
    config: DashboardConfig,
    data_path: &Path,
    delimiter: u8,
) -> Result<AppState, DashboardError> {
    let options = LoadOptions {
        delimiter,
        columns: config.columns.clone(),
    };
    let table = load_file(data_path, &options)?;
    log::info!(
        "Loaded {} records with exam types {:?} from {}",
        table.len(),
        table.exam_types,
        data_path.display()
    );

    AppState::from_table(config, table)
}

impl AppState {
    /// Everything after loading: aggregation and rendering.
    pub fn from_table(config: DashboardConfig, table: GradeTable) -> Result<Self, DashboardError> {
        let statistics = aggregate(&table);
        for stat in &statistics {
            log::debug!("{stat}");
        }
        log::info!("Computed statistics for {} exam types", statistics.len());

        let charts = build_charts(&table, &statistics, &config)?;
        let records_view = records_table(&table, &config.data_columns(), config.page_size)?;
        let statistics_view = statistics_table(&table, &statistics, &config.statistics_columns())?;

        let root = compose(&config, &records_view, &statistics_view, &charts);
        let page = render_page(&config.title, &root)?;

        Ok(AppState {
            config,
            table,
            statistics,
            charts,
            records_view,
            statistics_view,
            page,
        })
    }
}
