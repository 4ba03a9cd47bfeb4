use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::header;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;

use crate::state::AppState;
use crate::ui::layout::DASHBOARD_JS_PATH;

const DASHBOARD_JS: &str = include_str!("../assets/dashboard.js");

// ---------------------------------------------------------------------------
// HTTP surface
// ---------------------------------------------------------------------------

/// `/` serves the pre-rendered page; everything else besides the bootstrap
/// script is a 404. Handlers only read the shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route(DASHBOARD_JS_PATH, get(dashboard_js))
        .with_state(state)
}

async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(state.page.clone())
}

async fn dashboard_js() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        DASHBOARD_JS,
    )
}

/// Serve until Ctrl-C.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    log::info!("Dashboard available at http://{}/", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving dashboard")?;

    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("Cannot listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown requested");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ColumnNames, DashboardConfig};
    use crate::data::model::{GradeTable, Record};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn state() -> Arc<AppState> {
        let table = GradeTable::from_records(
            vec![
                Record::new("Ana", 8.0, "Parcial"),
                Record::new("Luis", 6.0, "Parcial"),
                Record::new("Ana", 9.0, "Final"),
            ],
            ColumnNames::default(),
        );
        Arc::new(AppState::from_table(DashboardConfig::default(), table).unwrap())
    }

    async fn get(uri: &str) -> (StatusCode, String) {
        let response = router(state())
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn root_serves_the_rendered_page() {
        let (status, body) = get("/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, state().page);
    }

    #[tokio::test]
    async fn bootstrap_script_is_served() {
        let (status, body) = get(DASHBOARD_JS_PATH).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Plotly.newPlot"));
        assert!(body.contains("new Tabulator"));
    }

    #[tokio::test]
    async fn other_paths_are_not_found() {
        let (status, _) = get("/api/records").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
