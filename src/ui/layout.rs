use serde::Serialize;

use super::charts::{ChartSet, ChartSpec};
use super::tables::TableSpec;
use crate::config::DashboardConfig;
use crate::error::RenderConfigError;

/// Served by the app under this path; loaded by every page.
pub const DASHBOARD_JS_PATH: &str = "/assets/dashboard.js";

const PLOTLY_JS: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";
const TABULATOR_JS: &str = "https://unpkg.com/tabulator-tables@6.3.0/dist/js/tabulator.min.js";
const TABULATOR_CSS: &str = "https://unpkg.com/tabulator-tables@6.3.0/dist/css/tabulator.min.css";

// ---------------------------------------------------------------------------
// Page tree
// ---------------------------------------------------------------------------

/// A static page description, rendered once to HTML.
#[derive(Debug, Clone)]
pub enum Node {
    Heading {
        level: u8,
        text: String,
    },
    Section {
        style: Option<String>,
        children: Vec<Node>,
    },
    Table {
        id: String,
        spec: TableSpec,
    },
    Graph {
        id: String,
        spec: ChartSpec,
        height_px: u32,
    },
}

impl Node {
    fn heading(level: u8, text: &str) -> Self {
        Node::Heading {
            level,
            text: text.to_string(),
        }
    }

    fn section(style: Option<&str>, children: Vec<Node>) -> Self {
        Node::Section {
            style: style.map(str::to_string),
            children,
        }
    }
}

/// Title, raw data grid, the three charts, then the statistics grid.
pub fn compose(
    config: &DashboardConfig,
    records: &TableSpec,
    statistics: &TableSpec,
    charts: &ChartSet,
) -> Node {
    let graphs = charts
        .iter()
        .map(|(id, spec)| {
            Node::section(
                Some("margin: 20px 0px"),
                vec![Node::Graph {
                    id: id.to_string(),
                    spec: spec.clone(),
                    height_px: config.graph_height_px,
                }],
            )
        })
        .collect::<Vec<_>>();

    let mut charts_section = vec![Node::heading(2, &config.headings.charts)];
    charts_section.extend(graphs);

    Node::section(
        None,
        vec![
            Node::heading(1, &config.title),
            Node::section(
                Some("margin: 30px 30px"),
                vec![
                    Node::heading(2, &config.headings.data),
                    Node::Table {
                        id: "records".to_string(),
                        spec: records.clone(),
                    },
                ],
            ),
            Node::section(None, charts_section),
            Node::section(
                None,
                vec![
                    Node::heading(2, &config.headings.statistics),
                    Node::Table {
                        id: "statistics".to_string(),
                        spec: statistics.clone(),
                    },
                ],
            ),
        ],
    )
}

// ---------------------------------------------------------------------------
// HTML rendering
// ---------------------------------------------------------------------------

/// Render a full HTML document around `root`.
pub fn render_page(title: &str, root: &Node) -> Result<String, RenderConfigError> {
    let mut html = String::with_capacity(64 * 1024);

    html.push_str("<!DOCTYPE html>\n<html lang=\"es\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\"/>\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\"/>\n");
    html.push_str(&format!("<title>{}</title>\n", escape_html(title)));
    html.push_str(&format!("<link rel=\"stylesheet\" href=\"{TABULATOR_CSS}\"/>\n"));
    html.push_str("<style>\n");
    html.push_str("body{font-family:Arial,sans-serif;margin:20px;color:#222;}\n");
    html.push_str(".tabulator .tabulator-header .tabulator-col{background:rgb(230,230,230);color:#333333;font-weight:bold;}\n");
    html.push_str(".tabulator-cell{text-align:left;padding:12px;white-space:normal;line-height:15px;}\n");
    html.push_str(".data-table{overflow-x:auto;}\n");
    html.push_str("</style>\n");
    html.push_str(&format!("<script src=\"{PLOTLY_JS}\"></script>\n"));
    html.push_str(&format!("<script src=\"{TABULATOR_JS}\"></script>\n"));
    html.push_str("</head>\n<body>\n");

    render_node(&mut html, root)?;

    html.push_str(&format!("<script src=\"{DASHBOARD_JS_PATH}\"></script>\n"));
    html.push_str("</body>\n</html>\n");
    Ok(html)
}

fn render_node(out: &mut String, node: &Node) -> Result<(), RenderConfigError> {
    match node {
        Node::Heading { level, text } => {
            let level = (*level).clamp(1, 6);
            out.push_str(&format!("<h{level}>{}</h{level}>\n", escape_html(text)));
        }
        Node::Section { style, children } => {
            match style {
                Some(s) => out.push_str(&format!("<div style=\"{}\">\n", escape_html(s))),
                None => out.push_str("<div>\n"),
            }
            for child in children {
                render_node(out, child)?;
            }
            out.push_str("</div>\n");
        }
        Node::Table { id, spec } => {
            let id = escape_html(id);
            out.push_str(&format!("<div class=\"data-table\" id=\"{id}\"></div>\n"));
            embed_json(out, "table", &id, spec)?;
        }
        Node::Graph {
            id,
            spec,
            height_px,
        } => {
            let id = escape_html(id);
            out.push_str(&format!(
                "<div class=\"graph\" id=\"{id}\" style=\"height: {height_px}px\"></div>\n"
            ));
            embed_json(out, "graph", &id, spec)?;
        }
    }
    Ok(())
}

/// `<script type="application/json" data-{kind}-for="{id}">…</script>`
fn embed_json<T: Serialize>(
    out: &mut String,
    kind: &str,
    id: &str,
    value: &T,
) -> Result<(), RenderConfigError> {
    let json = serde_json::to_string(value).map_err(|source| RenderConfigError::Serialize {
        context: format!("{kind} '{id}'"),
        source,
    })?;
    out.push_str(&format!(
        "<script type=\"application/json\" data-{kind}-for=\"{id}\">{}</script>\n",
        escape_script(&json)
    ));
    Ok(())
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Keep JSON inert inside `<script>`: markup characters only occur inside
/// JSON strings, where `\u00XX` escapes decode back to the same text.
fn escape_script(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            _ => out.push(c),
        }
    }
    out
}
