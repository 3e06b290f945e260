use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use serde::Serialize;

use super::{Legend, outline_row};
use crate::error::Error;
use crate::model::{FigureMapRow, OutlineRow, or_none};
use crate::sheet::{MISSING, index_by_key};

/// Directory the chart panel images are served from.
pub const CHART_ROOT: &str = "static/charts_and_images";

static SECTION_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new("Section.+: ").unwrap());

#[derive(Clone, Debug, Serialize)]
pub struct PanelData {
    #[serde(serialize_with = "or_none")]
    pub panel_title: Option<String>,
    #[serde(serialize_with = "or_none")]
    pub panel_subtitle: Option<String>,
    #[serde(serialize_with = "or_none")]
    pub legend_text: Option<String>,
    #[serde(serialize_with = "or_none")]
    pub legend_color: Option<String>,
    #[serde(rename = "imgPath")]
    pub img_path: String,
    pub legend: Legend,
}

#[derive(Clone, Debug, Serialize)]
pub struct ChartData {
    #[serde(serialize_with = "or_none")]
    pub chart_title: Option<String>,
    #[serde(serialize_with = "or_none")]
    pub chart_subtitle: Option<String>,
    #[serde(serialize_with = "or_none")]
    pub chart_insight: Option<String>,
    #[serde(serialize_with = "or_none")]
    pub footnote: Option<String>,
    #[serde(serialize_with = "or_none")]
    pub source: Option<String>,
    #[serde(serialize_with = "or_none")]
    pub legend_text: Option<String>,
    #[serde(serialize_with = "or_none")]
    pub legend_color: Option<String>,
    pub legend: Legend,
    #[serde(rename = "ChartNo")]
    pub chart_no: String,
    pub panels: IndexMap<String, PanelData>,
}

#[derive(Clone, Debug, Serialize)]
pub struct PageData {
    pub id: String,
    #[serde(serialize_with = "or_none")]
    pub page: Option<i64>,
    #[serde(rename = "evenPage")]
    pub even_page: bool,
    pub section_header: String,
    #[serde(serialize_with = "or_none")]
    pub subsection_header: Option<String>,
    pub charts: IndexMap<String, ChartData>,
    pub has_subsection: bool,
    #[serde(serialize_with = "or_none")]
    pub legend: Option<String>,
}

/// `"Section 2: Access to Justice"` → `"Access to Justice"`.
pub fn strip_section_number(header: &str) -> String {
    SECTION_NUMBER.replace_all(header, "").into_owned()
}

/// `"Figure_2_1"` → `"Chart 2.1"`.
pub fn chart_number(chart: &str) -> String {
    chart.replace("Figure_", "Chart ").replace('_', ".")
}

fn panel_data(chart: &str, row: &FigureMapRow) -> PanelData {
    let panel = row.panel.as_deref().unwrap_or(MISSING);
    PanelData {
        panel_title: row.panel_title.clone(),
        panel_subtitle: row.panel_subtitle.clone(),
        legend_text: row.legend_text.clone(),
        legend_color: row.legend_color.clone(),
        img_path: format!("{CHART_ROOT}/{chart}/{chart}_{panel}.svg"),
        legend: Legend::build(row.legend_text.as_deref(), row.legend_color.as_deref()),
    }
}

fn chart_data(chart: &str, row: &FigureMapRow, figure_map: &[FigureMapRow]) -> ChartData {
    let panels = index_by_key(
        figure_map
            .iter()
            .filter(|r| r.id == chart)
            .map(|r| (r.panel.clone(), panel_data(chart, r))),
        "panel",
        |(panel, _)| panel.clone().unwrap_or_else(|| MISSING.to_string()),
    )
    .into_iter()
    .map(|(key, (_, data))| (key, data))
    .collect();

    ChartData {
        chart_title: row.chart_title.clone(),
        chart_subtitle: row.chart_subtitle.clone(),
        chart_insight: row.chart_insight.clone(),
        footnote: row.footnote.clone(),
        source: row.source.clone(),
        legend_text: row.legend_text.clone(),
        legend_color: row.legend_color.clone(),
        legend: Legend::build(row.legend_text.as_deref(), row.legend_color.as_deref()),
        chart_no: chart_number(chart),
        panels,
    }
}

/// Page record with its charts and their panels.
pub fn page_data(
    page_id: &str,
    outline: &[OutlineRow],
    figure_map: &[FigureMapRow],
) -> Result<PageData, Error> {
    let row = outline_row(outline, page_id)?;

    let covered: Vec<&str> = row
        .charts
        .as_deref()
        .map(|charts| charts.split(", ").collect())
        .unwrap_or_default();

    // one row per chart title, then one chart per figure-group id
    let mut seen_titles: Vec<Option<String>> = Vec::new();
    let chart_rows = figure_map
        .iter()
        .filter(|r| covered.contains(&r.id.as_str()))
        .filter(|r| {
            if seen_titles.contains(&r.chart_title) {
                false
            } else {
                seen_titles.push(r.chart_title.clone());
                true
            }
        });
    let charts = index_by_key(chart_rows, "id", |r| r.id.clone())
        .into_iter()
        .map(|(chart, r)| {
            let data = chart_data(&chart, r, figure_map);
            (chart, data)
        })
        .collect();

    Ok(PageData {
        id: page_id.to_string(),
        page: row.page,
        even_page: row.even_page,
        section_header: strip_section_number(row.section_header()),
        subsection_header: row.subsection_header.clone(),
        charts,
        has_subsection: row.has_subsection,
        legend: row.legend.clone(),
    })
}
