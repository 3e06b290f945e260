pub mod compose;
mod config;
mod error;
pub mod model;
mod render;
pub mod sheet;
pub mod text;

pub use config::ReportConfig;
pub use error::Error;
pub use render::{Renderer, ReportView, prettify};

use std::path::PathBuf;
use std::time::Instant;

use indexmap::IndexMap;

use compose::{DynamicData, TextAssets, ThematicPage};
use model::ReportTables;
use sheet::Workbook;

/// Everything needed to render the report, loaded once and read-only afterwards.
pub struct Report {
    tables: ReportTables,
    dynamic_data: DynamicData,
    thematic_findings: IndexMap<String, String>,
    thematic_pages: Vec<ThematicPage>,
    renderer: Renderer,
    output: PathBuf,
}

impl Report {
    pub fn load(config: &ReportConfig) -> Result<Self, Error> {
        let t0 = Instant::now();

        let tables = ReportTables::from_workbook(&mut Workbook::open(&config.workbook)?)?;
        let t_tables = t0.elapsed();

        let texts = TextAssets::load(&config.text_dir)?;
        let t_texts = t0.elapsed();

        let renderer = Renderer::new(config.template.as_deref())?;
        let report = Self::from_parts(tables, texts, renderer, config.output.clone())?;
        let t_total = t0.elapsed();

        log::info!(
            "Loaded report: workbook={:.1}ms, text={:.1}ms, compose={:.1}ms, total={:.1}ms ({} thematic pages)",
            t_tables.as_secs_f64() * 1000.0,
            (t_texts - t_tables).as_secs_f64() * 1000.0,
            (t_total - t_texts).as_secs_f64() * 1000.0,
            t_total.as_secs_f64() * 1000.0,
            report.thematic_pages.len(),
        );

        Ok(report)
    }

    pub fn from_parts(
        tables: ReportTables,
        texts: TextAssets,
        renderer: Renderer,
        output: PathBuf,
    ) -> Result<Self, Error> {
        let dynamic_data = DynamicData::build(&tables, texts)?;
        let thematic_findings = compose::thematic_findings(&tables.outline);
        let thematic_pages = compose::thematic_pages(&tables.outline, &tables.figure_map)?;
        Ok(Self {
            tables,
            dynamic_data,
            thematic_findings,
            thematic_pages,
            renderer,
            output,
        })
    }

    pub fn thematic_pages(&self) -> &[ThematicPage] {
        &self.thematic_pages
    }

    /// Renders the pretty-printed HTML page.
    pub fn render(&self) -> Result<String, Error> {
        let view = ReportView {
            dynamic_data: &self.dynamic_data,
            outline: &self.tables.outline,
            figure_map: &self.tables.figure_map,
            thematic_findings: &self.thematic_findings,
            thematic_pages: &self.thematic_pages,
        };
        self.renderer.render(&view)
    }

    /// Renders the page and overwrites the output file with it.
    pub fn publish(&self) -> Result<String, Error> {
        let t0 = Instant::now();
        let html = self.render()?;
        let t_render = t0.elapsed();

        std::fs::write(&self.output, &html).map_err(Error::Io)?;
        let t_total = t0.elapsed();

        log::info!(
            "Timing: render={:.1}ms, write={:.1}ms, total={:.1}ms (output {} bytes to {})",
            t_render.as_secs_f64() * 1000.0,
            (t_total - t_render).as_secs_f64() * 1000.0,
            t_total.as_secs_f64() * 1000.0,
            html.len(),
            self.output.display(),
        );

        Ok(html)
    }
}

pub fn build_report(config: &ReportConfig) -> Result<(), Error> {
    Report::load(config)?.publish().map(|_| ())
}
