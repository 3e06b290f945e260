mod pretty;

use std::path::Path;

use indexmap::IndexMap;
use serde::Serialize;
use tera::Tera;

use crate::compose::{DynamicData, ThematicPage};
use crate::error::Error;
use crate::model::{FigureMapRow, OutlineRow};

pub use pretty::prettify;

pub const TEMPLATE_NAME: &str = "index.html";

const DEFAULT_TEMPLATE: &str = include_str!("../../templates/index.html");

/// Values handed to the template.
#[derive(Serialize)]
pub struct ReportView<'a> {
    pub dynamic_data: &'a DynamicData,
    pub outline: &'a [OutlineRow],
    pub figure_map: &'a [FigureMapRow],
    pub thematic_findings: &'a IndexMap<String, String>,
    pub thematic_pages: &'a [ThematicPage],
}

pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    /// Compiles `template`, or the built-in report template when `None`.
    pub fn new(template: Option<&Path>) -> Result<Self, Error> {
        let source = match template {
            Some(path) => crate::text::read_text(path)?,
            None => DEFAULT_TEMPLATE.to_string(),
        };
        Self::from_source(&source)
    }

    pub fn from_source(source: &str) -> Result<Self, Error> {
        let mut tera = Tera::default();
        tera.add_raw_template(TEMPLATE_NAME, source)?;
        Ok(Self { tera })
    }

    /// Renders the view and normalises the markup with 4-space indentation.
    pub fn render(&self, view: &ReportView) -> Result<String, Error> {
        let context = tera::Context::from_serialize(view)?;
        let html = self.tera.render(TEMPLATE_NAME, &context)?;
        Ok(prettify(&html))
    }
}
