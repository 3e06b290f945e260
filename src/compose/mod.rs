mod dynamic;
mod page;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::error::Error;
use crate::model::{FigureMapRow, Macro, OutlineRow};
use crate::sheet::MISSING;

pub use dynamic::{
    AboutReport, Acknowledgements, DynamicData, ExecFinding, MarkdownPage, MaterialsColumns,
    OtherPublications, PageStub, SectionStub, TextAssets, TocEntry,
};
pub use page::{CHART_ROOT, ChartData, PageData, PanelData, chart_number, page_data, strip_section_number};

/// The single outline row with the given id.
pub fn outline_row<'a>(outline: &'a [OutlineRow], id: &str) -> Result<&'a OutlineRow, Error> {
    let mut matches = outline.iter().filter(|row| row.id == id);
    match (matches.next(), matches.count()) {
        (Some(row), 0) => Ok(row),
        (first, rest) => Err(Error::Lookup {
            field: "id",
            value: id.to_string(),
            matches: first.map_or(0, |_| rest + 1),
        }),
    }
}

/// First outline row matching `predicate`; `field`/`value` only describe the filter.
pub fn first_row<'a>(
    outline: &'a [OutlineRow],
    field: &'static str,
    value: &str,
    predicate: impl Fn(&OutlineRow) -> bool,
) -> Result<&'a OutlineRow, Error> {
    outline
        .iter()
        .find(|row| predicate(row))
        .ok_or_else(|| Error::Lookup {
            field,
            value: value.to_string(),
            matches: 0,
        })
}

pub fn first_in_section<'a>(outline: &'a [OutlineRow], header: &str) -> Result<&'a OutlineRow, Error> {
    first_row(outline, "section_header", header, |row| {
        row.section_header.as_deref() == Some(header)
    })
}

pub fn first_in_subsection<'a>(
    outline: &'a [OutlineRow],
    header: &str,
) -> Result<&'a OutlineRow, Error> {
    first_row(outline, "subsection_header", header, |row| {
        row.subsection_header.as_deref() == Some(header)
    })
}

/// Colour per legend label, or the `"None"` sentinel when a chart has no legend.
#[derive(Clone, Debug, PartialEq)]
pub enum Legend {
    Entries(IndexMap<String, String>),
    Missing,
}

impl Legend {
    pub fn build(text: Option<&str>, color: Option<&str>) -> Legend {
        let Some(text) = text else {
            return Legend::Missing;
        };
        let labels: Vec<&str> = text.split(',').collect();
        let colors: Vec<&str> = color.map(|c| c.split(',').collect()).unwrap_or_default();
        if labels.len() != colors.len() {
            log::warn!(
                "Legend has {} labels but {} colors ({:?}); extra entries are dropped",
                labels.len(),
                colors.len(),
                text
            );
        }
        Legend::Entries(
            labels
                .into_iter()
                .zip(colors)
                .map(|(label, color)| (label.to_string(), color.to_string()))
                .collect(),
        )
    }
}

impl Serialize for Legend {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Legend::Entries(entries) => entries.serialize(serializer),
            Legend::Missing => serializer.serialize_str(MISSING),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct SectionData {
    pub id: String,
    pub header: String,
    pub toc: Vec<OutlineRow>,
}

/// Section page and table-of-contents slice for `header`.
pub fn section_data(header: &str, outline: &[OutlineRow]) -> Result<SectionData, Error> {
    let in_section = |row: &&OutlineRow| row.section_header.as_deref() == Some(header);
    let section_page = outline
        .iter()
        .filter(in_section)
        .find(|row| row.section_page)
        .ok_or_else(|| Error::Lookup {
            field: "section_header",
            value: header.to_string(),
            matches: 0,
        })?;

    Ok(SectionData {
        id: section_page.id.clone(),
        header: section_page.section_header().to_string(),
        toc: outline
            .iter()
            .filter(in_section)
            .filter(|row| row.has_subsection)
            .cloned()
            .collect(),
    })
}

#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum ThematicParameters {
    Section(SectionData),
    Page(PageData),
}

/// Dispatches on the row's macro: section pages vs. chart pages.
pub fn thematic_parameters(
    id: &str,
    outline: &[OutlineRow],
    figure_map: &[FigureMapRow],
) -> Result<ThematicParameters, Error> {
    let row = outline_row(outline, id)?;
    match &row.layout {
        Some(Macro::Section) => {
            log::debug!("{id}: section page");
            section_data(row.section_header(), outline).map(ThematicParameters::Section)
        }
        Some(layout) if layout.panel_count().is_some() => {
            log::debug!("{id}: {} chart page", layout.as_str());
            page_data(id, outline, figure_map).map(ThematicParameters::Page)
        }
        other => Err(Error::UnsupportedMacro {
            id: id.to_string(),
            value: other.as_ref().map(|m| m.as_str().to_string()),
        }),
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct ThematicPage {
    pub id: String,
    pub layout: String,
    pub parameters: ThematicParameters,
}

/// Parameters for every outline row flagged as a thematic finding, in outline order.
pub fn thematic_pages(
    outline: &[OutlineRow],
    figure_map: &[FigureMapRow],
) -> Result<Vec<ThematicPage>, Error> {
    outline
        .iter()
        .filter(|row| row.thematic_findings)
        .map(|row| {
            Ok(ThematicPage {
                id: row.id.clone(),
                layout: macro_name(row),
                parameters: thematic_parameters(&row.id, outline, figure_map)?,
            })
        })
        .collect()
}

/// `id` → macro for the thematic findings rows.
pub fn thematic_findings(outline: &[OutlineRow]) -> IndexMap<String, String> {
    outline
        .iter()
        .filter(|row| row.thematic_findings)
        .map(|row| (row.id.clone(), macro_name(row)))
        .collect()
}

fn macro_name(row: &OutlineRow) -> String {
    row.layout
        .as_ref()
        .map_or(MISSING, |m| m.as_str())
        .to_string()
}
