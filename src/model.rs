use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::error::Error;
use crate::sheet::{MISSING, Table, Workbook};

pub const GENERAL_INFO_SHEET: &str = "general_info";
pub const OUTLINE_SHEET: &str = "outline";
pub const FIGURE_MAP_SHEET: &str = "figure_map";
pub const MATERIALS_SHEET: &str = "methodological_materials";
pub const PUBLICATIONS_SHEET: &str = "other_publications";

/// Serializes `None` as the literal `"None"` the templates test against.
pub(crate) fn or_none<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    match value {
        Some(v) => v.serialize(serializer),
        None => serializer.serialize_str(MISSING),
    }
}

/// Layout classification of an outline row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Macro {
    Section,
    SinglePanel,
    BiPanel,
    TriPanel,
    QuadPanel,
    PentaPanel,
    HexPanel,
    Other(String),
}

impl Macro {
    pub fn parse(value: &str) -> Macro {
        match value.trim() {
            "section" => Macro::Section,
            "singlepanel" => Macro::SinglePanel,
            "bipanel" => Macro::BiPanel,
            "tripanel" => Macro::TriPanel,
            "quadpanel" => Macro::QuadPanel,
            "pentapanel" => Macro::PentaPanel,
            "hexpanel" => Macro::HexPanel,
            other => Macro::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Macro::Section => "section",
            Macro::SinglePanel => "singlepanel",
            Macro::BiPanel => "bipanel",
            Macro::TriPanel => "tripanel",
            Macro::QuadPanel => "quadpanel",
            Macro::PentaPanel => "pentapanel",
            Macro::HexPanel => "hexpanel",
            Macro::Other(s) => s,
        }
    }

    pub fn panel_count(&self) -> Option<u8> {
        match self {
            Macro::SinglePanel => Some(1),
            Macro::BiPanel => Some(2),
            Macro::TriPanel => Some(3),
            Macro::QuadPanel => Some(4),
            Macro::PentaPanel => Some(5),
            Macro::HexPanel => Some(6),
            Macro::Section | Macro::Other(_) => None,
        }
    }
}

impl Serialize for Macro {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct OutlineRow {
    pub id: String,
    #[serde(serialize_with = "or_none")]
    pub page: Option<i64>,
    #[serde(rename = "evenPage")]
    pub even_page: bool,
    #[serde(serialize_with = "or_none")]
    pub section_header: Option<String>,
    #[serde(serialize_with = "or_none")]
    pub subsection_header: Option<String>,
    pub has_subsection: bool,
    pub section_page: bool,
    pub toc: bool,
    pub thematic_findings: bool,
    #[serde(rename = "macro", serialize_with = "or_none")]
    pub layout: Option<Macro>,
    #[serde(serialize_with = "or_none")]
    pub charts: Option<String>,
    #[serde(serialize_with = "or_none")]
    pub legend: Option<String>,
}

impl OutlineRow {
    pub fn from_table(table: &Table) -> Result<Vec<OutlineRow>, Error> {
        let id = table.column("id")?;
        let page = table.column("page")?;
        let section_header = table.column("section_header")?;
        let subsection_header = table.column("subsection_header")?;
        let has_subsection = table.column("has_subsection")?;
        let section_page = table.column("section_page")?;
        let toc = table.column("toc")?;
        let thematic_findings = table.column("thematic_findings")?;
        let layout = table.column("macro")?;
        let charts = table.column("charts")?;
        let legend = table.column("legend")?;

        table
            .rows()
            .map(|row| {
                let page = row.integer(page)?;
                Ok(OutlineRow {
                    id: row.required_text(id)?,
                    page,
                    even_page: is_even_page(page),
                    section_header: row.text(section_header),
                    subsection_header: row.text(subsection_header),
                    has_subsection: row.flag(has_subsection),
                    section_page: row.flag(section_page),
                    toc: row.flag(toc),
                    thematic_findings: row.flag(thematic_findings),
                    layout: row.text(layout).map(|m| Macro::parse(&m)),
                    charts: row.text(charts),
                    legend: row.text(legend),
                })
            })
            .collect()
    }

    pub fn section_header(&self) -> &str {
        self.section_header.as_deref().unwrap_or(MISSING)
    }
}

/// Left/right page flag; a row without a page number is never even.
pub fn is_even_page(page: Option<i64>) -> bool {
    page.is_some_and(|p| p.rem_euclid(2) == 0)
}

#[derive(Clone, Debug, Serialize)]
pub struct FigureMapRow {
    pub id: String,
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
    #[serde(serialize_with = "or_none")]
    pub panel: Option<String>,
    #[serde(serialize_with = "or_none")]
    pub panel_title: Option<String>,
    #[serde(serialize_with = "or_none")]
    pub panel_subtitle: Option<String>,
}

impl FigureMapRow {
    pub fn from_table(table: &Table) -> Result<Vec<FigureMapRow>, Error> {
        let id = table.column("id")?;
        let chart_title = table.column("chart_title")?;
        let chart_subtitle = table.column("chart_subtitle")?;
        let chart_insight = table.column("chart_insight")?;
        let footnote = table.column("footnote")?;
        let source = table.column("source")?;
        let legend_text = table.column("legend_text")?;
        let legend_color = table.column("legend_color")?;
        let panel = table.column("panel")?;
        let panel_title = table.column("panel_title")?;
        let panel_subtitle = table.column("panel_subtitle")?;

        table
            .rows()
            .map(|row| {
                Ok(FigureMapRow {
                    id: row.required_text(id)?,
                    chart_title: row.text(chart_title),
                    chart_subtitle: row.text(chart_subtitle),
                    chart_insight: row.text(chart_insight),
                    footnote: row.text(footnote),
                    source: row.text(source),
                    legend_text: row.text(legend_text),
                    legend_color: row.text(legend_color),
                    panel: row.text(panel),
                    panel_title: row.text(panel_title),
                    panel_subtitle: row.text(panel_subtitle),
                })
            })
            .collect()
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct MethodologicalMaterial {
    #[serde(serialize_with = "or_none")]
    pub material_name: Option<String>,
    #[serde(serialize_with = "or_none")]
    pub description: Option<String>,
    #[serde(serialize_with = "or_none")]
    pub link1: Option<String>,
    #[serde(serialize_with = "or_none")]
    pub label1: Option<String>,
}

impl MethodologicalMaterial {
    pub fn from_table(table: &Table) -> Result<Vec<MethodologicalMaterial>, Error> {
        let material_name = table.column("material_name")?;
        let description = table.column("description")?;
        let link1 = table.column("link1")?;
        let label1 = table.column("label1")?;
        Ok(table
            .rows()
            .map(|row| MethodologicalMaterial {
                material_name: row.text(material_name),
                description: row.text(description),
                link1: row.text(link1),
                label1: row.text(label1),
            })
            .collect())
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Publication {
    #[serde(rename = "onClick", serialize_with = "or_none")]
    pub on_click: Option<String>,
    #[serde(serialize_with = "or_none")]
    pub img: Option<String>,
    #[serde(serialize_with = "or_none")]
    pub href: Option<String>,
    #[serde(serialize_with = "or_none")]
    pub text: Option<String>,
}

impl Publication {
    pub fn from_table(table: &Table) -> Result<Vec<Publication>, Error> {
        let on_click = table.column("onClick")?;
        let img = table.column("img")?;
        let href = table.column("href")?;
        let text = table.column("text")?;
        Ok(table
            .rows()
            .map(|row| Publication {
                on_click: row.text(on_click),
                img: row.text(img),
                href: row.text(href),
                text: row.text(text),
            })
            .collect())
    }
}

/// Free-form report metadata (`id` → `value`).
pub fn general_info(table: &Table) -> Result<IndexMap<String, String>, Error> {
    table.column("value")?;
    Ok(table
        .to_dict("id")?
        .into_iter()
        .map(|(id, mut record)| {
            let value = record
                .shift_remove("value")
                .unwrap_or_else(|| MISSING.to_string());
            (id, value)
        })
        .collect())
}

/// Every table the report reads, validated and typed.
#[derive(Clone, Debug)]
pub struct ReportTables {
    pub general: IndexMap<String, String>,
    pub outline: Vec<OutlineRow>,
    pub figure_map: Vec<FigureMapRow>,
    pub materials: Vec<MethodologicalMaterial>,
    pub publications: Vec<Publication>,
}

impl ReportTables {
    pub fn from_workbook(workbook: &mut Workbook) -> Result<Self, Error> {
        let general = general_info(&workbook.table(GENERAL_INFO_SHEET)?)?;
        let outline = OutlineRow::from_table(&workbook.table(OUTLINE_SHEET)?)?;
        let figure_map = FigureMapRow::from_table(&workbook.table(FIGURE_MAP_SHEET)?)?;
        let materials = MethodologicalMaterial::from_table(&workbook.table(MATERIALS_SHEET)?)?;
        let publications = Publication::from_table(&workbook.table(PUBLICATIONS_SHEET)?)?;

        log::debug!(
            "Loaded {} outline rows, {} figure map rows, {} materials, {} publications",
            outline.len(),
            figure_map.len(),
            materials.len(),
            publications.len(),
        );

        Ok(Self {
            general,
            outline,
            figure_map,
            materials,
            publications,
        })
    }
}
