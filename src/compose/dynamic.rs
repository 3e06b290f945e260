use std::path::Path;

use indexmap::IndexMap;
use serde::Serialize;

use super::{
    SectionData, first_in_section, first_in_subsection, outline_row, section_data,
};
use crate::config::{
    ABOUT_REPORT_FILE, ACKNOWLEDGEMENTS_FILE, EXEC_FINDINGS_FILE, METHODOLOGY_FILE,
    SAMPLE_DESCRIPTION_FILE,
};
use crate::error::Error;
use crate::model::{MethodologicalMaterial, OutlineRow, Publication, ReportTables, or_none};
use crate::sheet::{MISSING, index_by_key};
use crate::text::{self, MarkdownSection};

const ACKNOWLEDGEMENTS_ID: &str = "Acknowledgements";
const ABOUT_ID: &str = "AboutWJP";
const BACK_COVER_ID: &str = "BackCover";
const MATERIALS_ID: &str = "Materials";
const PUBLICATIONS_ID: &str = "Other Publications";
const METHODOLOGY_ID: &str = "Methodology1";
const SAMPLE_ID: &str = "Methodology2";

const ABOUT_REPORT_HEADER: &str = "About this Report";
const EXEC_FINDINGS_HEADER: &str = "Executive Findings";
const PROJECT_HEADER: &str = "Project Design";
const APPENDIX_HEADER: &str = "Appendix";

/// Text fragments the report embeds, already converted to HTML.
#[derive(Clone, Debug, Default)]
pub struct TextAssets {
    pub acknowledgements: String,
    pub about_report: String,
    pub executive_findings: Vec<Vec<String>>,
    pub methodology: Vec<MarkdownSection>,
    pub sample_description: Vec<MarkdownSection>,
}

impl TextAssets {
    pub fn load(text_dir: &Path) -> Result<Self, Error> {
        Ok(Self {
            acknowledgements: text::markdown_to_html(&text::load_markdown(
                &text_dir.join(ACKNOWLEDGEMENTS_FILE),
                false,
            )?),
            about_report: text::markdown_to_html(&text::load_markdown(
                &text_dir.join(ABOUT_REPORT_FILE),
                true,
            )?),
            executive_findings: text::extract_docx(&text_dir.join(EXEC_FINDINGS_FILE))?,
            methodology: text::markdown_sections(&text_dir.join(METHODOLOGY_FILE))?,
            sample_description: text::markdown_sections(&text_dir.join(SAMPLE_DESCRIPTION_FILE))?,
        })
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct TocEntry {
    #[serde(serialize_with = "or_none")]
    pub page: Option<i64>,
    #[serde(rename = "evenPage")]
    pub even_page: bool,
    #[serde(serialize_with = "or_none")]
    pub section_header: Option<String>,
    #[serde(serialize_with = "or_none")]
    pub subsection_header: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct Acknowledgements {
    pub text: String,
    #[serde(rename = "evenPage")]
    pub even_page: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct AboutReport {
    pub section_page: SectionData,
    pub text: String,
    #[serde(serialize_with = "or_none")]
    pub page: Option<i64>,
    #[serde(serialize_with = "or_none")]
    pub header: Option<String>,
    #[serde(rename = "evenPage")]
    pub even_page: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct ExecFinding {
    #[serde(serialize_with = "or_none")]
    pub page: Option<i64>,
    #[serde(serialize_with = "or_none")]
    pub subsection_header: Option<String>,
    #[serde(rename = "evenPage")]
    pub even_page: bool,
    pub content: Vec<String>,
    #[serde(rename = "startingPage", serialize_with = "or_none")]
    pub starting_page: Option<i64>,
}

#[derive(Clone, Debug, Serialize)]
pub struct SectionStub {
    pub section_page: SectionData,
    #[serde(serialize_with = "or_none")]
    pub page: Option<i64>,
    #[serde(serialize_with = "or_none")]
    pub header: Option<String>,
    #[serde(rename = "evenPage")]
    pub even_page: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct PageStub {
    #[serde(serialize_with = "or_none")]
    pub page: Option<i64>,
    #[serde(serialize_with = "or_none")]
    pub header: Option<String>,
    #[serde(rename = "evenPage")]
    pub even_page: bool,
}

impl From<&OutlineRow> for PageStub {
    fn from(row: &OutlineRow) -> Self {
        Self {
            page: row.page,
            header: row.section_header.clone(),
            even_page: row.even_page,
        }
    }
}

/// Materials as parallel arrays, the shape the materials table is laid out from.
#[derive(Clone, Debug, Serialize)]
pub struct MaterialsColumns {
    pub name: Vec<String>,
    pub description: Vec<String>,
    pub link1: Vec<String>,
    pub label1: Vec<String>,
    #[serde(serialize_with = "or_none")]
    pub header: Option<String>,
    #[serde(rename = "evenPage")]
    pub even_page: bool,
    #[serde(serialize_with = "or_none")]
    pub page: Option<i64>,
}

#[derive(Clone, Debug, Serialize)]
pub struct OtherPublications {
    pub publications: Vec<Publication>,
    #[serde(serialize_with = "or_none")]
    pub header: Option<String>,
    #[serde(rename = "evenPage")]
    pub even_page: bool,
    #[serde(serialize_with = "or_none")]
    pub page: Option<i64>,
}

#[derive(Clone, Debug, Serialize)]
pub struct MarkdownPage {
    pub text: Vec<MarkdownSection>,
    #[serde(rename = "evenPage")]
    pub even_page: bool,
    #[serde(serialize_with = "or_none")]
    pub header: Option<String>,
    pub id: String,
    #[serde(serialize_with = "or_none")]
    pub page: Option<i64>,
    #[serde(serialize_with = "or_none")]
    pub subsection_header: Option<String>,
}

impl MarkdownPage {
    fn new(row: &OutlineRow, text: Vec<MarkdownSection>) -> Self {
        Self {
            text,
            even_page: row.even_page,
            header: row.section_header.clone(),
            id: row.id.clone(),
            page: row.page,
            subsection_header: row.subsection_header.clone(),
        }
    }
}

/// Everything the template needs beyond the raw outline and figure map.
#[derive(Clone, Debug, Serialize)]
pub struct DynamicData {
    pub general: IndexMap<String, String>,
    pub toc: IndexMap<String, TocEntry>,
    pub acknowledgements: Acknowledgements,
    #[serde(rename = "aboutReport")]
    pub about_report: AboutReport,
    #[serde(rename = "ExecFindings")]
    pub exec_findings: IndexMap<String, ExecFinding>,
    #[serde(rename = "Project")]
    pub project: SectionStub,
    #[serde(rename = "Appendix")]
    pub appendix: SectionStub,
    #[serde(rename = "AboutWJP")]
    pub about: PageStub,
    #[serde(rename = "BackCover")]
    pub back_cover: PageStub,
    pub methodological_materials: MaterialsColumns,
    pub methodology: MarkdownPage,
    pub description_sample: MarkdownPage,
    #[serde(rename = "otherPublications")]
    pub other_publications: OtherPublications,
}

impl DynamicData {
    pub fn build(tables: &ReportTables, texts: TextAssets) -> Result<Self, Error> {
        let outline = tables.outline.as_slice();

        let toc = index_by_key(
            outline.iter().filter(|row| row.toc).map(|row| {
                (
                    row.id.clone(),
                    TocEntry {
                        page: row.page,
                        even_page: row.even_page,
                        section_header: row.section_header.clone(),
                        subsection_header: row.subsection_header.clone(),
                    },
                )
            }),
            "id",
            |(id, _)| id.clone(),
        )
        .into_iter()
        .map(|(id, (_, entry))| (id, entry))
        .collect();

        let acknowledgements = Acknowledgements {
            text: texts.acknowledgements,
            even_page: outline_row(outline, ACKNOWLEDGEMENTS_ID)?.even_page,
        };

        let about_row = first_in_subsection(outline, ABOUT_REPORT_HEADER)?;
        let about_report = AboutReport {
            section_page: section_data(ABOUT_REPORT_HEADER, outline)?,
            text: texts.about_report,
            page: about_row.page,
            header: about_row.section_header.clone(),
            even_page: about_row.even_page,
        };

        let exec_findings = exec_findings(outline, texts.executive_findings)?;

        let materials_row = outline_row(outline, MATERIALS_ID)?;
        let materials = tables.materials.as_slice();
        let methodological_materials = MaterialsColumns {
            name: column(materials, |m| &m.material_name),
            description: column(materials, |m| &m.description),
            link1: column(materials, |m| &m.link1),
            label1: column(materials, |m| &m.label1),
            header: materials_row.section_header.clone(),
            even_page: materials_row.even_page,
            page: materials_row.page,
        };

        let publications_row = outline_row(outline, PUBLICATIONS_ID)?;
        let other_publications = OtherPublications {
            publications: tables.publications.clone(),
            header: publications_row.section_header.clone(),
            even_page: publications_row.even_page,
            page: publications_row.page,
        };

        Ok(Self {
            general: tables.general.clone(),
            toc,
            acknowledgements,
            about_report,
            exec_findings,
            project: section_stub(PROJECT_HEADER, outline)?,
            appendix: section_stub(APPENDIX_HEADER, outline)?,
            about: outline_row(outline, ABOUT_ID)?.into(),
            back_cover: outline_row(outline, BACK_COVER_ID)?.into(),
            methodological_materials,
            methodology: MarkdownPage::new(outline_row(outline, METHODOLOGY_ID)?, texts.methodology),
            description_sample: MarkdownPage::new(
                outline_row(outline, SAMPLE_ID)?,
                texts.sample_description,
            ),
            other_publications,
        })
    }
}

fn column(
    materials: &[MethodologicalMaterial],
    field: impl Fn(&MethodologicalMaterial) -> &Option<String>,
) -> Vec<String> {
    materials
        .iter()
        .map(|m| field(m).clone().unwrap_or_else(|| MISSING.to_string()))
        .collect()
}

fn section_stub(header: &str, outline: &[OutlineRow]) -> Result<SectionStub, Error> {
    let first = first_in_section(outline, header)?;
    Ok(SectionStub {
        section_page: section_data(header, outline)?,
        page: first.page,
        header: first.section_header.clone(),
        even_page: first.even_page,
    })
}

/// Pairs each executive findings page of the outline with one extracted page of text.
fn exec_findings(
    outline: &[OutlineRow],
    pages: Vec<Vec<String>>,
) -> Result<IndexMap<String, ExecFinding>, Error> {
    let rows: Vec<&OutlineRow> = outline
        .iter()
        .filter(|row| row.subsection_header.as_deref() == Some(EXEC_FINDINGS_HEADER))
        .collect();
    let starting_page = first_in_subsection(outline, EXEC_FINDINGS_HEADER)?.page;

    if rows.len() != pages.len() {
        return Err(Error::Mismatch(format!(
            "outline has {} '{}' pages but the findings document has {}",
            rows.len(),
            EXEC_FINDINGS_HEADER,
            pages.len()
        )));
    }

    let findings = rows.into_iter().zip(pages).map(|(row, content)| {
        (
            row.id.clone(),
            ExecFinding {
                page: row.page,
                subsection_header: row.subsection_header.clone(),
                even_page: row.even_page,
                content,
                starting_page,
            },
        )
    });
    Ok(index_by_key(findings, "id", |(id, _)| id.clone())
        .into_iter()
        .map(|(id, (_, finding))| (id, finding))
        .collect())
}
