#![allow(dead_code)]

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use outline_report::ReportConfig;
use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};
use tempfile::TempDir;
use zip::write::{SimpleFileOptions, ZipWriter};

#[derive(Clone, Copy)]
pub enum Value {
    Text(&'static str),
    Number(f64),
    Flag(bool),
    Blank,
}

use Value::{Blank, Flag, Number, Text};

pub const OUTLINE_COLUMNS: &[&str] = &[
    "id",
    "page",
    "section_header",
    "subsection_header",
    "has_subsection",
    "section_page",
    "toc",
    "thematic_findings",
    "macro",
    "charts",
    "legend",
];

pub const FIGURE_MAP_COLUMNS: &[&str] = &[
    "id",
    "chart_title",
    "chart_subtitle",
    "chart_insight",
    "footnote",
    "source",
    "legend_text",
    "legend_color",
    "panel",
    "panel_title",
    "panel_subtitle",
];

/// A sheet as a header row plus value rows.
pub struct SheetSpec {
    pub name: &'static str,
    pub columns: Vec<&'static str>,
    pub rows: Vec<Vec<Value>>,
}

impl SheetSpec {
    pub fn new(name: &'static str, columns: &[&'static str], rows: Vec<Vec<Value>>) -> Self {
        Self {
            name,
            columns: columns.to_vec(),
            rows,
        }
    }

    fn write(&self, worksheet: &mut Worksheet) -> Result<(), XlsxError> {
        worksheet.set_name(self.name)?;
        for (col, name) in self.columns.iter().enumerate() {
            worksheet.write_string(0, col as u16, *name)?;
        }
        for (r, row) in self.rows.iter().enumerate() {
            let r = r as u32 + 1;
            for (c, value) in row.iter().enumerate() {
                let c = c as u16;
                match value {
                    Text(s) => {
                        worksheet.write_string(r, c, *s)?;
                    }
                    Number(n) => {
                        worksheet.write_number(r, c, *n)?;
                    }
                    Flag(b) => {
                        worksheet.write_boolean(r, c, *b)?;
                    }
                    Blank => {}
                }
            }
        }
        Ok(())
    }
}

#[allow(clippy::too_many_arguments)]
fn outline_row(
    id: &'static str,
    page: f64,
    section: &'static str,
    subsection: Option<&'static str>,
    section_page: bool,
    thematic: bool,
    layout: &'static str,
    charts: Option<&'static str>,
) -> Vec<Value> {
    vec![
        Text(id),
        Number(page),
        Text(section),
        subsection.map_or(Blank, Text),
        Flag(subsection.is_some()),
        Flag(section_page),
        Flag(subsection.is_some()),
        Flag(thematic),
        Text(layout),
        charts.map_or(Blank, Text),
        Blank,
    ]
}

pub fn outline_rows() -> Vec<Vec<Value>> {
    vec![
        outline_row("Cover", 1.0, "Cover", None, false, false, "cover", None),
        outline_row("Acknowledgements", 2.0, "Acknowledgements", None, false, false, "text", None),
        outline_row("AboutReport", 3.0, "About this Report", None, true, false, "section", None),
        outline_row("AboutReportText", 4.0, "About this Report", Some("About this Report"), false, false, "text", None),
        outline_row("ExecFindings1", 5.0, "About this Report", Some("Executive Findings"), false, false, "text", None),
        outline_row("ExecFindings2", 6.0, "About this Report", Some("Executive Findings"), false, false, "text", None),
        outline_row("Section1", 7.0, "Section 1: Trust", None, true, true, "section", None),
        outline_row("Figure_1", 8.0, "Section 1: Trust", Some("Courts"), false, true, "bipanel", Some("Figure_1")),
        outline_row("ProjectDesign", 9.0, "Project Design", None, true, false, "section", None),
        outline_row("Methodology1", 10.0, "Project Design", Some("Methodology"), false, false, "text", None),
        outline_row("Methodology2", 11.0, "Project Design", Some("Sample Description"), false, false, "text", None),
        outline_row("Appendix", 12.0, "Appendix", None, true, false, "section", None),
        outline_row("Materials", 13.0, "Appendix", Some("Methodological Materials"), false, false, "text", None),
        outline_row("Other Publications", 14.0, "Other Publications", None, false, false, "text", None),
        outline_row("AboutWJP", 15.0, "About WJP", None, false, false, "text", None),
        outline_row("BackCover", 16.0, "Back Cover", None, false, false, "text", None),
    ]
}

pub fn figure_map_rows() -> Vec<Vec<Value>> {
    let figure = |panel: &'static str, title: &'static str, legend: Value, colors: Value| {
        vec![
            Text("Figure_1"),
            Text("Trust in courts"),
            Text("Share of respondents"),
            Text("Trust is **rising**"),
            Blank,
            Text("General Population Poll"),
            legend,
            colors,
            Text(panel),
            Text(title),
            Blank,
        ]
    };
    vec![
        figure("1", "Urban", Text("Yes,No"), Text("#003b8a,#fa4d57")),
        figure("2", "Rural", Blank, Blank),
    ]
}

pub fn default_sheets() -> Vec<SheetSpec> {
    vec![
        SheetSpec::new(
            "general_info",
            &["id", "value"],
            vec![
                vec![Text("title"), Text("Rule of Law Report")],
                vec![Text("subtitle"), Blank],
            ],
        ),
        SheetSpec::new("outline", OUTLINE_COLUMNS, outline_rows()),
        SheetSpec::new("figure_map", FIGURE_MAP_COLUMNS, figure_map_rows()),
        SheetSpec::new(
            "methodological_materials",
            &["material_name", "description", "link1", "label1"],
            vec![vec![
                Text("Questionnaire"),
                Text("Survey instrument"),
                Text("https://example.org/q.pdf"),
                Text("Download"),
            ]],
        ),
        SheetSpec::new(
            "other_publications",
            &["onClick", "img", "href", "text"],
            vec![vec![
                Blank,
                Text("static/img/previous.png"),
                Text("https://example.org/previous"),
                Text("Previous report"),
            ]],
        ),
    ]
}

pub fn write_workbook(path: &Path, sheets: &[SheetSpec]) {
    let mut workbook = Workbook::new();
    for sheet in sheets {
        sheet.write(workbook.add_worksheet()).unwrap();
    }
    workbook.save(path).unwrap();
}

fn paragraph(text: &str, bold: bool) -> String {
    let rpr = if bold { "<w:rPr><w:b/></w:rPr>" } else { "" };
    format!("<w:p><w:r>{rpr}<w:t xml:space=\"preserve\">{text}</w:t></w:r></w:p>")
}

/// DOCX with one page per entry of `pages`, separated by `page-end` paragraphs.
pub fn write_docx(path: &Path, pages: &[&[&str]]) {
    let mut body = String::new();
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            body.push_str(&paragraph("page-end", false));
        }
        for (j, text) in page.iter().enumerate() {
            body.push_str(&paragraph(text, j == 0));
        }
    }
    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
    );

    let mut zip = ZipWriter::new(fs::File::create(path).unwrap());
    zip.start_file("word/document.xml", SimpleFileOptions::default())
        .unwrap();
    zip.write_all(document.as_bytes()).unwrap();
    zip.finish().unwrap();
}

pub fn write_text_assets(dir: &Path) {
    fs::write(dir.join("acknowledgements.md"), "Thanks to *all* respondents.\n\nAnd partners.").unwrap();
    fs::write(
        dir.join("about_this_report.md"),
        "This report covers trust.\n\n{% BOX %}Key quote{% BOX END %}\n\nClosing words.",
    )
    .unwrap();
    fs::write(
        dir.join("methodology.md"),
        "Intro dropped\n## Survey\nA **national** poll.\n## Fieldwork\nConducted in *2024*.\n",
    )
    .unwrap();
    fs::write(dir.join("sample_description.md"), "## Sample\nAdults aged 18+.\n").unwrap();
    write_docx(
        &dir.join("Executive_Findings_template.docx"),
        &[&["First finding", "Detail one"], &["Second finding"]],
    );
}

/// Temp directory holding a complete, valid set of report inputs.
pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_sheets(default_sheets())
    }

    pub fn with_sheets(sheets: Vec<SheetSpec>) -> Self {
        let dir = tempfile::tempdir().unwrap();
        write_workbook(&dir.path().join("report_outline.xlsx"), &sheets);
        let text = dir.path().join("text");
        fs::create_dir(&text).unwrap();
        write_text_assets(&text);
        Self { dir }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn config(&self) -> ReportConfig {
        ReportConfig {
            workbook: self.path("report_outline.xlsx"),
            text_dir: self.path("text"),
            template: None,
            output: self.path("index.html"),
        }
    }
}
