use std::io::{Read, Seek};
use std::path::Path;

use crate::error::Error;

use super::group_pages;

const WML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

fn is_wml(node: roxmltree::Node, name: &str) -> bool {
    node.tag_name().name() == name && node.tag_name().namespace() == Some(WML_NS)
}

fn wml<'a>(node: roxmltree::Node<'a, 'a>, name: &str) -> Option<roxmltree::Node<'a, 'a>> {
    node.children().find(|n| is_wml(*n, name))
}

/// Parse a WML boolean toggle element (e.g., w:b, w:i).
/// Present with no val, or any val other than "0"/"false"/"off", means true.
fn wml_bool(parent: roxmltree::Node, name: &str) -> Option<bool> {
    wml(parent, name).map(|n| {
        n.attribute((WML_NS, "val"))
            .is_none_or(|v| !matches!(v, "0" | "false" | "off"))
    })
}

/// Body paragraphs in document order, looking through content controls.
fn collect_paragraphs<'a>(parent: roxmltree::Node<'a, 'a>, out: &mut Vec<roxmltree::Node<'a, 'a>>) {
    for child in parent.children() {
        if is_wml(child, "p") {
            out.push(child);
        } else if is_wml(child, "sdt")
            && let Some(content) = wml(child, "sdtContent")
        {
            collect_paragraphs(content, out);
        }
    }
}

fn collect_runs<'a>(parent: roxmltree::Node<'a, 'a>, out: &mut Vec<roxmltree::Node<'a, 'a>>) {
    for child in parent.children() {
        if is_wml(child, "r") {
            out.push(child);
        } else if is_wml(child, "hyperlink") || is_wml(child, "smartTag") {
            collect_runs(child, out);
        } else if is_wml(child, "sdt")
            && let Some(content) = wml(child, "sdtContent")
        {
            collect_runs(content, out);
        }
    }
}

fn run_text(run: roxmltree::Node) -> String {
    let mut text = String::new();
    for child in run.children() {
        if child.tag_name().namespace() != Some(WML_NS) {
            continue;
        }
        match child.tag_name().name() {
            "t" => text.push_str(child.text().unwrap_or("")),
            "tab" => text.push('\t'),
            "br" if child.attribute((WML_NS, "type")).is_none_or(|t| t == "textWrapping") => {
                text.push('\n')
            }
            "cr" => text.push('\n'),
            "noBreakHyphen" => text.push('-'),
            _ => {}
        }
    }
    text
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Emphasis {
    bold: bool,
    italic: bool,
}

impl Emphasis {
    fn of(run: roxmltree::Node) -> Self {
        let rpr = wml(run, "rPr");
        Self {
            bold: rpr.and_then(|n| wml_bool(n, "b")).unwrap_or(false),
            italic: rpr.and_then(|n| wml_bool(n, "i")).unwrap_or(false),
        }
    }

    fn wrap(self, text: &str) -> String {
        let mut out = text.to_string();
        if self.bold {
            out = format!("<b>{out}</b>");
        }
        if self.italic {
            out = format!("<i>{out}</i>");
        }
        out
    }
}

/// Renders one paragraph, coalescing consecutive runs with the same emphasis.
fn paragraph_html(paragraph: roxmltree::Node) -> String {
    let mut runs = Vec::new();
    collect_runs(paragraph, &mut runs);

    let mut html = String::new();
    let mut buffer = String::new();
    let mut state = Emphasis::default();

    for run in runs {
        let emphasis = Emphasis::of(run);
        if emphasis != state {
            if !buffer.is_empty() {
                html.push_str(&state.wrap(&buffer));
                buffer.clear();
            }
            state = emphasis;
        }
        buffer.push_str(&run_text(run));
    }
    if !buffer.is_empty() {
        html.push_str(&state.wrap(&buffer));
    }
    html
}

/// One HTML fragment per body paragraph of `word/document.xml`.
pub fn extract_paragraphs(document_xml: &str) -> Result<Vec<String>, Error> {
    let xml = roxmltree::Document::parse(document_xml)?;
    let body = wml(xml.root_element(), "body")
        .ok_or_else(|| Error::InvalidDocx("missing w:body".into()))?;

    let mut paragraphs = Vec::new();
    collect_paragraphs(body, &mut paragraphs);
    Ok(paragraphs.into_iter().map(paragraph_html).collect())
}

fn read_document_xml<R: Read + Seek>(reader: R) -> Result<String, Error> {
    let mut zip = zip::ZipArchive::new(reader)
        .map_err(|_| Error::InvalidDocx("file is not a ZIP archive".into()))?;
    let mut xml_content = String::new();
    zip.by_name("word/document.xml")
        .map_err(|_| Error::InvalidDocx("missing word/document.xml (is this a DOCX file?)".into()))?
        .read_to_string(&mut xml_content)?;
    Ok(xml_content)
}

/// Extracts paragraphs from a DOCX file and groups them into pages.
pub fn extract_docx(path: &Path) -> Result<Vec<Vec<String>>, Error> {
    let file = std::fs::File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => Error::Io(
            std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())),
        ),
        _ => Error::Io(e),
    })?;
    let paragraphs = extract_paragraphs(&read_document_xml(file)?)?;
    log::debug!("{}: {} paragraphs", path.display(), paragraphs.len());
    Ok(group_pages(&paragraphs))
}
