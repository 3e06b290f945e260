mod docx;

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::Error;

pub use docx::{extract_docx, extract_paragraphs};

/// Marker element in extracted DOCX content that closes a page.
pub const PAGE_END: &str = "page-end";

const BOX_OPEN: &str = "<p>{% BOX %}";
const BOX_CLOSE: &str = "{% BOX END %}</p>";
const QUOTE_OPEN: &str = r#"</div><div class="col-12 mb-4 bg-quote p-5"><p class="p-quote"><i>"#;
const QUOTE_CLOSE: &str = r#"</i></p></div><div class="col-12">"#;

static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());
static ITALIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*(.*?)\*").unwrap());

pub(crate) fn read_text(path: &Path) -> Result<String, Error> {
    std::fs::read_to_string(path).map_err(|e| {
        Error::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", e, path.display()),
        ))
    })
}

/// Wraps every blank-line separated paragraph in `<p>` tags.
pub fn wrap_paragraphs(content: &str) -> String {
    content
        .split("\n\n")
        .map(|paragraph| format!("<p>{}</p>", paragraph.trim()))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Turns `{% BOX %}` ... `{% BOX END %}` paragraphs into a quote block.
///
/// Literal substitution: markers only match at paragraph boundaries as
/// emitted by [`wrap_paragraphs`].
pub fn apply_box(html: &str) -> String {
    html.replace(BOX_OPEN, QUOTE_OPEN)
        .replace(BOX_CLOSE, QUOTE_CLOSE)
}

pub fn load_markdown(path: &Path, boxed: bool) -> Result<String, Error> {
    let wrapped = wrap_paragraphs(&read_text(path)?);
    Ok(if boxed { apply_box(&wrapped) } else { wrapped })
}

pub fn markdown_to_html(markdown: &str) -> String {
    let parser = pulldown_cmark::Parser::new(markdown);
    let mut html = String::with_capacity(markdown.len() * 3 / 2);
    pulldown_cmark::html::push_html(&mut html, parser);
    html
}

/// Groups paragraph fragments into pages split at [`PAGE_END`] markers.
///
/// Markers are dropped and never produce an empty page.
pub fn group_pages<S: AsRef<str>>(fragments: &[S]) -> Vec<Vec<String>> {
    let mut pages = Vec::new();
    let mut current: Vec<String> = Vec::new();
    for fragment in fragments {
        let fragment = fragment.as_ref();
        if fragment.contains(PAGE_END) {
            if !current.is_empty() {
                pages.push(std::mem::take(&mut current));
            }
        } else {
            current.push(fragment.to_string());
        }
    }
    if !current.is_empty() {
        pages.push(current);
    }
    pages
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MarkdownSection {
    pub title: String,
    pub content: String,
}

/// Converts `**bold**` and `*italic*` spans on a single line.
pub fn inline_markup(line: &str) -> String {
    let bold = BOLD.replace_all(line, "<b>${1}</b>");
    ITALIC.replace_all(&bold, "<i>${1}</i>").into_owned()
}

/// Splits markdown into `## ` headed sections; text before the first heading is dropped.
pub fn split_sections(content: &str) -> Vec<MarkdownSection> {
    let mut sections = Vec::new();
    let mut current: Option<MarkdownSection> = None;

    for line in content.lines() {
        if line.starts_with("## ") {
            if let Some(section) = current.take() {
                sections.push(section);
            }
            current = Some(MarkdownSection {
                title: line.trim().replace("## ", ""),
                content: String::new(),
            });
        } else if let Some(section) = current.as_mut() {
            section.content.push_str(&inline_markup(line));
            section.content.push('\n');
        }
    }

    if let Some(section) = current {
        sections.push(section);
    }
    sections
}

pub fn markdown_sections(path: &Path) -> Result<Vec<MarkdownSection>, Error> {
    Ok(split_sections(&read_text(path)?))
}
