use kuchiki::traits::TendrilSink;
use kuchiki::{NodeData, NodeRef};

const INDENT: &str = "    ";

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose content is written out unchanged.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];
const PREFORMATTED_ELEMENTS: &[&str] = &["pre", "textarea"];

/// Re-serializes an HTML document with one tag or text node per line.
pub fn prettify(html: &str) -> String {
    let document = kuchiki::parse_html().one(html);
    let mut out = String::with_capacity(html.len() * 2);
    write_node(&document, 0, &mut out);
    out
}

fn indent(depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

fn write_node(node: &NodeRef, depth: usize, out: &mut String) {
    match node.data() {
        NodeData::Document(_) | NodeData::DocumentFragment => {
            for child in node.children() {
                write_node(&child, depth, out);
            }
        }
        NodeData::Doctype(doctype) => {
            indent(depth, out);
            out.push_str("<!DOCTYPE ");
            out.push_str(&doctype.name);
            out.push_str(">\n");
        }
        NodeData::Comment(comment) => {
            indent(depth, out);
            out.push_str("<!--");
            out.push_str(&comment.borrow());
            out.push_str("-->\n");
        }
        NodeData::Text(text) => {
            let text = text.borrow();
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                indent(depth, out);
                escape_text(trimmed, out);
                out.push('\n');
            }
        }
        NodeData::Element(el) => {
            let tag = el.name.local.as_ref();
            indent(depth, out);
            out.push('<');
            out.push_str(tag);
            for (name, attr) in el.attributes.borrow().map.iter() {
                out.push(' ');
                if let Some(prefix) = &attr.prefix {
                    out.push_str(prefix.as_ref());
                    out.push(':');
                }
                out.push_str(name.local.as_ref());
                out.push_str("=\"");
                escape_attr(&attr.value, out);
                out.push('"');
            }
            out.push('>');

            if VOID_ELEMENTS.contains(&tag) {
                out.push('\n');
                return;
            }

            if RAW_TEXT_ELEMENTS.contains(&tag) {
                out.push_str(&node.text_contents());
            } else if PREFORMATTED_ELEMENTS.contains(&tag) {
                for child in node.children() {
                    out.push_str(&child.to_string());
                }
            } else {
                out.push('\n');
                for child in node.children() {
                    write_node(&child, depth + 1, out);
                }
                indent(depth, out);
            }

            out.push_str("</");
            out.push_str(tag);
            out.push_str(">\n");
        }
        NodeData::ProcessingInstruction(_) => {}
    }
}

fn escape_attr(input: &str, out: &mut String) {
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}

fn escape_text(input: &str, out: &mut String) {
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}
