mod common;

use std::fs;

use common::{Fixture, SheetSpec, Value, default_sheets, outline_rows, write_docx};
use outline_report::{Error, Report, build_report};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn renders_complete_report() {
    init_logging();
    let fixture = Fixture::new();
    let report = Report::load(&fixture.config()).unwrap();
    let html = report.render().unwrap();

    assert!(html.starts_with("<!DOCTYPE html>\n<html lang=\"en\">\n    <head>\n"), "{html}");
    assert!(html.contains("Rule of Law Report"));
    assert!(!html.contains("report-subtitle"), "blank subtitle must be skipped");

    // chart page
    assert!(html.contains(r#"src="static/charts_and_images/Figure_1/Figure_1_1.svg""#));
    assert!(html.contains(r#"src="static/charts_and_images/Figure_1/Figure_1_2.svg""#));
    assert!(html.contains("Chart 1. Trust in courts"));
    assert!(html.contains("background-color: #003b8a"));
    assert!(html.contains("Source: General Population Poll"));

    // section pages
    assert!(html.contains("Section 1: Trust"));
    assert!(html.contains(r##"href="#Figure_1""##));

    // text assets
    assert!(html.contains("First finding"));
    assert!(html.contains("Second finding"));
    assert!(html.contains("bg-quote"));
    assert!(html.contains("Fieldwork"));
    assert!(html.contains("national"));
    assert!(!html.contains("Intro dropped"));

    // appendix
    assert!(html.contains(r#"href="https://example.org/q.pdf""#));
    assert!(html.contains("Previous report"));
}

#[test]
fn output_is_indented_in_steps_of_four() {
    let fixture = Fixture::new();
    let html = Report::load(&fixture.config()).unwrap().render().unwrap();

    for line in html.lines() {
        let indent = line.len() - line.trim_start_matches(' ').len();
        assert_eq!(indent % 4, 0, "bad indentation: {line:?}");
        assert!(!line.trim().is_empty(), "blank line in output");
    }
}

#[test]
fn thematic_pages_follow_outline_order() {
    let fixture = Fixture::new();
    let report = Report::load(&fixture.config()).unwrap();
    let ids: Vec<&str> = report.thematic_pages().iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["Section1", "Figure_1"]);
    assert_eq!(report.thematic_pages()[1].layout, "bipanel");
}

#[test]
fn build_report_overwrites_output() {
    let fixture = Fixture::new();
    let config = fixture.config();
    fs::write(&config.output, "stale").unwrap();

    build_report(&config).unwrap();

    let written = fs::read_to_string(&config.output).unwrap();
    assert!(written.starts_with("<!DOCTYPE html>"));
    assert!(!written.contains("stale"));
}

#[test]
fn custom_template_replaces_built_in() {
    let fixture = Fixture::new();
    let template = fixture.path("custom.html");
    fs::write(&template, "<p>{{ dynamic_data.general.title }}</p>").unwrap();

    let mut config = fixture.config();
    config.template = Some(template);
    let html = Report::load(&config).unwrap().render().unwrap();

    assert!(html.contains("            Rule of Law Report\n"), "{html}");
}

#[test]
fn missing_workbook_is_io_error() {
    let fixture = Fixture::new();
    let mut config = fixture.config();
    config.workbook = fixture.path("nope.xlsx");
    assert!(matches!(Report::load(&config), Err(Error::Io(_))));
}

#[test]
fn missing_sheet_is_reported() {
    let sheets = default_sheets()
        .into_iter()
        .filter(|s| s.name != "figure_map")
        .collect();
    let fixture = Fixture::with_sheets(sheets);
    match Report::load(&fixture.config()) {
        Err(Error::MissingSheet(name)) => assert_eq!(name, "figure_map"),
        other => panic!("expected MissingSheet, got {:?}", other.err()),
    }
}

#[test]
fn missing_column_is_reported() {
    let mut sheets = default_sheets();
    let outline = sheets.iter_mut().find(|s| s.name == "outline").unwrap();
    outline.columns.pop();
    for row in &mut outline.rows {
        row.pop();
    }
    let fixture = Fixture::with_sheets(sheets);

    match Report::load(&fixture.config()) {
        Err(Error::MissingColumn { table, column, .. }) => {
            assert_eq!(table, "outline");
            assert_eq!(column, "legend");
        }
        other => panic!("expected MissingColumn, got {:?}", other.err()),
    }
}

#[test]
fn unknown_thematic_macro_is_fatal() {
    let mut rows = outline_rows();
    rows[7][8] = Value::Text("heptapanel");
    let sheets = default_sheets()
        .into_iter()
        .map(|s| {
            if s.name == "outline" {
                SheetSpec::new("outline", &s.columns, rows.clone())
            } else {
                s
            }
        })
        .collect();
    let fixture = Fixture::with_sheets(sheets);

    match Report::load(&fixture.config()) {
        Err(Error::UnsupportedMacro { id, value }) => {
            assert_eq!(id, "Figure_1");
            assert_eq!(value.as_deref(), Some("heptapanel"));
        }
        other => panic!("expected UnsupportedMacro, got {:?}", other.err()),
    }
}

#[test]
fn findings_document_must_match_outline() {
    let fixture = Fixture::new();
    write_docx(
        &fixture.path("text").join("Executive_Findings_template.docx"),
        &[&["Only one page"]],
    );
    assert!(matches!(
        Report::load(&fixture.config()),
        Err(Error::Mismatch(_))
    ));
}
