use std::path::PathBuf;

pub const ACKNOWLEDGEMENTS_FILE: &str = "acknowledgements.md";
pub const ABOUT_REPORT_FILE: &str = "about_this_report.md";
pub const METHODOLOGY_FILE: &str = "methodology.md";
pub const SAMPLE_DESCRIPTION_FILE: &str = "sample_description.md";
pub const EXEC_FINDINGS_FILE: &str = "Executive_Findings_template.docx";

/// Where the report's inputs are read from and where the page is written.
#[derive(Clone, Debug)]
pub struct ReportConfig {
    pub workbook: PathBuf,
    pub text_dir: PathBuf,
    /// Replaces the built-in template when set.
    pub template: Option<PathBuf>,
    pub output: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            workbook: PathBuf::from("../report_outline.xlsx"),
            text_dir: PathBuf::from("text"),
            template: None,
            output: PathBuf::from("index.html"),
        }
    }
}
