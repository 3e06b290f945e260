use std::fmt;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Workbook(calamine::Error),
    MissingSheet(String),
    MissingColumn {
        table: String,
        column: String,
        available: Vec<String>,
    },
    InvalidCell {
        table: String,
        row: usize,
        column: String,
        message: String,
    },
    /// A filter that must match one outline row matched none, or several.
    Lookup {
        field: &'static str,
        value: String,
        matches: usize,
    },
    UnsupportedMacro {
        id: String,
        value: Option<String>,
    },
    Mismatch(String),
    InvalidDocx(String),
    Xml(roxmltree::Error),
    Template(tera::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {e}"),
            Error::Workbook(e) => write!(f, "workbook error: {e}"),
            Error::MissingSheet(name) => write!(f, "workbook has no sheet named '{name}'"),
            Error::MissingColumn {
                table,
                column,
                available,
            } => write!(
                f,
                "column '{column}' not found in table '{table}' (columns: {})",
                available.join(", ")
            ),
            Error::InvalidCell {
                table,
                row,
                column,
                message,
            } => write!(f, "{table}: row {row}, column '{column}': {message}"),
            Error::Lookup {
                field,
                value,
                matches: 0,
            } => write!(f, "no outline row with {field} == '{value}'"),
            Error::Lookup {
                field,
                value,
                matches,
            } => write!(
                f,
                "expected one outline row with {field} == '{value}', found {matches}"
            ),
            Error::UnsupportedMacro { id, value: Some(v) } => {
                write!(f, "outline row '{id}' has unsupported macro '{v}'")
            }
            Error::UnsupportedMacro { id, value: None } => {
                write!(f, "outline row '{id}' has no macro")
            }
            Error::Mismatch(msg) => write!(f, "{msg}"),
            Error::InvalidDocx(msg) => write!(f, "invalid DOCX: {msg}"),
            Error::Xml(e) => write!(f, "XML parse error: {e}"),
            Error::Template(e) => write!(f, "template error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Workbook(e) => Some(e),
            Error::Xml(e) => Some(e),
            Error::Template(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<calamine::Error> for Error {
    fn from(e: calamine::Error) -> Self {
        Error::Workbook(e)
    }
}

impl From<roxmltree::Error> for Error {
    fn from(e: roxmltree::Error) -> Self {
        Error::Xml(e)
    }
}

impl From<tera::Error> for Error {
    fn from(e: tera::Error) -> Self {
        Error::Template(e)
    }
}
