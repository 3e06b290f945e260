mod dict;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{Data, Range, Reader, Sheets, open_workbook_auto};

use crate::error::Error;

pub use dict::{Dict, MISSING, Record, index_by_key};

/// A single spreadsheet value after normalisation.
#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

static EMPTY: Cell = Cell::Empty;

/// Cell texts treated as missing values, as spreadsheet exports write them.
const NA_STRINGS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

impl Cell {
    pub fn from_data(data: &Data) -> Cell {
        match data {
            Data::Empty | Data::Error(_) => Cell::Empty,
            Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() || NA_STRINGS.contains(&trimmed) {
                    Cell::Empty
                } else {
                    Cell::Text(s.clone())
                }
            }
            Data::Float(f) => Cell::Number(*f),
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Bool(b) => Cell::Bool(*b),
            Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Display form of the value; integral numbers lose their fractional part.
    pub fn text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => Some(s.clone()),
            Cell::Number(n) => Some(format_number(*n)),
            Cell::Bool(b) => Some(if *b { "True" } else { "False" }.to_string()),
        }
    }

    pub fn flag(&self) -> bool {
        match self {
            Cell::Empty => false,
            Cell::Bool(b) => *b,
            Cell::Number(n) => *n != 0.0,
            Cell::Text(s) => matches!(
                s.trim().to_ascii_lowercase().as_str(),
                "true" | "yes" | "1"
            ),
        }
    }

    pub fn integer(&self) -> Result<Option<i64>, String> {
        match self {
            Cell::Empty => Ok(None),
            Cell::Number(n) if n.fract() == 0.0 => Ok(Some(*n as i64)),
            Cell::Number(n) => Err(format!("expected an integer, got {n}")),
            Cell::Text(s) => s
                .trim()
                .parse::<i64>()
                .map(Some)
                .map_err(|_| format!("expected an integer, got '{s}'")),
            Cell::Bool(b) => Err(format!("expected an integer, got {b}")),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// One sheet of the workbook: a header row followed by data rows.
#[derive(Clone, Debug)]
pub struct Table {
    name: String,
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows,
        }
    }

    pub fn from_range(name: &str, range: &Range<Data>) -> Self {
        let mut rows = range.rows();
        let columns: Vec<String> = rows
            .next()
            .map(|header| {
                header
                    .iter()
                    .enumerate()
                    .map(|(i, data)| match Cell::from_data(data).text() {
                        Some(s) => s.trim().to_string(),
                        None => format!("Unnamed: {i}"),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let rows: Vec<Vec<Cell>> = rows
            .map(|row| row.iter().map(Cell::from_data).collect::<Vec<_>>())
            .filter(|cells| !cells.iter().all(Cell::is_empty))
            .collect();

        log::debug!("Sheet '{}': {} columns, {} rows", name, columns.len(), rows.len());
        Self::new(name, columns, rows)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Result<usize, Error> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| Error::MissingColumn {
                table: self.name.clone(),
                column: name.to_string(),
                available: self.columns.clone(),
            })
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().enumerate().map(|(index, cells)| Row {
            table: self,
            index,
            cells,
        })
    }
}

#[derive(Clone, Copy)]
pub struct Row<'a> {
    table: &'a Table,
    index: usize,
    cells: &'a [Cell],
}

impl<'a> Row<'a> {
    pub fn cell(&self, column: usize) -> &'a Cell {
        self.cells.get(column).unwrap_or(&EMPTY)
    }

    pub fn text(&self, column: usize) -> Option<String> {
        self.cell(column).text()
    }

    pub fn flag(&self, column: usize) -> bool {
        self.cell(column).flag()
    }

    pub fn integer(&self, column: usize) -> Result<Option<i64>, Error> {
        self.cell(column)
            .integer()
            .map_err(|message| self.invalid(column, message))
    }

    pub fn required_text(&self, column: usize) -> Result<String, Error> {
        self.text(column)
            .ok_or_else(|| self.invalid(column, "value is required".to_string()))
    }

    fn invalid(&self, column: usize, message: String) -> Error {
        Error::InvalidCell {
            table: self.table.name.clone(),
            // 1-based and offset by the header row, as a spreadsheet shows it
            row: self.index + 2,
            column: self.table.columns.get(column).cloned().unwrap_or_default(),
            message,
        }
    }
}

pub struct Workbook {
    sheets: Sheets<BufReader<File>>,
}

impl Workbook {
    pub fn open(path: &Path) -> Result<Self, Error> {
        std::fs::metadata(path).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("{}: {}", e, path.display()),
            ))
        })?;
        let sheets = open_workbook_auto(path)?;
        Ok(Self { sheets })
    }

    pub fn table(&mut self, name: &str) -> Result<Table, Error> {
        if !self.sheets.sheet_names().iter().any(|n| n == name) {
            return Err(Error::MissingSheet(name.to_string()));
        }
        let range = self.sheets.worksheet_range(name)?;
        Ok(Table::from_range(name, &range))
    }
}

#[cfg(test)]
pub(crate) fn text_table(name: &str, columns: &[&str], rows: &[&[&str]]) -> Table {
    let cell = |s: &&str| Cell::from_data(&Data::String(s.to_string()));
    Table::new(
        name,
        columns.iter().map(|c| c.to_string()).collect(),
        rows.iter().map(|r| r.iter().map(cell).collect()).collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_numbers_render_without_fraction() {
        assert_eq!(Cell::Number(2.0).text().as_deref(), Some("2"));
        assert_eq!(Cell::Number(2.5).text().as_deref(), Some("2.5"));
        assert_eq!(Cell::Empty.text(), None);
    }

    #[test]
    fn missing_value_spellings_are_empty() {
        for text in ["None", " None ", "NA", "N/A", "null", "nan", "#N/A"] {
            assert_eq!(Cell::from_data(&Data::String(text.into())), Cell::Empty, "{text}");
        }
        assert_eq!(
            Cell::from_data(&Data::String("Nonessential".into())),
            Cell::Text("Nonessential".into())
        );
    }

    #[test]
    fn flags_accept_spreadsheet_spellings() {
        assert!(Cell::Bool(true).flag());
        assert!(Cell::Number(1.0).flag());
        assert!(Cell::Text("TRUE".into()).flag());
        assert!(!Cell::Text("False".into()).flag());
        assert!(!Cell::Empty.flag());
    }

    #[test]
    fn integer_rejects_fractions() {
        assert_eq!(Cell::Number(4.0).integer(), Ok(Some(4)));
        assert_eq!(Cell::Text(" 7 ".into()).integer(), Ok(Some(7)));
        assert!(Cell::Number(4.5).integer().is_err());
    }

    #[test]
    fn missing_column_lists_available_columns() {
        let table = text_table("outline", &["id", "page"], &[&["a", "1"]]);
        match table.column("macro") {
            Err(Error::MissingColumn {
                table, available, ..
            }) => {
                assert_eq!(table, "outline");
                assert_eq!(available, vec!["id", "page"]);
            }
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn invalid_cell_reports_spreadsheet_row() {
        let table = text_table("outline", &["id", "page"], &[&["a", "x"]]);
        let row = table.rows().next().unwrap();
        match row.integer(1) {
            Err(Error::InvalidCell { row, column, .. }) => {
                assert_eq!(row, 2);
                assert_eq!(column, "page");
            }
            other => panic!("expected InvalidCell, got {other:?}"),
        }
    }
}
