use crate::utils::error::{EtlError, Result};
use std::fmt;

/// A single value in a record set.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Text(String),
    Number(f64),
}

impl Cell {
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Text(s) => f.write_str(s),
            Cell::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Ordered rows over a fixed, ordered column list.
///
/// Every row holds exactly one cell per column; constructors and
/// [`RecordSet::push_row`] enforce this.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordSet {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl RecordSet {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Builds a record set from raw spreadsheet rows.
    ///
    /// The Sheets API trims trailing blank cells, so a short row is a row
    /// with missing values and is dropped whole. A row wider than the
    /// declared columns cannot be placed and fails the build.
    pub fn from_sheet_values(columns: &[String], values: Vec<Vec<String>>) -> Result<Self> {
        let mut set = RecordSet::new(columns.to_vec());
        let mut dropped = 0usize;

        for (index, row) in values.into_iter().enumerate() {
            if row.len() > columns.len() {
                return Err(EtlError::processing(format!(
                    "row {} has {} values but {} columns were declared",
                    index + 1,
                    row.len(),
                    columns.len()
                )));
            }
            if row.len() < columns.len() {
                dropped += 1;
                continue;
            }
            set.rows.push(row.into_iter().map(Cell::Text).collect());
        }

        if dropped > 0 {
            tracing::debug!("Dropped {} incomplete sheet rows", dropped);
        }
        Ok(set)
    }

    /// Parses CSV text whose first record is the header.
    ///
    /// Empty fields become [`Cell::Null`]; everything else stays text.
    /// Input without a header row is rejected.
    pub fn from_csv(data: &[u8]) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(data);

        let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if columns.is_empty() {
            return Err(EtlError::processing("CSV object is empty: no header row"));
        }
        let mut set = RecordSet::new(columns);

        for record in reader.records() {
            let record = record?;
            let row = record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        Cell::Null
                    } else {
                        Cell::Text(field.to_string())
                    }
                })
                .collect();
            set.push_row(row)?;
        }

        Ok(set)
    }

    /// Writes the header row followed by every data row. No index column.
    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(row.iter().map(|cell| cell.to_string()))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| EtlError::processing(format!("Failed to flush CSV writer: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| EtlError::processing(format!("CSV output is not UTF-8: {}", e)))
    }

    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(EtlError::processing(format!(
                "row has {} values but the record set has {} columns",
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut Vec<Vec<Cell>> {
        &mut self.rows
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
