//! Schema-flexible, string-typed tables.
//!
//! Every cell is kept as opaque text so that QC metrics pass through
//! untouched. Missing cells are the empty string.

pub mod merge;

pub use merge::{merge, JoinKind};

use crate::error::PipelineError;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::io;
use std::path::Path;

/// Comma delimiter for `.csv` tables.
pub const COMMA: u8 = b',';
/// Tab delimiter for `.tsv` tables.
pub const TAB: u8 = b'\t';

/// An in-memory table with an ordered column list.
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
    /// Where the table came from, used in error messages.
    origin: String,
}

impl Table {
    /// Create an empty table with the given columns.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            origin: "table".to_string(),
        }
    }

    /// Set the origin label used in error messages.
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    /// Read a delimited file with a header row.
    pub fn read(path: &Path, delimiter: u8) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open table: {}", path.display()))?;
        Self::from_reader(file, delimiter, &path.display().to_string())
    }

    /// Read a delimited table from any reader.
    pub fn from_reader<R: io::Read>(rdr: R, delimiter: u8, origin: &str) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(rdr);

        let headers = reader
            .headers()
            .with_context(|| format!("Failed to read header of {}", origin))?
            .clone();
        let mut table = Table::new(headers.iter()).with_origin(origin);

        let width = table.columns.len();
        for (line, record) in reader.records().enumerate() {
            let record =
                record.with_context(|| format!("Failed to read row {} of {}", line + 1, origin))?;
            // short rows are padded, long rows would lose cells
            if record.len() > width {
                return Err(PipelineError::RaggedRow {
                    origin: origin.to_string(),
                    line: record.position().map_or(line as u64 + 2, |p| p.line()),
                    expected: width,
                    found: record.len(),
                }
                .into());
            }
            table.push_row(record.iter().map(String::from).collect());
        }

        Ok(table)
    }

    /// Write the table with a header row and no index column.
    pub fn write(&self, path: &Path, delimiter: u8) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        self.to_writer(file, delimiter)
            .with_context(|| format!("Failed to write table to {}", path.display()))
    }

    /// Write the table to any writer.
    pub fn to_writer<W: io::Write>(&self, wtr: W, delimiter: u8) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(wtr);

        if !self.columns.is_empty() {
            writer.write_record(&self.columns)?;
            for row in &self.rows {
                writer.write_record(row)?;
            }
        }

        writer.flush()?;
        Ok(())
    }

    /// Concatenate tables row-wise.
    ///
    /// Columns are the union of all inputs, ordered by first appearance.
    /// Cells a table does not define are left empty. No deduplication.
    pub fn concat<I: IntoIterator<Item = Table>>(tables: I) -> Table {
        let mut out = Table::default().with_origin("concatenated tables");
        let mut positions: HashMap<String, usize> = HashMap::new();

        for table in tables {
            let mapping: Vec<usize> = table
                .columns
                .iter()
                .map(|name| {
                    *positions.entry(name.clone()).or_insert_with(|| {
                        out.columns.push(name.clone());
                        out.columns.len() - 1
                    })
                })
                .collect();

            for row in table.rows {
                let mut merged = vec![String::new(); out.columns.len()];
                for (cell, &pos) in row.into_iter().zip(&mapping) {
                    merged[pos] = cell;
                }
                out.rows.push(merged);
            }
        }

        // earlier rows predate columns introduced later
        let width = out.columns.len();
        for row in &mut out.rows {
            row.resize(width, String::new());
        }

        out
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[cfg(test)]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Position of a column, or a `MissingColumn` error naming this table.
    pub fn require_column(&self, name: &str) -> Result<usize, PipelineError> {
        self.column_index(name)
            .ok_or_else(|| PipelineError::MissingColumn {
                column: name.to_string(),
                origin: self.origin.clone(),
            })
    }

    /// All values of one column, in row order.
    pub fn column_values(&self, name: &str) -> Result<Vec<&str>, PipelineError> {
        let idx = self.require_column(name)?;
        Ok(self.rows.iter().map(|row| row[idx].as_str()).collect())
    }

    /// A single cell by row number and column name.
    #[cfg(test)]
    pub fn cell(&self, row: usize, name: &str) -> Option<&str> {
        let idx = self.column_index(name)?;
        self.rows.get(row).map(|r| r[idx].as_str())
    }

    /// Append a row, padding it with empty cells to the table width.
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.columns.len(), String::new());
        self.rows.push(row);
    }

    /// Add an all-empty column if it does not exist yet.
    pub fn ensure_column(&mut self, name: &str) {
        if self.column_index(name).is_none() {
            self.columns.push(name.to_string());
            for row in &mut self.rows {
                row.push(String::new());
            }
        }
    }

    /// Fill `target` from `source` through `f`, replacing `target` in place
    /// if it exists and appending it otherwise.
    pub fn derive_column<F>(&mut self, source: &str, target: &str, f: F) -> Result<(), PipelineError>
    where
        F: Fn(&str) -> String,
    {
        let src = self.require_column(source)?;
        self.ensure_column(target);
        let dst = self.require_column(target)?;

        for row in &mut self.rows {
            row[dst] = f(&row[src]);
        }
        Ok(())
    }

    /// Rename a column in place.
    pub fn rename_column(&mut self, from: &str, to: &str) -> Result<(), PipelineError> {
        let idx = self.require_column(from)?;
        self.columns[idx] = to.to_string();
        Ok(())
    }

    /// Move a column to position zero, keeping the order of the rest.
    pub fn move_to_front(&mut self, name: &str) -> Result<(), PipelineError> {
        let idx = self.require_column(name)?;
        let column = self.columns.remove(idx);
        self.columns.insert(0, column);
        for row in &mut self.rows {
            let cell = row.remove(idx);
            row.insert(0, cell);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str, delimiter: u8) -> Table {
        Table::from_reader(text.as_bytes(), delimiter, "test").unwrap()
    }

    fn render(table: &Table, delimiter: u8) -> String {
        let mut buf = Vec::new();
        table.to_writer(&mut buf, delimiter).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_read_keeps_cells_as_text() {
        let table = parse("Sample,depth\n007,1.50\n", COMMA);
        assert_eq!(table.columns(), ["Sample", "depth"]);
        assert_eq!(table.cell(0, "Sample"), Some("007"));
        assert_eq!(table.cell(0, "depth"), Some("1.50"));
    }

    #[test]
    fn test_read_pads_short_rows() {
        let table = parse("a,b,c\n1,2\n", COMMA);
        assert_eq!(table.rows()[0], vec!["1", "2", ""]);
    }

    #[test]
    fn test_read_rejects_extra_trailing_field() {
        let err = Table::from_reader(
            "taxon,lineage\nsample_A,B.1\nsample_B,P.1,EXTRA\n".as_bytes(),
            COMMA,
            "lineages.csv",
        )
        .unwrap_err();

        match err.downcast_ref::<PipelineError>() {
            Some(PipelineError::RaggedRow {
                origin,
                line,
                expected,
                found,
            }) => {
                assert_eq!(origin, "lineages.csv");
                assert_eq!(*line, 3);
                assert_eq!(*expected, 2);
                assert_eq!(*found, 3);
            }
            other => panic!("expected ragged row error, got {:?}", other),
        }
    }

    #[test]
    fn test_read_tab_keeps_commas() {
        let table = parse("fasta_id\nsample,B\n", TAB);
        assert_eq!(table.cell(0, "fasta_id"), Some("sample,B"));
    }

    #[test]
    fn test_concat_unions_schemas() {
        let a = parse("Sample,x\ns1,1\n", COMMA);
        let b = parse("Sample,y\ns2,2\n", COMMA);
        let merged = Table::concat(vec![a, b]);

        assert_eq!(merged.columns(), ["Sample", "x", "y"]);
        assert_eq!(merged.rows()[0], vec!["s1", "1", ""]);
        assert_eq!(merged.rows()[1], vec!["s2", "", "2"]);
    }

    #[test]
    fn test_concat_keeps_duplicates() {
        let a = parse("Sample\ns1\n", COMMA);
        let b = parse("Sample\ns1\n", COMMA);
        assert_eq!(Table::concat(vec![a, b]).len(), 2);
    }

    #[test]
    fn test_concat_of_nothing_is_empty() {
        let merged = Table::concat(Vec::new());
        assert!(merged.is_empty());
        assert!(merged.columns().is_empty());
    }

    #[test]
    fn test_move_to_front() {
        let mut table = parse("a,b,c\n1,2,3\n", COMMA);
        table.move_to_front("c").unwrap();
        assert_eq!(table.columns(), ["c", "a", "b"]);
        assert_eq!(table.rows()[0], vec!["3", "1", "2"]);
    }

    #[test]
    fn test_derive_and_rename() {
        let mut table = parse("fasta_id\nx y\n", TAB);
        table
            .derive_column("fasta_id", "copy", |v| v.to_uppercase())
            .unwrap();
        table.rename_column("fasta_id", "name").unwrap();

        assert_eq!(table.columns(), ["name", "copy"]);
        assert_eq!(table.cell(0, "copy"), Some("X Y"));
    }

    #[test]
    fn test_require_column_names_origin() {
        let table = parse("a\n1\n", COMMA);
        let err = table.require_column("missing").unwrap_err();
        assert!(err.to_string().contains("'missing'"));
        assert!(err.to_string().contains("test"));
    }

    #[test]
    fn test_write_quotes_and_delimits() {
        let table = parse("name\tlineage\n\"sample,B\"\tB.1\n", TAB);
        assert_eq!(render(&table, COMMA), "name,lineage\n\"sample,B\",B.1\n");
        assert_eq!(render(&table, TAB), "name\tlineage\nsample,B\tB.1\n");
    }
}
