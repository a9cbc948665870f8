//! # Datasets
//!
//! In-memory tabular data loaded from a CSV file with a header row. Column
//! names and order are not fixed; they are whatever the header says. Cells
//! are auto-typed once on load (see [`CellValue::auto_type`]).

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::{Result, SchemaError};
use crate::labels::normalize_header;
use crate::value::CellValue;

const MEMORY_SOURCE: &str = "<memory>";

static NULL_CELL: CellValue = CellValue::Null;

/// Options applied while turning CSV text into a [`Dataset`]
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Rewrite headers to lower_snake_case before anything looks at them
    pub normalize_headers: bool,
}

/// Header plus auto-typed rows
#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<CellValue>>,
    source: String,
    loaded_at: DateTime<Utc>,
}

/// Where a dataset came from and how big it is
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetInfo {
    pub source: String,
    pub rows: usize,
    pub columns: usize,
    pub loaded_at: DateTime<Utc>,
}

/// Borrowed view of one dataset row, addressed by column name
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    index: &'a HashMap<String, usize>,
    cells: &'a [CellValue],
}

impl<'a> Row<'a> {
    /// Cell for `column`, `None` when the dataset has no such column
    pub fn get(&self, column: &str) -> Option<&'a CellValue> {
        self.index.get(column).and_then(|&i| self.cells.get(i))
    }

    /// Cell for an optional column; absent columns read as `Null`
    pub fn value(&self, column: Option<&str>) -> &'a CellValue {
        column.and_then(|c| self.get(c)).unwrap_or(&NULL_CELL)
    }
}

impl Dataset {
    /// Build a dataset from a header and rows.
    ///
    /// Blank headers (the unnamed index column pandas writes) and repeated
    /// headers are dropped together with their cells. Short rows are padded
    /// with `Null`.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self::assemble(columns, rows, MEMORY_SOURCE, &LoadOptions::default())
    }

    fn assemble(
        headers: Vec<String>,
        rows: Vec<Vec<CellValue>>,
        source: &str,
        options: &LoadOptions,
    ) -> Self {
        let mut keep: Vec<usize> = Vec::with_capacity(headers.len());
        let mut columns: Vec<String> = Vec::with_capacity(headers.len());
        let mut index: HashMap<String, usize> = HashMap::with_capacity(headers.len());

        for (position, raw) in headers.into_iter().enumerate() {
            let name = raw.trim_start_matches('\u{feff}').trim().to_string();
            if name.is_empty() {
                debug!("Dropping unnamed column at position {} in {}", position, source);
                continue;
            }
            let name = if options.normalize_headers { normalize_header(&name) } else { name };
            if index.contains_key(&name) {
                warn!("Duplicate column {:?} in {}; keeping the first occurrence", name, source);
                continue;
            }
            index.insert(name.clone(), columns.len());
            columns.push(name);
            keep.push(position);
        }

        let rows = rows
            .into_iter()
            .map(|mut cells| {
                keep.iter()
                    .map(|&i| cells.get_mut(i).map(std::mem::take).unwrap_or_default())
                    .collect()
            })
            .collect();

        Self { columns, index, rows, source: source.to_string(), loaded_at: Utc::now() }
    }

    /// Parse CSV text (header row required)
    pub fn from_csv_str(text: &str, options: &LoadOptions) -> Result<Self> {
        Self::from_csv_reader(text.as_bytes(), MEMORY_SOURCE, options)
    }

    /// Parse CSV from any reader; `source` names the input in errors and logs
    pub fn from_csv_reader<R: Read>(reader: R, source: &str, options: &LoadOptions) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| SchemaError::csv(source, e))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| SchemaError::csv(source, e))?;
            rows.push(record.iter().map(CellValue::auto_type).collect());
        }

        Ok(Self::assemble(headers, rows, source, options))
    }

    /// Load a CSV file and reject inputs that cannot be a stats dataset
    pub async fn load_csv<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Self> {
        let path = path.as_ref();
        let source = path.display().to_string();
        info!("Loading CSV from: {}", source);

        let text = tokio::fs::read_to_string(path).await.map_err(|e| SchemaError::io(&source, e))?;
        let dataset = Self::from_csv_reader(text.as_bytes(), &source, options)?;
        dataset.ensure_usable()?;

        info!(
            "Loaded {} rows x {} columns from {} at {}",
            dataset.len(),
            dataset.columns.len(),
            source,
            dataset.loaded_at.to_rfc3339()
        );
        debug!("CSV columns: {:?}", dataset.columns);
        Ok(dataset)
    }

    /// Fail on empty files and on stylesheets served in place of the CSV
    pub fn ensure_usable(&self) -> Result<()> {
        if self.columns.len() == 1 {
            let header = self.columns[0].trim();
            let first = self.rows.first().and_then(|r| r.first()).map(|c| c.to_string());
            if header.starts_with(":root") || first.is_some_and(|v| v.trim().starts_with(":root")) {
                return Err(SchemaError::StylesheetInsteadOfCsv);
            }
        }
        if self.rows.is_empty() {
            return Err(SchemaError::NoRows(self.source.clone()));
        }
        Ok(())
    }

    /// Column names in header order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.index.contains_key(column)
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> + '_ {
        self.rows.iter().map(move |cells| Row { index: &self.index, cells })
    }

    pub fn row(&self, i: usize) -> Option<Row<'_>> {
        self.rows.get(i).map(|cells| Row { index: &self.index, cells })
    }

    /// Every cell of one column, in row order (empty for unknown columns)
    pub fn column_values<'a>(&'a self, column: &str) -> impl Iterator<Item = &'a CellValue> + 'a {
        let position = self.index.get(column).copied();
        self.rows.iter().filter_map(move |r| position.and_then(|i| r.get(i)))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Where the data came from (file path or `<memory>`)
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn info(&self) -> DatasetInfo {
        DatasetInfo {
            source: self.source.clone(),
            rows: self.rows.len(),
            columns: self.columns.len(),
            loaded_at: self.loaded_at,
        }
    }
}
