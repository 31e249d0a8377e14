//! In-memory sheets
//!
//! [`SheetGrid`] models one sheet the way the remote store does: a fixed row
//! extent that only grows through [`SheetGrid::add_rows`], ragged rows of text,
//! and reads that trim trailing blanks. [`MemoryBackend`] serves a set of them
//! through [`TabularBackend`].

use crate::backend::{BackendError, BackendResult, SheetDimensions, TabularBackend};
use crate::cell::{CellAddress, CellRange};

/// Row extent of a sheet created without data
pub const DEFAULT_ROWS: u32 = 1000;

/// Column extent of a sheet created without data
pub const DEFAULT_COLS: u32 = 26;

/// A single sheet held in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetGrid {
    name: String,
    cells: Vec<Vec<String>>,
    rows: u32,
    cols: u32,
}

impl SheetGrid {
    /// Create an empty sheet with the default extent
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self::with_extent(name, DEFAULT_ROWS, DEFAULT_COLS)
    }

    /// Create an empty sheet with an explicit extent
    pub fn with_extent<S: Into<String>>(name: S, rows: u32, cols: u32) -> Self {
        Self {
            name: name.into(),
            cells: Vec::new(),
            rows,
            cols,
        }
    }

    /// Create a sheet whose extent exactly fits `rows`
    pub fn from_rows<S, R, V>(name: S, rows: R) -> Self
    where
        S: Into<String>,
        R: IntoIterator,
        R::Item: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let cells: Vec<Vec<String>> = rows
            .into_iter()
            .map(|r| r.into_iter().map(Into::into).collect())
            .collect();
        let rows = cells.len() as u32;
        let cols = cells.iter().map(Vec::len).max().unwrap_or(0) as u32;

        Self {
            name: name.into(),
            cells,
            rows,
            cols,
        }
    }

    /// Get the sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dimensions(&self) -> SheetDimensions {
        SheetDimensions {
            rows: self.rows,
            cols: self.cols,
        }
    }

    /// Cell text at 1-based coordinates; blank outside the stored cells
    pub fn value(&self, row: u32, col: u32) -> &str {
        if row == 0 || col == 0 {
            return "";
        }
        self.cells
            .get(row as usize - 1)
            .and_then(|r| r.get(col as usize - 1))
            .map_or("", String::as_str)
    }

    /// Stored rows, ragged, without trailing blank rows
    pub fn rows(&self) -> Vec<Vec<String>> {
        let mut rows = self.cells.clone();
        for row in &mut rows {
            trim_trailing_blanks(row);
        }
        while rows.last().is_some_and(Vec::is_empty) {
            rows.pop();
        }
        rows
    }

    /// Values in `range` with trailing blanks trimmed
    pub fn read_range(&self, range: &CellRange) -> Vec<Vec<String>> {
        let mut rows: Vec<Vec<String>> = (range.start.row..=range.end.row)
            .map(|row| {
                let mut cells: Vec<String> = (range.start.col..=range.end.col)
                    .map(|col| self.value(row, col).to_string())
                    .collect();
                trim_trailing_blanks(&mut cells);
                cells
            })
            .collect();

        while rows.last().is_some_and(Vec::is_empty) {
            rows.pop();
        }
        rows
    }

    /// Column `col` down to its last non-empty cell
    pub fn column_values(&self, col: u32) -> Vec<String> {
        let mut values: Vec<String> = (1..=self.cells.len() as u32)
            .map(|row| self.value(row, col).to_string())
            .collect();
        trim_trailing_blanks(&mut values);
        values
    }

    /// Write a block of rows; fails past the row extent, widens columns.
    pub fn write(&mut self, top_left: CellAddress, rows: &[Vec<String>]) -> BackendResult<()> {
        let last_row = top_left.row + rows.len().saturating_sub(1) as u32;
        if last_row > self.rows {
            return Err(BackendError::Api {
                status: 400,
                message: format!(
                    "range ending at row {last_row} exceeds grid limits of '{}' ({} rows)",
                    self.name, self.rows
                ),
            });
        }

        for (i, values) in rows.iter().enumerate() {
            let r = top_left.row as usize - 1 + i;
            if self.cells.len() <= r {
                self.cells.resize(r + 1, Vec::new());
            }
            let row = &mut self.cells[r];
            let start = top_left.col as usize - 1;
            if row.len() < start + values.len() {
                row.resize(start + values.len(), String::new());
            }
            row[start..start + values.len()].clone_from_slice(values);
            self.cols = self.cols.max((start + values.len()) as u32);
        }
        Ok(())
    }

    /// Grow the row extent by `count`
    pub fn add_rows(&mut self, count: u32) {
        self.rows += count;
    }

    /// Remove rows `first..=last`
    pub fn delete_rows(&mut self, first: u32, last: u32) -> BackendResult<()> {
        if first == 0 || first > last || last > self.rows {
            return Err(BackendError::Api {
                status: 400,
                message: format!(
                    "cannot delete rows {first}..={last} of '{}' ({} rows)",
                    self.name, self.rows
                ),
            });
        }

        let start = (first as usize - 1).min(self.cells.len());
        let end = (last as usize).min(self.cells.len());
        self.cells.drain(start..end);
        self.rows -= last - first + 1;
        Ok(())
    }

    /// Blank every stored cell inside `range`
    pub fn clear(&mut self, range: &CellRange) {
        for row in range.start.row..=range.end.row {
            let Some(cells) = self.cells.get_mut(row as usize - 1) else {
                break;
            };
            for col in range.start.col..=range.end.col {
                if let Some(cell) = cells.get_mut(col as usize - 1) {
                    cell.clear();
                }
            }
        }
    }
}

fn trim_trailing_blanks(row: &mut Vec<String>) {
    while row.last().is_some_and(String::is_empty) {
        row.pop();
    }
}

/// A set of named in-memory sheets
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    sheets: Vec<SheetGrid>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sheet, replacing any sheet with the same name
    pub fn add_sheet(&mut self, sheet: SheetGrid) {
        match self.sheets.iter_mut().find(|s| s.name == sheet.name) {
            Some(existing) => *existing = sheet,
            None => self.sheets.push(sheet),
        }
    }

    /// Builder-style [`MemoryBackend::add_sheet`]
    pub fn with_sheet(mut self, sheet: SheetGrid) -> Self {
        self.add_sheet(sheet);
        self
    }

    pub fn sheet(&self, name: &str) -> Option<&SheetGrid> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.iter().map(|s| s.name.as_str())
    }

    fn get(&self, name: &str) -> BackendResult<&SheetGrid> {
        self.sheet(name)
            .ok_or_else(|| BackendError::SheetNotFound(name.to_string()))
    }

    fn get_mut(&mut self, name: &str) -> BackendResult<&mut SheetGrid> {
        self.sheets
            .iter_mut()
            .find(|s| s.name == name)
            .ok_or_else(|| BackendError::SheetNotFound(name.to_string()))
    }
}

impl TabularBackend for MemoryBackend {
    fn dimensions(&self, sheet: &str) -> BackendResult<SheetDimensions> {
        Ok(self.get(sheet)?.dimensions())
    }

    fn read_range(&self, sheet: &str, range: &CellRange) -> BackendResult<Vec<Vec<String>>> {
        Ok(self.get(sheet)?.read_range(range))
    }

    fn read_column(&self, sheet: &str, col: u32) -> BackendResult<Vec<String>> {
        Ok(self.get(sheet)?.column_values(col))
    }

    fn write_range(
        &mut self,
        sheet: &str,
        top_left: CellAddress,
        rows: &[Vec<String>],
    ) -> BackendResult<()> {
        self.get_mut(sheet)?.write(top_left, rows)
    }

    fn add_rows(&mut self, sheet: &str, count: u32) -> BackendResult<()> {
        self.get_mut(sheet)?.add_rows(count);
        Ok(())
    }

    fn delete_rows(&mut self, sheet: &str, first: u32, last: u32) -> BackendResult<()> {
        self.get_mut(sheet)?.delete_rows(first, last)
    }

    fn clear_range(&mut self, sheet: &str, range: &CellRange) -> BackendResult<()> {
        self.get_mut(sheet)?.clear(range);
        Ok(())
    }
}
