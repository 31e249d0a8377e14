//! Directory-backed store

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use fleetsheet_core::{
    BackendResult, CellAddress, CellRange, SheetDimensions, SheetGrid, TabularBackend,
};

use crate::error::{CsvError, CsvResult};
use crate::options::CsvOptions;
use crate::reader::read_rows;
use crate::writer::write_rows;

const FORBIDDEN: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// File stem for a sheet title: path-hostile characters become spaces.
pub fn sanitize_sheet_name(name: &str) -> String {
    name.chars()
        .map(|c| if FORBIDDEN.contains(&c) { ' ' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}

/// One `<sheet>.csv` file per sheet inside a directory.
///
/// The row extent of a sheet is its stored row count, but never less than
/// [`CsvOptions::min_rows`]. Unlike the remote store, a write below the
/// extent simply lengthens the file.
#[derive(Debug, Clone)]
pub struct CsvBackend {
    dir: PathBuf,
    options: CsvOptions,
}

impl CsvBackend {
    /// Use `dir` as the store, creating it if needed
    pub fn open<P: AsRef<Path>>(dir: P) -> CsvResult<Self> {
        Self::with_options(dir, CsvOptions::default())
    }

    pub fn with_options<P: AsRef<Path>>(dir: P, options: CsvOptions) -> CsvResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, options })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `sheet`
    pub fn sheet_path(&self, sheet: &str) -> CsvResult<PathBuf> {
        let stem = sanitize_sheet_name(sheet);
        if stem.is_empty() {
            return Err(CsvError::InvalidSheetName(sheet.to_string()));
        }
        Ok(self.dir.join(format!("{stem}.csv")))
    }

    /// Create an empty sheet; returns `false` when it already exists.
    pub fn create_sheet(&self, sheet: &str) -> CsvResult<bool> {
        let path = self.sheet_path(sheet)?;
        if path.exists() {
            return Ok(false);
        }
        File::create(&path)?;
        tracing::info!("created sheet file {}", path.display());
        Ok(true)
    }

    /// Sheet file stems in the directory, sorted
    pub fn sheet_names(&self) -> CsvResult<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("csv") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Read a sheet file into a grid
    pub fn load(&self, sheet: &str) -> CsvResult<SheetGrid> {
        let path = self.sheet_path(sheet)?;
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CsvError::SheetNotFound(sheet.to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        tracing::debug!("reading {}", path.display());
        let rows = read_rows(file, &self.options)?;
        let mut grid = SheetGrid::from_rows(sheet, rows);
        let stored = grid.dimensions().rows;
        if stored < self.options.min_rows {
            grid.add_rows(self.options.min_rows - stored);
        }
        Ok(grid)
    }

    /// Replace the sheet file with `grid`
    pub fn store(&self, grid: &SheetGrid) -> CsvResult<()> {
        let path = self.sheet_path(grid.name())?;
        let tmp = path.with_extension("csv.tmp");

        let file = BufWriter::new(File::create(&tmp)?);
        write_rows(file, &grid.rows(), &self.options)?;
        fs::rename(&tmp, &path)?;
        tracing::debug!("rewrote {}", path.display());
        Ok(())
    }

    fn modify<F>(&self, sheet: &str, f: F) -> CsvResult<()>
    where
        F: FnOnce(&mut SheetGrid) -> CsvResult<()>,
    {
        let mut grid = self.load(sheet)?;
        f(&mut grid)?;
        self.store(&grid)
    }
}

impl TabularBackend for CsvBackend {
    fn dimensions(&self, sheet: &str) -> BackendResult<SheetDimensions> {
        Ok(self.load(sheet)?.dimensions())
    }

    fn read_range(&self, sheet: &str, range: &CellRange) -> BackendResult<Vec<Vec<String>>> {
        Ok(self.load(sheet)?.read_range(range))
    }

    fn read_column(&self, sheet: &str, col: u32) -> BackendResult<Vec<String>> {
        Ok(self.load(sheet)?.column_values(col))
    }

    fn write_range(
        &mut self,
        sheet: &str,
        top_left: CellAddress,
        rows: &[Vec<String>],
    ) -> BackendResult<()> {
        self.modify(sheet, |grid| {
            let last_row = top_left.row + rows.len().saturating_sub(1) as u32;
            let extent = grid.dimensions().rows;
            if last_row > extent {
                grid.add_rows(last_row - extent);
            }
            grid.write(top_left, rows)
                .map_err(|e| CsvError::Core(e.into()))
        })?;
        Ok(())
    }

    fn add_rows(&mut self, sheet: &str, count: u32) -> BackendResult<()> {
        // The extent follows the file, so only the sheet's existence matters
        self.load(sheet)?;
        tracing::debug!("'{sheet}': {count} rows requested, file grows on write");
        Ok(())
    }

    fn delete_rows(&mut self, sheet: &str, first: u32, last: u32) -> BackendResult<()> {
        self.modify(sheet, |grid| {
            grid.delete_rows(first, last)
                .map_err(|e| CsvError::Core(e.into()))
        })?;
        Ok(())
    }

    fn clear_range(&mut self, sheet: &str, range: &CellRange) -> BackendResult<()> {
        self.modify(sheet, |grid| {
            grid.clear(range);
            Ok(())
        })?;
        Ok(())
    }
}
