//! Store client: writes
//!
//! Every mutation persists on the spot. There is no transaction, so a failure
//! halfway through a block write can leave a partly written row behind.

use fleetsheet_core::{
    coerce_row, CellAddress, CellRange, CellValue, Column, ColumnSpan, Error, Result,
    TabularBackend,
};

use crate::client::{load_grid, SheetClient};

/// What `key_lookup_update` does when several rows share the key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicateKeyPolicy {
    /// Update the first matching row and log the others
    #[default]
    FirstMatch,
    /// Fail with [`Error::DuplicateKey`] without writing
    Reject,
}

impl<B: TabularBackend> SheetClient<B> {
    /// Write one value at an A1-style address.
    pub fn set_cell<V: Into<CellValue>>(&mut self, sheet: &str, address: &str, value: V) -> Result<()> {
        let addr = CellAddress::parse(address)?;
        self.write_cell(sheet, addr, value.into())
    }

    /// Write one value at 1-based coordinates.
    pub fn set_cell_at<V: Into<CellValue>>(
        &mut self,
        sheet: &str,
        row: u32,
        col: u32,
        value: V,
    ) -> Result<()> {
        let addr = CellAddress::new(row, col)?;
        self.write_cell(sheet, addr, value.into())
    }

    fn write_cell(&mut self, sheet: &str, addr: CellAddress, value: CellValue) -> Result<()> {
        let block = vec![vec![value.to_cell_string()?]];
        let retry = &self.retry;
        let backend = &mut self.backend;
        retry.run("set_cell", || {
            backend.write_range(sheet, addr, &block)?;
            Ok(())
        })?;
        tracing::info!("'{sheet}'!{addr}: cell updated");
        Ok(())
    }

    /// Append one row below the last value in `start_col`.
    ///
    /// Returns the row written.
    pub fn append_row<I, V>(&mut self, sheet: &str, values: I, start_col: &str) -> Result<u32>
    where
        I: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        let row = coerce_row(values)?;
        self.append_rows(sheet, vec![row], start_col)
    }

    /// Append a block of rows below the last value in `start_col`.
    ///
    /// The insertion row is one past the last non-empty cell of `start_col`;
    /// the sheet grows when the block runs past its row extent. Returns the
    /// first row written.
    pub fn append_rows<R, I, V>(&mut self, sheet: &str, rows: R, start_col: &str) -> Result<u32>
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        let col = Column::parse(start_col)?;
        let block = coerce_block(rows)?;
        if block.is_empty() || block.iter().all(Vec::is_empty) {
            return Err(Error::EmptyInput {
                sheet: sheet.to_string(),
            });
        }

        let retry = &self.retry;
        let backend = &mut self.backend;
        let first = retry.run("append_rows", || append_block(&mut *backend, sheet, col, &block))?;
        tracing::info!(
            "'{sheet}': appended {} rows at {}{first}",
            block.len(),
            col
        );
        Ok(first)
    }

    /// Overwrite the row whose `key_col` cell equals `key`, starting at `start_col`.
    ///
    /// The key column is loaded as a single-column grid, so the scan stops at
    /// the last populated key. With several matches the client's
    /// [`DuplicateKeyPolicy`] decides. Returns the row written.
    pub fn key_lookup_update<R, I, V>(
        &mut self,
        sheet: &str,
        key: &str,
        key_col: &str,
        start_col: &str,
        data: R,
    ) -> Result<u32>
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        let key_span = ColumnSpan::new(key_col, key_col, &[key_col])?;
        let start = Column::parse(start_col)?;
        let block = coerce_block(data)?;
        if block.is_empty() || block.iter().all(Vec::is_empty) {
            return Err(Error::EmptyInput {
                sheet: sheet.to_string(),
            });
        }

        let policy = self.duplicate_keys;
        let retry = &self.retry;
        let backend = &mut self.backend;
        let row = retry.run("key_lookup_update", || {
            let grid = load_grid(&*backend, sheet, &key_span)?;
            let matches: Vec<u32> = grid
                .data_rows()
                .iter()
                .enumerate()
                .filter(|(_, r)| r.first().is_some_and(|v| v == key))
                .map(|(i, _)| i as u32 + 2)
                .collect();

            let Some(&row) = matches.first() else {
                return Err(Error::KeyNotFound {
                    sheet: sheet.to_string(),
                    column: key_span.start().letters(),
                    key: key.to_string(),
                });
            };
            if matches.len() > 1 {
                match policy {
                    DuplicateKeyPolicy::FirstMatch => tracing::warn!(
                        "'{sheet}': key {key:?} also in rows {:?}; updating row {row} only",
                        &matches[1..]
                    ),
                    DuplicateKeyPolicy::Reject => {
                        return Err(Error::DuplicateKey {
                            sheet: sheet.to_string(),
                            column: key_span.start().letters(),
                            key: key.to_string(),
                            rows: matches,
                        })
                    }
                }
            }

            backend.write_range(sheet, CellAddress { row, col: start.number() }, &block)?;
            Ok(row)
        })?;

        tracing::info!("'{sheet}': updated row {row} for key {key:?}");
        Ok(row)
    }

    /// Blank `start_cell`'s column through `end_col`, down to the sheet's row extent.
    pub fn clear_to_bottom(&mut self, sheet: &str, start_cell: &str, end_col: &str) -> Result<()> {
        let start = CellAddress::parse(start_cell)?;
        let end = Column::parse(end_col)?;
        if end.number() < start.col {
            return Err(Error::InvalidAddress(format!(
                "end column {end} is before {start_cell}"
            )));
        }

        let retry = &self.retry;
        let backend = &mut self.backend;
        retry.run("clear_to_bottom", || {
            let last_row = backend.dimensions(sheet)?.rows.max(start.row);
            let range = CellRange::from_bounds(start.col, end.number(), start.row, last_row)?;
            tracing::debug!("'{sheet}': clearing {range}");
            backend.clear_range(sheet, &range)?;
            Ok(())
        })
    }

    /// Blank `start_cell`'s column from its row down to the column's last value.
    pub fn clear_column_tail(&mut self, sheet: &str, start_cell: &str) -> Result<()> {
        let start = CellAddress::parse(start_cell)?;
        let retry = &self.retry;
        let backend = &mut self.backend;
        retry.run("clear_column_tail", || {
            let last_row = (backend.read_column(sheet, start.col)?.len() as u32).max(start.row);
            let range = CellRange::from_bounds(start.col, start.col, start.row, last_row)?;
            tracing::debug!("'{sheet}': clearing {range}");
            backend.clear_range(sheet, &range)?;
            Ok(())
        })
    }

    /// [`clear_column_tail`](Self::clear_column_tail) for each cell in turn.
    ///
    /// Every address is checked before anything is cleared.
    pub fn clear_column_tails<S: AsRef<str>>(&mut self, sheet: &str, start_cells: &[S]) -> Result<()> {
        for cell in start_cells {
            CellAddress::parse(cell.as_ref())?;
        }
        for cell in start_cells {
            self.clear_column_tail(sheet, cell.as_ref())?;
        }
        Ok(())
    }

    /// Delete one row (1-based, header included), shifting the rows below up.
    ///
    /// Returns `false` without touching the sheet when `row` lies outside the
    /// populated rows.
    pub fn delete_row(&mut self, sheet: &str, row: u32) -> Result<bool> {
        let retry = &self.retry;
        let backend = &mut self.backend;
        retry.run("delete_row", || {
            let dims = backend.dimensions(sheet)?;
            let populated = match dims.rows.min(dims.cols) {
                0 => 0,
                _ => {
                    let all = CellRange::from_bounds(1, dims.cols, 1, dims.rows)?;
                    backend.read_range(sheet, &all)?.len() as u32
                }
            };

            if row == 0 || row > populated {
                tracing::warn!("'{sheet}': row {row} is outside the {populated} populated rows");
                return Ok(false);
            }

            backend.delete_rows(sheet, row, row)?;
            tracing::info!("'{sheet}': deleted row {row}");
            Ok(true)
        })
    }
}

fn coerce_block<R, I, V>(rows: R) -> Result<Vec<Vec<String>>>
where
    R: IntoIterator<Item = I>,
    I: IntoIterator<Item = V>,
    V: Into<CellValue>,
{
    rows.into_iter().map(coerce_row).collect()
}

fn append_block<B: TabularBackend>(
    backend: &mut B,
    sheet: &str,
    col: Column,
    block: &[Vec<String>],
) -> Result<u32> {
    let first = backend.read_column(sheet, col.number())?.len() as u32 + 1;
    let last = first + block.len() as u32 - 1;

    let extent = backend.dimensions(sheet)?.rows;
    if last > extent {
        tracing::debug!("'{sheet}': growing by {} rows", last - extent);
        backend.add_rows(sheet, last - extent)?;
    }

    backend.write_range(sheet, CellAddress { row: first, col: col.number() }, block)?;
    Ok(first)
}
