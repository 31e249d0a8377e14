//! Shared fixtures for the unit tests

use std::cell::Cell;
use std::sync::Arc;

use fleetsheet_core::{
    BackendError, BackendResult, CellAddress, CellRange, SheetDimensions, SheetGrid,
    TabularBackend,
};

use crate::retry::tests::RecordingSleeper;
use crate::retry::RetryPolicy;

/// A sheet whose extent exactly fits `rows`
pub(crate) fn sheet(name: &str, rows: &[&[&str]]) -> SheetGrid {
    SheetGrid::from_rows(name, rows.iter().map(|r| r.iter().copied()))
}

/// Default retry budget with a sleeper that only records delays
pub(crate) fn recording_retry() -> (RetryPolicy, Arc<RecordingSleeper>) {
    let sleeper = Arc::new(RecordingSleeper::default());
    (RetryPolicy::default().with_sleeper(sleeper.clone()), sleeper)
}

/// Fails the first `failures` calls with a timeout, then delegates.
pub(crate) struct Flaky<B> {
    inner: B,
    remaining: Cell<u32>,
}

pub(crate) fn flaky<B>(inner: B, failures: u32) -> Flaky<B> {
    Flaky {
        inner,
        remaining: Cell::new(failures),
    }
}

impl<B> Flaky<B> {
    fn trip(&self) -> BackendResult<()> {
        match self.remaining.get() {
            0 => Ok(()),
            n => {
                self.remaining.set(n - 1);
                Err(BackendError::Timeout("simulated".into()))
            }
        }
    }
}

impl<B: TabularBackend> TabularBackend for Flaky<B> {
    fn dimensions(&self, sheet: &str) -> BackendResult<SheetDimensions> {
        self.trip()?;
        self.inner.dimensions(sheet)
    }

    fn read_range(&self, sheet: &str, range: &CellRange) -> BackendResult<Vec<Vec<String>>> {
        self.trip()?;
        self.inner.read_range(sheet, range)
    }

    fn read_column(&self, sheet: &str, col: u32) -> BackendResult<Vec<String>> {
        self.trip()?;
        self.inner.read_column(sheet, col)
    }

    fn write_range(
        &mut self,
        sheet: &str,
        top_left: CellAddress,
        rows: &[Vec<String>],
    ) -> BackendResult<()> {
        self.trip()?;
        self.inner.write_range(sheet, top_left, rows)
    }

    fn add_rows(&mut self, sheet: &str, count: u32) -> BackendResult<()> {
        self.trip()?;
        self.inner.add_rows(sheet, count)
    }

    fn delete_rows(&mut self, sheet: &str, first: u32, last: u32) -> BackendResult<()> {
        self.trip()?;
        self.inner.delete_rows(sheet, first, last)
    }

    fn clear_range(&mut self, sheet: &str, range: &CellRange) -> BackendResult<()> {
        self.trip()?;
        self.inner.clear_range(sheet, range)
    }
}
