//! Row-range resolution over a column span
//!
//! A load names a column span and, optionally, key columns. The span is read
//! from row 1 down to the sheet's extent, and the resolver decides how many of
//! those rows are real data:
//!
//! - without key columns, the last row is the deepest last-non-empty row of
//!   any column in the span;
//! - with key columns, it is the shallowest last-non-empty row among the key
//!   columns, so trailing rows where some key is still blank are left out.

use crate::cell::CellRange;
use crate::column::Column;
use crate::error::{Error, Result};

/// A validated column span with optional key columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpan {
    start: Column,
    end: Column,
    keys: Vec<Column>,
}

impl ColumnSpan {
    /// Build a span from column letters.
    ///
    /// Every key column must fall inside `start..=end`.
    pub fn new<S: AsRef<str>>(start: &str, end: &str, keys: &[S]) -> Result<Self> {
        let start = Column::parse(start)?;
        let end = Column::parse(end)?;
        if start > end {
            return Err(Error::InvalidAddress(format!(
                "start column {start} is after end column {end}"
            )));
        }

        let keys = keys
            .iter()
            .map(|k| {
                let key = Column::parse(k.as_ref())?;
                if key < start || key > end {
                    return Err(Error::KeyColumnOutOfSpan {
                        column: key.letters(),
                        start: start.letters(),
                        end: end.letters(),
                    });
                }
                Ok(key)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { start, end, keys })
    }

    /// Span without key columns.
    pub fn columns(start: &str, end: &str) -> Result<Self> {
        Self::new::<&str>(start, end, &[])
    }

    pub fn start(&self) -> Column {
        self.start
    }

    pub fn end(&self) -> Column {
        self.end
    }

    pub fn keys(&self) -> &[Column] {
        &self.keys
    }

    /// Number of columns in the span.
    pub fn width(&self) -> usize {
        (self.end.number() - self.start.number() + 1) as usize
    }

    /// Zero-based offsets of the key columns within the span.
    pub fn key_offsets(&self) -> Vec<usize> {
        self.keys
            .iter()
            .map(|k| (k.number() - self.start.number()) as usize)
            .collect()
    }

    /// The span from row 1 through `last_row`.
    pub fn range_to(&self, last_row: u32) -> Result<CellRange> {
        CellRange::from_bounds(self.start.number(), self.end.number(), 1, last_row)
    }
}

/// Last 1-based row whose cell at `offset` is non-empty, scanning bottom-up.
///
/// Returns 0 when the column holds nothing.
pub fn last_populated_row(rows: &[Vec<String>], offset: usize) -> u32 {
    rows.iter()
        .rposition(|row| row.get(offset).is_some_and(|v| !v.is_empty()))
        .map_or(0, |idx| idx as u32 + 1)
}

/// Resolve the last data row of `rows`, a grid read from row 1 of `span`.
///
/// Returns `None` when the policy finds no data at all.
pub fn resolve_last_row(rows: &[Vec<String>], span: &ColumnSpan) -> Option<u32> {
    let last = if span.keys.is_empty() {
        (0..span.width())
            .map(|offset| last_populated_row(rows, offset))
            .max()
            .unwrap_or(0)
    } else {
        span.key_offsets()
            .into_iter()
            .map(|offset| last_populated_row(rows, offset))
            .min()
            .unwrap_or(0)
    };

    (last > 0).then_some(last)
}
