//! Raw grids and the records built from them

use indexmap::IndexMap;

/// Literal the store puts in a cell whose formula failed to find a value.
pub const ERROR_SENTINEL: &str = "#N/A";

/// Header to column values, in sheet order.
pub type ColumnRecord = IndexMap<String, Vec<String>>;

/// Header to a single value, in sheet order.
pub type RowRecord = IndexMap<String, String>;

/// Rows of cell text as read from a sheet; the first row is the header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawGrid {
    rows: Vec<Vec<String>>,
}

impl RawGrid {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn header(&self) -> Option<&[String]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// Data rows below the header.
    pub fn data_rows(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or(&[])
    }

    /// Keep only the first `len` rows.
    pub fn truncate(&mut self, len: usize) {
        self.rows.truncate(len);
    }

    /// Right-pad every row with blanks to exactly `width` cells.
    pub fn normalize(&mut self, width: usize) {
        for row in &mut self.rows {
            row.resize(width, String::new());
        }
    }

    /// Whether any of the first `rows` rows holds [`ERROR_SENTINEL`].
    pub fn has_sentinel(&self, rows: usize) -> bool {
        self.rows
            .iter()
            .take(rows)
            .any(|row| row.iter().any(|v| v == ERROR_SENTINEL))
    }

    /// Drop every row from the first one where a key column is blank.
    ///
    /// Returns the number of rows dropped.
    pub fn truncate_at_blank_key(&mut self, key_offsets: &[usize]) -> usize {
        let cut = self.rows.iter().position(|row| {
            key_offsets
                .iter()
                .any(|&k| row.get(k).map_or(true, |v| v.is_empty()))
        });

        match cut {
            Some(idx) => {
                let dropped = self.rows.len() - idx;
                self.rows.truncate(idx);
                dropped
            }
            None => 0,
        }
    }

    /// Pivot into header → column values.
    ///
    /// Short data rows contribute blanks; a repeated header keeps the last
    /// column's values.
    pub fn to_column_record(&self) -> ColumnRecord {
        let mut record = ColumnRecord::new();
        let Some(header) = self.header() else {
            return record;
        };

        for (col, name) in header.iter().enumerate() {
            let values = self
                .data_rows()
                .iter()
                .map(|row| row.get(col).cloned().unwrap_or_default())
                .collect();
            record.insert(name.clone(), values);
        }
        record
    }

    /// Zip the header with the first data row; missing cells are blank.
    pub fn to_row_record(&self) -> RowRecord {
        let mut record = RowRecord::new();
        let Some(header) = self.header() else {
            return record;
        };
        let values = self.rows.get(1);

        for (col, name) in header.iter().enumerate() {
            let value = values
                .and_then(|row| row.get(col))
                .cloned()
                .unwrap_or_default();
            record.insert(name.clone(), value);
        }
        record
    }
}

impl From<Vec<Vec<String>>> for RawGrid {
    fn from(rows: Vec<Vec<String>>) -> Self {
        Self::new(rows)
    }
}
