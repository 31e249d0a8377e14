//! Store client: reads
//!
//! Every public call validates its column and address arguments locally, then
//! runs the remote part under the client's [`RetryPolicy`]. Nothing is cached;
//! each call sees the store as it is at that moment.

use fleetsheet_core::resolve::resolve_last_row;
use fleetsheet_core::{
    CellAddress, CellRange, Column, ColumnRecord, ColumnSpan, Error, RawGrid, Result, RowRecord,
    TabularBackend,
};

use crate::mutation::DuplicateKeyPolicy;
use crate::retry::RetryPolicy;

/// Reads and writes records on a [`TabularBackend`].
pub struct SheetClient<B> {
    pub(crate) backend: B,
    pub(crate) retry: RetryPolicy,
    pub(crate) duplicate_keys: DuplicateKeyPolicy,
}

impl<B: TabularBackend> SheetClient<B> {
    /// Create a client with the default retry and duplicate-key policies
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            retry: RetryPolicy::default(),
            duplicate_keys: DuplicateKeyPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_duplicate_key_policy(mut self, policy: DuplicateKeyPolicy) -> Self {
        self.duplicate_keys = policy;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Load `start_col..=end_col` from row 1 through the resolved last row.
    ///
    /// With key columns, the last row is the shallowest last-populated row
    /// among them; without, it is the deepest among all columns of the span.
    /// Rows are padded to the span width. Fails with [`Error::EmptyRange`]
    /// when only a header (or nothing) is found or when `#N/A` appears in
    /// the first two rows. Rows from the first blank key cell down are dropped.
    pub fn fetch_grid<S: AsRef<str>>(
        &self,
        sheet: &str,
        start_col: &str,
        end_col: &str,
        key_cols: &[S],
    ) -> Result<RawGrid> {
        let span = ColumnSpan::new(start_col, end_col, key_cols)?;
        self.retry
            .run("fetch_grid", || load_grid(&self.backend, sheet, &span))
    }

    /// [`fetch_grid`](Self::fetch_grid) pivoted into header → column values.
    pub fn fetch_records<S: AsRef<str>>(
        &self,
        sheet: &str,
        start_col: &str,
        end_col: &str,
        key_cols: &[S],
    ) -> Result<ColumnRecord> {
        Ok(self
            .fetch_grid(sheet, start_col, end_col, key_cols)?
            .to_column_record())
    }

    /// Header row zipped with row 2, for single-record sheets.
    ///
    /// Only the sheet's extent decides whether row 2 exists; a blank row 2
    /// yields every header mapped to an empty string.
    pub fn fetch_single_row(&self, sheet: &str, start_col: &str, end_col: &str) -> Result<RowRecord> {
        let span = ColumnSpan::columns(start_col, end_col)?;
        self.retry
            .run("fetch_single_row", || load_single_row(&self.backend, sheet, &span))
    }

    /// Header row zipped with the first row below the last value in `marker_col`.
    ///
    /// Used for work queues where the marker column is filled in once a row
    /// has been handled. The pending row is never above row 2, even when the
    /// marker column is entirely blank.
    pub fn fetch_next_pending_row(
        &self,
        sheet: &str,
        start_col: &str,
        end_col: &str,
        marker_col: &str,
    ) -> Result<RowRecord> {
        let span = ColumnSpan::columns(start_col, end_col)?;
        let marker = Column::parse(marker_col)?;
        self.retry.run("fetch_next_pending_row", || {
            let filled = self.backend.read_column(sheet, marker.number())?.len() as u32;
            let target = (filled + 1).max(2);
            let header = read_row(&self.backend, sheet, &span, 1)?;
            let body = read_row(&self.backend, sheet, &span, target)?;

            if header.iter().all(String::is_empty) || body.iter().all(String::is_empty) {
                return Err(Error::empty_range(
                    sheet,
                    span.range_to(target)?,
                    "header or pending row is blank",
                ));
            }

            tracing::info!("'{sheet}': pending row {target}");
            Ok(RawGrid::new(vec![header, body]).to_row_record())
        })
    }

    /// Text of the cell at 1-based `row`, `col`; blank cells read as "".
    pub fn get_cell(&self, sheet: &str, row: u32, col: u32) -> Result<String> {
        let addr = CellAddress::new(row, col)?;
        self.retry
            .run("get_cell", || read_cell(&self.backend, sheet, addr))
    }

    /// Text of the cell at an A1-style address.
    pub fn get_cell_by_address(&self, sheet: &str, address: &str) -> Result<String> {
        let addr = CellAddress::parse(address)?;
        self.retry
            .run("get_cell", || read_cell(&self.backend, sheet, addr))
    }
}

pub(crate) fn load_grid<B: TabularBackend>(
    backend: &B,
    sheet: &str,
    span: &ColumnSpan,
) -> Result<RawGrid> {
    let extent = span.range_to(backend.dimensions(sheet)?.rows.max(1))?;
    tracing::debug!("'{sheet}': reading {extent}");
    let rows = backend.read_range(sheet, &extent)?;

    let last_row = resolve_last_row(&rows, span)
        .ok_or_else(|| Error::empty_range(sheet, extent, "no populated rows"))?;
    let range = span.range_to(last_row)?;

    let mut grid = RawGrid::new(rows);
    grid.truncate(last_row as usize);
    grid.normalize(span.width());

    if grid.len() <= 1 {
        return Err(Error::empty_range(sheet, range, "header row only"));
    }
    if grid.has_sentinel(2) {
        return Err(Error::empty_range(sheet, range, "#N/A in the first data row"));
    }

    let dropped = grid.truncate_at_blank_key(&span.key_offsets());
    if dropped > 0 {
        tracing::debug!("'{sheet}': dropped {dropped} rows after a blank key cell");
    }
    if grid.len() <= 1 {
        return Err(Error::empty_range(sheet, range, "no rows before the first blank key"));
    }

    tracing::info!("'{sheet}'!{range}: loaded {} data rows", grid.len().saturating_sub(1));
    Ok(grid)
}

fn load_single_row<B: TabularBackend>(
    backend: &B,
    sheet: &str,
    span: &ColumnSpan,
) -> Result<RowRecord> {
    let range = span.range_to(2)?;
    if backend.dimensions(sheet)?.rows < 2 {
        return Err(Error::empty_range(sheet, range, "sheet has no second row"));
    }

    let mut grid = RawGrid::new(backend.read_range(sheet, &range)?);
    if grid.is_empty() {
        return Err(Error::empty_range(sheet, range, "header row is blank"));
    }
    grid.normalize(span.width());
    if grid.has_sentinel(2) {
        return Err(Error::empty_range(sheet, range, "#N/A in the record"));
    }

    tracing::info!("'{sheet}'!{range}: loaded single record");
    Ok(grid.to_row_record())
}

fn read_row<B: TabularBackend>(
    backend: &B,
    sheet: &str,
    span: &ColumnSpan,
    row: u32,
) -> Result<Vec<String>> {
    let range = CellRange::from_bounds(span.start().number(), span.end().number(), row, row)?;
    let mut values = backend
        .read_range(sheet, &range)?
        .into_iter()
        .next()
        .unwrap_or_default();
    values.resize(span.width(), String::new());
    Ok(values)
}

fn read_cell<B: TabularBackend>(backend: &B, sheet: &str, addr: CellAddress) -> Result<String> {
    Ok(backend
        .read_range(sheet, &CellRange::single(addr))?
        .into_iter()
        .next()
        .and_then(|row| row.into_iter().next())
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{flaky, sheet};
    use fleetsheet_core::{BackendError, MemoryBackend, SheetGrid};
    use pretty_assertions::assert_eq;

    fn client(sheets: Vec<SheetGrid>) -> SheetClient<MemoryBackend> {
        let mut backend = MemoryBackend::new();
        for s in sheets {
            backend.add_sheet(s);
        }
        SheetClient::new(backend).with_retry(RetryPolicy::none())
    }

    /// A has data through row 10, B through row 7.
    fn staggered() -> SheetGrid {
        let mut rows = vec![vec!["a".to_string(), "b".to_string()]];
        for r in 2..=10 {
            let b = if r <= 7 { format!("b{r}") } else { String::new() };
            rows.push(vec![format!("a{r}"), b]);
        }
        SheetGrid::from_rows("data", rows)
    }

    #[test]
    fn test_fetch_grid_with_key_columns_uses_minimum() {
        let c = client(vec![staggered()]);
        let grid = c.fetch_grid("data", "A", "B", &["A", "B"]).unwrap();
        assert_eq!(grid.len(), 7);
        assert_eq!(grid.rows()[6], vec!["a7", "b7"]);
    }

    #[test]
    fn test_fetch_grid_without_key_columns_uses_maximum() {
        let c = client(vec![staggered()]);
        let grid = c.fetch_grid::<&str>("data", "A", "B", &[]).unwrap();
        assert_eq!(grid.len(), 10);
        // Short rows are padded to the span width
        assert_eq!(grid.rows()[9], vec!["a10", ""]);
    }

    #[test]
    fn test_fetch_grid_header_only_is_empty_range() {
        let c = client(vec![sheet("data", &[&["id", "lat"]])]);
        assert!(matches!(
            c.fetch_grid("data", "A", "B", &["A"]),
            Err(Error::EmptyRange { .. })
        ));
        assert!(matches!(
            c.fetch_grid::<&str>("data", "A", "B", &[]),
            Err(Error::EmptyRange { .. })
        ));
    }

    #[test]
    fn test_fetch_grid_blank_sheet_is_empty_range() {
        let c = client(vec![SheetGrid::new("blank")]);
        assert!(matches!(
            c.fetch_grid::<&str>("blank", "A", "C", &[]),
            Err(Error::EmptyRange { .. })
        ));
    }

    #[test]
    fn test_fetch_grid_sentinel_in_first_data_row() {
        let c = client(vec![sheet(
            "data",
            &[&["id", "lat"], &["D1", "#N/A"], &["D2", "37.1"]],
        )]);
        assert!(matches!(
            c.fetch_grid("data", "A", "B", &["A"]),
            Err(Error::EmptyRange { .. })
        ));
    }

    #[test]
    fn test_fetch_grid_sentinel_deeper_is_kept() {
        let c = client(vec![sheet(
            "data",
            &[&["id", "lat"], &["D1", "37.1"], &["D2", "#N/A"]],
        )]);
        let grid = c.fetch_grid("data", "A", "B", &["A"]).unwrap();
        assert_eq!(grid.rows()[2][1], "#N/A");
    }

    #[test]
    fn test_fetch_grid_drops_rows_after_interior_blank_key() {
        let c = client(vec![sheet(
            "data",
            &[&["id", "v"], &["1", "x"], &["", "y"], &["3", "z"]],
        )]);
        let grid = c.fetch_grid("data", "A", "B", &["A"]).unwrap();
        assert_eq!(grid.len(), 2);
    }

    #[test]
    fn test_fetch_grid_blank_key_below_header_is_empty_range() {
        let c = client(vec![sheet(
            "data",
            &[&["id", "v"], &["", "x"], &["3", "y"]],
        )]);
        assert!(matches!(
            c.fetch_grid("data", "A", "B", &["A"]),
            Err(Error::EmptyRange { .. })
        ));
    }

    #[test]
    fn test_fetch_records_blank_key_header_is_empty_range() {
        let c = client(vec![sheet(
            "data",
            &[&["id", ""], &["1", "x"], &["2", "y"]],
        )]);
        assert!(matches!(
            c.fetch_records("data", "A", "B", &["B"]),
            Err(Error::EmptyRange { .. })
        ));
    }

    #[test]
    fn test_fetch_grid_sentinel_in_header() {
        let c = client(vec![sheet(
            "data",
            &[&["id", "#N/A"], &["D1", "37.1"], &["D2", "37.2"]],
        )]);
        assert!(matches!(
            c.fetch_grid("data", "A", "B", &["A"]),
            Err(Error::EmptyRange { .. })
        ));
    }

    #[test]
    fn test_fetch_grid_validates_before_calling_backend() {
        let c = client(vec![]);
        assert!(matches!(
            c.fetch_grid("missing", "A", "B", &["C"]),
            Err(Error::KeyColumnOutOfSpan { .. })
        ));
        assert!(matches!(
            c.fetch_grid::<&str>("missing", "A", "1", &[]),
            Err(Error::InvalidColumnFormat(_))
        ));
        assert!(matches!(
            c.fetch_grid::<&str>("missing", "A", "B", &[]),
            Err(Error::Backend(BackendError::SheetNotFound(_)))
        ));
    }

    #[test]
    fn test_fetch_records_pivots_columns() {
        let c = client(vec![sheet(
            "data",
            &[&["id", "car"], &["D1", "12가3456"], &["D2"]],
        )]);
        let record = c.fetch_records("data", "A", "B", &["A"]).unwrap();
        assert_eq!(record["id"], vec!["D1", "D2"]);
        assert_eq!(record["car"], vec!["12가3456", ""]);
    }

    #[test]
    fn test_fetch_single_row() {
        let c = client(vec![sheet(
            "login",
            &[&["status", "username", "password"], &["active", "admin", "pw"], &["x"]],
        )]);
        let record = c.fetch_single_row("login", "A", "C").unwrap();
        assert_eq!(record["status"], "active");
        assert_eq!(record["password"], "pw");
    }

    #[test]
    fn test_fetch_single_row_blank_second_row() {
        let mut grid = SheetGrid::with_extent("login", 5, 3);
        grid.write(
            CellAddress::new(1, 1).unwrap(),
            &[vec!["status".into(), "username".into(), "password".into()]],
        )
        .unwrap();
        let c = client(vec![grid]);

        let record = c.fetch_single_row("login", "A", "C").unwrap();
        assert_eq!(record.len(), 3);
        assert!(record.values().all(String::is_empty));
    }

    #[test]
    fn test_fetch_single_row_sentinel_is_empty_range() {
        let c = client(vec![sheet(
            "login",
            &[&["status", "username", "password"], &["active", "#N/A", "pw"]],
        )]);
        assert!(matches!(
            c.fetch_single_row("login", "A", "C"),
            Err(Error::EmptyRange { .. })
        ));
    }

    #[test]
    fn test_fetch_single_row_needs_two_rows() {
        let c = client(vec![sheet("login", &[&["status", "username"]])]);
        assert!(matches!(
            c.fetch_single_row("login", "A", "B"),
            Err(Error::EmptyRange { .. })
        ));
    }

    #[test]
    fn test_fetch_next_pending_row() {
        let c = client(vec![sheet(
            "queue",
            &[
                &["url", "title", "done"],
                &["u1", "t1", "Y"],
                &["u2", "t2"],
                &["u3", "t3"],
            ],
        )]);
        let record = c.fetch_next_pending_row("queue", "A", "C", "C").unwrap();
        assert_eq!(record["url"], "u2");
        assert_eq!(record["done"], "");

        let c = client(vec![sheet("queue", &[&["url", "done"], &["u1", "Y"]])]);
        assert!(matches!(
            c.fetch_next_pending_row("queue", "A", "B", "B"),
            Err(Error::EmptyRange { .. })
        ));
    }

    #[test]
    fn test_fetch_next_pending_row_blank_marker_column() {
        // No header in C either; the header row must not come back as pending
        let c = client(vec![sheet("queue", &[&["url", "title"], &["u1", "t1"]])]);
        let record = c.fetch_next_pending_row("queue", "A", "B", "C").unwrap();
        assert_eq!(record["url"], "u1");
        assert_eq!(record["title"], "t1");
    }

    #[test]
    fn test_get_cell() {
        let c = client(vec![sheet("login", &[&["status", "id"], &["active", "admin"]])]);
        assert_eq!(c.get_cell("login", 2, 2).unwrap(), "admin");
        assert_eq!(c.get_cell_by_address("login", "a2").unwrap(), "active");
        assert_eq!(c.get_cell_by_address("login", "Z99").unwrap(), "");

        assert!(matches!(
            c.get_cell("login", 0, 1),
            Err(Error::InvalidAddress(_))
        ));
        assert!(matches!(
            c.get_cell_by_address("login", "2B"),
            Err(Error::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_reads_retry_transient_failures() {
        let backend = flaky(
            MemoryBackend::new().with_sheet(sheet("data", &[&["id"], &["D1"]])),
            2,
        );
        let (retry, sleeper) = crate::testing::recording_retry();
        let c = SheetClient::new(backend).with_retry(retry);

        let grid = c.fetch_grid("data", "A", "A", &["A"]).unwrap();
        assert_eq!(grid.len(), 2);
        assert_eq!(sleeper.delays.lock().unwrap().len(), 2);
    }
}
