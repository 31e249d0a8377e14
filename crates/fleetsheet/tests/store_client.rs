//! End-to-end tests for the store client over the in-memory backend

use std::sync::{Arc, Mutex};
use std::time::Duration;

use fleetsheet::prelude::*;
use fleetsheet::{BackendError, BackendResult, SheetDimensions, Sleeper};
use pretty_assertions::assert_eq;

fn grid(name: &str, rows: &[&[&str]]) -> SheetGrid {
    SheetGrid::from_rows(name, rows.iter().map(|r| r.iter().copied()))
}

fn client(sheets: Vec<SheetGrid>) -> SheetClient<MemoryBackend> {
    let backend = sheets
        .into_iter()
        .fold(MemoryBackend::new(), MemoryBackend::with_sheet);
    SheetClient::new(backend).with_retry(RetryPolicy::none())
}

#[derive(Default)]
struct Recorder(Mutex<Vec<Duration>>);

impl Sleeper for Recorder {
    fn sleep(&self, duration: Duration) {
        self.0.lock().unwrap().push(duration);
    }
}

/// Backend that times out on every call until `healthy_after` calls were made
struct Unreliable {
    inner: MemoryBackend,
    calls: Mutex<u32>,
    healthy_after: u32,
}

impl Unreliable {
    fn check(&self) -> BackendResult<()> {
        let mut calls = self.calls.lock().unwrap();
        *calls += 1;
        if *calls <= self.healthy_after {
            Err(BackendError::Connection("connection reset by peer".into()))
        } else {
            Ok(())
        }
    }
}

impl TabularBackend for Unreliable {
    fn dimensions(&self, sheet: &str) -> BackendResult<SheetDimensions> {
        self.check()?;
        self.inner.dimensions(sheet)
    }

    fn read_range(&self, sheet: &str, range: &CellRange) -> BackendResult<Vec<Vec<String>>> {
        self.check()?;
        self.inner.read_range(sheet, range)
    }

    fn read_column(&self, sheet: &str, col: u32) -> BackendResult<Vec<String>> {
        self.check()?;
        self.inner.read_column(sheet, col)
    }

    fn write_range(
        &mut self,
        sheet: &str,
        top_left: CellAddress,
        rows: &[Vec<String>],
    ) -> BackendResult<()> {
        self.check()?;
        self.inner.write_range(sheet, top_left, rows)
    }

    fn add_rows(&mut self, sheet: &str, count: u32) -> BackendResult<()> {
        self.check()?;
        self.inner.add_rows(sheet, count)
    }

    fn delete_rows(&mut self, sheet: &str, first: u32, last: u32) -> BackendResult<()> {
        self.check()?;
        self.inner.delete_rows(sheet, first, last)
    }

    fn clear_range(&mut self, sheet: &str, range: &CellRange) -> BackendResult<()> {
        self.check()?;
        self.inner.clear_range(sheet, range)
    }
}

#[test]
fn test_key_columns_bound_the_load() {
    // A runs through row 10, B only through row 7
    let mut rows: Vec<Vec<String>> = vec![vec!["plate".into(), "driver".into()]];
    for r in 2..=10 {
        let driver = if r <= 7 { format!("driver{r}") } else { String::new() };
        rows.push(vec![format!("plate{r}"), driver]);
    }
    let c = client(vec![SheetGrid::from_rows("fleet", rows)]);

    let bounded = c.fetch_records("fleet", "A", "B", &["A", "B"]).unwrap();
    assert_eq!(bounded["plate"].len(), 6);
    assert_eq!(bounded["driver"].last().map(String::as_str), Some("driver7"));

    let all = c.fetch_records::<&str>("fleet", "A", "B", &[]).unwrap();
    assert_eq!(all["plate"].len(), 9);
    assert_eq!(all["driver"][8], "");
}

#[test]
fn test_header_only_sheet_is_empty() {
    let c = client(vec![grid("fleet", &[&["plate", "driver"]])]);
    let err = c.fetch_grid("fleet", "A", "B", &["A"]).unwrap_err();
    assert!(matches!(err, Error::EmptyRange { ref sheet, .. } if sheet == "fleet"));
}

#[test]
fn test_single_row_with_blank_second_row() {
    let mut sheet = SheetGrid::with_extent("settings", 10, 3);
    sheet
        .write(
            CellAddress::new(1, 1).unwrap(),
            &[vec!["mode".into(), "zoom".into(), "owner".into()]],
        )
        .unwrap();
    let c = client(vec![sheet]);

    let record = c.fetch_single_row("settings", "A", "C").unwrap();
    assert_eq!(
        record.iter().collect::<Vec<_>>(),
        vec![
            (&"mode".to_string(), &String::new()),
            (&"zoom".to_string(), &String::new()),
            (&"owner".to_string(), &String::new()),
        ]
    );
}

#[test]
fn test_append_after_last_row_of_start_column() {
    let mut c = client(vec![grid(
        "log",
        &[&["a", "b"], &["1", "x"], &["2"], &["3"], &["4", "y"]],
    )]);

    let row = c.append_row("log", ["x", "y"], "A").unwrap();
    assert_eq!(row, 6);
    assert_eq!(c.get_cell_by_address("log", "A6").unwrap(), "x");
    assert_eq!(c.get_cell_by_address("log", "B6").unwrap(), "y");
    assert_eq!(c.get_cell_by_address("log", "C6").unwrap(), "");
}

#[test]
fn test_lookup_update_ignores_later_duplicates() {
    let mut c = client(vec![grid(
        "cars",
        &[&["id", "state"], &["K7", "idle"], &["K8", "idle"], &["K7", "idle"]],
    )]);

    c.key_lookup_update("cars", "K7", "A", "B", vec![vec!["moving"]])
        .unwrap();

    assert_eq!(c.get_cell("cars", 2, 2).unwrap(), "moving");
    assert_eq!(c.get_cell("cars", 4, 2).unwrap(), "idle");
}

#[test]
fn test_transient_failures_are_retried_with_linear_backoff() {
    let recorder = Arc::new(Recorder::default());
    let backend = Unreliable {
        inner: MemoryBackend::new().with_sheet(grid("fleet", &[&["plate"], &["P1"]])),
        calls: Mutex::new(0),
        healthy_after: 3,
    };
    let c = SheetClient::new(backend).with_retry(RetryPolicy::default().with_sleeper(recorder.clone()));

    assert_eq!(c.get_cell("fleet", 2, 1).unwrap(), "P1");
    assert_eq!(
        *recorder.0.lock().unwrap(),
        vec![
            Duration::from_secs(5),
            Duration::from_secs(10),
            Duration::from_secs(15),
        ]
    );
}

#[test]
fn test_persistent_failures_exhaust_the_budget() {
    let recorder = Arc::new(Recorder::default());
    let backend = Unreliable {
        inner: MemoryBackend::new(),
        calls: Mutex::new(0),
        healthy_after: u32::MAX,
    };
    let mut c = SheetClient::new(backend).with_retry(RetryPolicy::default().with_sleeper(recorder.clone()));

    let err = c.set_cell("fleet", "A1", "x").unwrap_err();
    assert!(matches!(
        err,
        Error::RetryExhausted {
            attempts: 10,
            last: BackendError::Connection(_)
        }
    ));
    assert_eq!(*c.backend().calls.lock().unwrap(), 10);
    assert_eq!(recorder.0.lock().unwrap().len(), 9);
}

#[test]
fn test_validation_errors_skip_the_backend() {
    let recorder = Arc::new(Recorder::default());
    let backend = Unreliable {
        inner: MemoryBackend::new(),
        calls: Mutex::new(0),
        healthy_after: u32::MAX,
    };
    let mut c = SheetClient::new(backend).with_retry(RetryPolicy::default().with_sleeper(recorder.clone()));

    assert!(matches!(
        c.fetch_grid("fleet", "A", "C", &["D"]),
        Err(Error::KeyColumnOutOfSpan { .. })
    ));
    assert!(matches!(
        c.append_row("fleet", ["x"], "3"),
        Err(Error::InvalidColumnFormat(_))
    ));
    assert!(matches!(
        c.get_cell_by_address("fleet", "A0"),
        Err(Error::InvalidAddress(_))
    ));
    assert_eq!(*c.backend().calls.lock().unwrap(), 0);
    assert!(recorder.0.lock().unwrap().is_empty());
}

#[test]
fn test_login_session_flow() {
    let mut c = client(vec![
        grid(
            "[ 로그인 계정 ]",
            &[&["상태", "아이디", "비밀번호"], &["사용가능", "fleet", "hunter22"]],
        ),
        grid("[ 로그인 내역 ]", &[&["시간", "아이디", "비밀번호", "결과"]]),
    ]);
    let mut auth = Authenticator::load(&c, AuthConfig::default()).unwrap();
    let mut session = SessionContext::new(None);

    assert_eq!(
        auth.attempt(&mut c, &mut session, "fleet", "hunter2").unwrap(),
        LoginOutcome::Failed { remaining: 19 }
    );
    assert_eq!(
        auth.attempt(&mut c, &mut session, "fleet", "hunter22").unwrap(),
        LoginOutcome::Success
    );
    assert_eq!(session.username.as_deref(), Some("fleet"));

    let audit = c.fetch_records("[ 로그인 내역 ]", "A", "D", &["A"]).unwrap();
    assert_eq!(audit["비밀번호"], vec!["hunt****", "hunt****"]);
    assert_eq!(audit["결과"], vec!["로그인 실패", "로그인 성공"]);
}
