//! Login gate
//!
//! The dashboard has a single account, stored as the one record of the
//! credential sheet:
//!
//! | status   | username | password |
//! |----------|----------|----------|
//! | 사용가능 | admin    | secret   |
//!
//! Only the SHA-256 digest of the password is kept in memory. Every attempt is
//! appended to the audit sheet, and after `max_failures` failures in one
//! session the gate writes the blocked literal into the status cell, which
//! keeps every later session locked until an operator resets it by hand.

use chrono::{DateTime, FixedOffset, Offset, Utc};
use sha2::{Digest, Sha256};

use fleetsheet_core::{CellAddress, Column, Error, Result, TabularBackend};

use crate::client::SheetClient;
use crate::session::SessionContext;

/// Audit timestamp format
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const KST_OFFSET_SECS: i32 = 9 * 3600;
const MASK: &str = "****";

/// Sheet layout and limits for the login gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    pub credential_sheet: String,
    pub credential_start_col: String,
    pub credential_end_col: String,
    pub status_header: String,
    pub username_header: String,
    pub password_header: String,
    /// Status that enables the account
    pub active_status: String,
    /// Status written when the account locks
    pub blocked_status: String,
    /// Failures in one session before the account locks
    pub max_failures: u32,
    pub audit_sheet: String,
    pub audit_start_col: String,
    pub success_label: String,
    pub failure_label: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            credential_sheet: "[ 로그인 계정 ]".to_string(),
            credential_start_col: "A".to_string(),
            credential_end_col: "C".to_string(),
            status_header: "상태".to_string(),
            username_header: "아이디".to_string(),
            password_header: "비밀번호".to_string(),
            active_status: "사용가능".to_string(),
            blocked_status: "사용차단".to_string(),
            max_failures: 20,
            audit_sheet: "[ 로그인 내역 ]".to_string(),
            audit_start_col: "A".to_string(),
            success_label: "로그인 성공".to_string(),
            failure_label: "로그인 실패".to_string(),
        }
    }
}

/// Result of one login attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    Success,
    /// Wrong username or password; `remaining` attempts before lockout
    Failed { remaining: u32 },
    /// The account is blocked or disabled
    Locked,
}

#[derive(Debug, Clone)]
struct Credential {
    username: String,
    digest: String,
}

/// Checks logins against the credential sheet.
#[derive(Debug, Clone)]
pub struct Authenticator {
    config: AuthConfig,
    credential: Option<Credential>,
    status_cell: CellAddress,
}

impl Authenticator {
    /// Read the credential record.
    ///
    /// An account whose status is anything but the active literal loads as
    /// disabled; every attempt against it reports [`LoginOutcome::Locked`].
    pub fn load<B: TabularBackend>(client: &SheetClient<B>, config: AuthConfig) -> Result<Self> {
        let sheet = config.credential_sheet.as_str();
        let record = client.fetch_single_row(
            sheet,
            &config.credential_start_col,
            &config.credential_end_col,
        )?;

        let missing = |header: &str| Error::MissingHeader {
            sheet: sheet.to_string(),
            header: header.to_string(),
        };

        let status_index = record
            .get_index_of(config.status_header.as_str())
            .ok_or_else(|| missing(&config.status_header))?;
        let status_col = Column::parse(&config.credential_start_col)?.offset(status_index as u32);
        let status_cell = CellAddress::new(2, status_col.number())?;

        let credential = if record[status_index] == config.active_status {
            let username = record
                .get(config.username_header.as_str())
                .ok_or_else(|| missing(&config.username_header))?;
            let password = record
                .get(config.password_header.as_str())
                .ok_or_else(|| missing(&config.password_header))?;
            Some(Credential {
                username: username.clone(),
                digest: hash_password(password),
            })
        } else {
            tracing::warn!(
                "'{sheet}': account status is {:?}, logins disabled",
                record[status_index]
            );
            None
        };

        Ok(Self {
            config,
            credential,
            status_cell,
        })
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Whether the account is usable at all
    pub fn is_enabled(&self) -> bool {
        self.credential.is_some()
    }

    /// Whether `session` may no longer attempt a login
    pub fn is_locked(&self, session: &SessionContext) -> bool {
        !self.is_enabled() || session.fail_count >= self.config.max_failures
    }

    /// Compare a username and password against the stored account
    pub fn check(&self, username: &str, password: &str) -> bool {
        self.credential
            .as_ref()
            .is_some_and(|c| c.username == username && c.digest == hash_password(password))
    }

    /// One login attempt, timestamped now in Korea Standard Time.
    pub fn attempt<B: TabularBackend>(
        &mut self,
        client: &mut SheetClient<B>,
        session: &mut SessionContext,
        username: &str,
        password: &str,
    ) -> Result<LoginOutcome> {
        self.attempt_at(client, session, username, password, kst_now())
    }

    /// [`attempt`](Self::attempt) with an explicit timestamp.
    pub fn attempt_at<B: TabularBackend>(
        &mut self,
        client: &mut SheetClient<B>,
        session: &mut SessionContext,
        username: &str,
        password: &str,
        at: DateTime<FixedOffset>,
    ) -> Result<LoginOutcome> {
        if self.is_locked(session) {
            if self.is_enabled() {
                self.block(client)?;
            }
            return Ok(LoginOutcome::Locked);
        }

        if self.check(username, password) {
            self.audit(client, at, username, password, true)?;
            session.log_in(username);
            tracing::info!("login succeeded for {username:?}");
            return Ok(LoginOutcome::Success);
        }

        self.audit(client, at, username, password, false)?;
        session.fail_count += 1;
        tracing::warn!(
            "login failed for {username:?} ({}/{})",
            session.fail_count,
            self.config.max_failures
        );

        if self.is_locked(session) {
            self.block(client)?;
            return Ok(LoginOutcome::Locked);
        }
        Ok(LoginOutcome::Failed {
            remaining: self.config.max_failures.saturating_sub(session.fail_count),
        })
    }

    fn block<B: TabularBackend>(&mut self, client: &mut SheetClient<B>) -> Result<()> {
        let cell = self.status_cell.to_a1_string();
        client.set_cell(
            &self.config.credential_sheet,
            &cell,
            self.config.blocked_status.as_str(),
        )?;
        tracing::warn!(
            "'{}'!{cell}: account blocked after {} failures",
            self.config.credential_sheet,
            self.config.max_failures
        );
        self.credential = None;
        Ok(())
    }

    fn audit<B: TabularBackend>(
        &self,
        client: &mut SheetClient<B>,
        at: DateTime<FixedOffset>,
        username: &str,
        password: &str,
        success: bool,
    ) -> Result<()> {
        let outcome = if success {
            &self.config.success_label
        } else {
            &self.config.failure_label
        };
        let row = [
            at.format(TIMESTAMP_FORMAT).to_string(),
            username.to_string(),
            mask_password(password),
            outcome.clone(),
        ];
        client.append_row(&self.config.audit_sheet, row, &self.config.audit_start_col)?;
        Ok(())
    }
}

/// Lower-case hex SHA-256 of the UTF-8 password
pub fn hash_password(password: &str) -> String {
    format!("{:x}", Sha256::digest(password.as_bytes()))
}

/// Keep the first four characters, mask the rest; short passwords are fully masked.
pub fn mask_password(password: &str) -> String {
    if password.chars().count() <= 4 {
        return MASK.to_string();
    }
    let head: String = password.chars().take(4).collect();
    head + MASK
}

/// Korea Standard Time (UTC+9)
pub fn kst() -> FixedOffset {
    FixedOffset::east_opt(KST_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

pub fn kst_now() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&kst())
}
