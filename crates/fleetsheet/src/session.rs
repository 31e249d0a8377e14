//! Per-session dashboard state
//!
//! One [`SessionContext`] lives for one signed-in browser session and is
//! handed to every render and login call explicitly.

use std::fmt;

use crate::telemetry::DeviceRecord;

/// Zoom level the map opens at
pub const DEFAULT_MAP_LEVEL: u8 = 3;

/// Dashboard page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Menu {
    /// Latest position of every device
    #[default]
    Latest,
    /// Position history
    Cumulative,
}

impl Menu {
    /// Label shown in the menu
    pub fn label(self) -> &'static str {
        match self {
            Menu::Latest => "오토바이 최신 위치",
            Menu::Cumulative => "오토바이 누적 위치",
        }
    }
}

impl fmt::Display for Menu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The device the map is centred on
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceSelection {
    pub device_id: String,
    pub car_number: String,
    pub time: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<&DeviceRecord> for DeviceSelection {
    fn from(device: &DeviceRecord) -> Self {
        Self {
            device_id: device.device_id.clone(),
            car_number: device.car_number.clone(),
            time: device.time.clone(),
            latitude: device.latitude,
            longitude: device.longitude,
        }
    }
}

/// State for one session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionContext {
    pub logged_in: bool,
    pub username: Option<String>,
    /// Consecutive failed logins
    pub fail_count: u32,
    pub selected: Option<DeviceSelection>,
    pub level: u8,
    pub menu: Menu,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self {
            logged_in: false,
            username: None,
            fail_count: 0,
            selected: None,
            level: DEFAULT_MAP_LEVEL,
            menu: Menu::default(),
        }
    }
}

impl SessionContext {
    /// Fresh session with the selection seeded from `first_device`.
    pub fn new(first_device: Option<&DeviceRecord>) -> Self {
        Self {
            selected: first_device.map(DeviceSelection::from),
            ..Self::default()
        }
    }

    /// Centre the map on `device`.
    pub fn select(&mut self, device: &DeviceRecord) {
        self.selected = Some(device.into());
    }

    pub fn log_in(&mut self, username: &str) {
        self.logged_in = true;
        self.username = Some(username.to_string());
        self.fail_count = 0;
    }

    pub fn log_out(&mut self) {
        self.logged_in = false;
        self.username = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::tests::device;

    #[test]
    fn test_new_session_defaults() {
        let session = SessionContext::new(None);
        assert!(!session.logged_in);
        assert_eq!(session.level, 3);
        assert_eq!(session.menu, Menu::Latest);
        assert_eq!(session.menu.to_string(), "오토바이 최신 위치");
        assert!(session.selected.is_none());
    }

    #[test]
    fn test_selection_follows_devices() {
        let first = device("D1", 37.5, 127.0);
        let mut session = SessionContext::new(Some(&first));
        assert_eq!(session.selected.as_ref().map(|s| s.device_id.as_str()), Some("D1"));

        session.select(&device("D2", 35.1, 129.0));
        let selected = session.selected.unwrap();
        assert_eq!(selected.device_id, "D2");
        assert_eq!(selected.latitude, 35.1);
    }

    #[test]
    fn test_log_in_resets_failures() {
        let mut session = SessionContext::default();
        session.fail_count = 4;
        session.log_in("admin");
        assert!(session.logged_in);
        assert_eq!(session.fail_count, 0);

        session.log_out();
        assert!(!session.logged_in);
        assert!(session.username.is_none());
    }
}
