//! Device telemetry records
//!
//! The device sheet holds one row per motorcycle tracker: identifiers, the
//! last fix (time, latitude, longitude, speed), a status and six motion
//! channels. Rows are loaded column-wise with [`SheetClient::fetch_records`]
//! and turned into [`DeviceRecord`]s here.

use fleetsheet_core::{ColumnRecord, Error, Result, TabularBackend};

use crate::client::SheetClient;

pub const DEVICE_ID: &str = "장비ID";
pub const CLIENT_ID: &str = "클라이언트ID";
pub const CAR_NUMBER: &str = "차량번호";
pub const TIME: &str = "시간";
pub const LATITUDE: &str = "위도";
pub const LONGITUDE: &str = "경도";
pub const SPEED: &str = "속도";
pub const STATUS: &str = "상태";

/// Motion channel headers, in sheet order
pub const MOTION_HEADERS: [&str; 6] = [
    "모션데이터\naccx",
    "모션데이터\naccy",
    "모션데이터\naccz",
    "모션데이터\ngyrox",
    "모션데이터\ngyroy",
    "모션데이터\ngyroz",
];

/// Where device rows are read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    pub sheet: String,
    pub start_col: String,
    pub end_col: String,
    pub key_cols: Vec<String>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            sheet: "오토바이DB".to_string(),
            start_col: "A".to_string(),
            end_col: "N".to_string(),
            key_cols: vec!["A".to_string()],
        }
    }
}

/// Raw motion sensor readings, kept as the sheet stores them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Motion {
    pub accx: String,
    pub accy: String,
    pub accz: String,
    pub gyrox: String,
    pub gyroy: String,
    pub gyroz: String,
}

/// One tracker row
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceRecord {
    pub device_id: String,
    pub client_id: String,
    pub car_number: String,
    pub time: String,
    pub latitude: f64,
    pub longitude: f64,
    pub speed: String,
    pub status: String,
    pub motion: Motion,
}

impl DeviceRecord {
    /// Map marker for this device's last fix
    pub fn marker(&self) -> MapMarker {
        MapMarker::new(
            self.latitude,
            self.longitude,
            format!("{} {}", self.device_id, self.car_number),
        )
    }
}

/// Plain-data hand-off to a map widget
#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub latitude: f64,
    pub longitude: f64,
    pub label: String,
    /// Kakao "big map" link for the position
    pub link: String,
}

impl MapMarker {
    pub fn new(latitude: f64, longitude: f64, label: impl Into<String>) -> Self {
        Self {
            latitude,
            longitude,
            label: label.into(),
            link: format!("https://map.kakao.com/link/map/{latitude},{longitude}"),
        }
    }
}

impl<B: TabularBackend> SheetClient<B> {
    /// Load every device row from the telemetry sheet.
    pub fn fetch_devices(&self, config: &TelemetryConfig) -> Result<Vec<DeviceRecord>> {
        let record = self.fetch_records(
            &config.sheet,
            &config.start_col,
            &config.end_col,
            config.key_cols.as_slice(),
        )?;
        let devices = devices_from_record(&config.sheet, &record)?;
        tracing::info!("'{}': {} devices", config.sheet, devices.len());
        Ok(devices)
    }
}

/// Build device rows from a column-oriented record.
///
/// Fails on the first missing header or unparseable coordinate; `row` in
/// the error is the sheet row.
pub fn devices_from_record(sheet: &str, record: &ColumnRecord) -> Result<Vec<DeviceRecord>> {
    let column = |header: &str| header_values(sheet, record, header);

    let ids = column(DEVICE_ID)?;
    let client_ids = column(CLIENT_ID)?;
    let car_numbers = column(CAR_NUMBER)?;
    let times = column(TIME)?;
    let latitudes = column(LATITUDE)?;
    let longitudes = column(LONGITUDE)?;
    let speeds = column(SPEED)?;
    let statuses = column(STATUS)?;
    let motion = MOTION_HEADERS
        .iter()
        .map(|h| column(h))
        .collect::<Result<Vec<_>>>()?;

    let cell = |values: &[String], i: usize| values.get(i).cloned().unwrap_or_default();

    (0..ids.len())
        .map(|i| {
            let row = i + 2;
            Ok(DeviceRecord {
                device_id: cell(ids, i),
                client_id: cell(client_ids, i),
                car_number: cell(car_numbers, i),
                time: cell(times, i),
                latitude: parse_coordinate(row, LATITUDE, &cell(latitudes, i))?,
                longitude: parse_coordinate(row, LONGITUDE, &cell(longitudes, i))?,
                speed: cell(speeds, i),
                status: cell(statuses, i),
                motion: Motion {
                    accx: cell(motion[0], i),
                    accy: cell(motion[1], i),
                    accz: cell(motion[2], i),
                    gyrox: cell(motion[3], i),
                    gyroy: cell(motion[4], i),
                    gyroz: cell(motion[5], i),
                },
            })
        })
        .collect()
}

fn header_values<'a>(sheet: &str, record: &'a ColumnRecord, header: &str) -> Result<&'a [String]> {
    record
        .get(header)
        .map(Vec::as_slice)
        .ok_or_else(|| Error::MissingHeader {
            sheet: sheet.to_string(),
            header: header.to_string(),
        })
}

fn parse_coordinate(row: usize, field: &'static str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| Error::InvalidTelemetry {
            row,
            field,
            value: value.to_string(),
        })
}
