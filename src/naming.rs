//! Artifact naming and the injected clock

use chrono::{DateTime, Utc};

/// Source of the generation instant
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Minute-precision UTC stamp, `YYYYMMDD_HHMM`
pub fn timestamp(instant: DateTime<Utc>) -> String {
    instant.format("%Y%m%d_%H%M").to_string()
}

/// `response_sheet_{cells}_cells_{YYYYMMDD_HHMM}.{ext}`
pub fn sheet_filename(total_cells: u32, instant: DateTime<Utc>, extension: &str) -> String {
    format!(
        "response_sheet_{total_cells}_cells_{}.{extension}",
        timestamp(instant)
    )
}
