use chrono::{FixedOffset, Offset, Utc};
use parking_lot::RwLock;
use std::path::{Path, PathBuf};

use crate::errors::Error;

pub const MIN_OFFSET_HOURS: i64 = -12;
pub const MAX_OFFSET_HOURS: i64 = 12;

/// The process-wide timezone offset, persisted as a decimal hour count.
///
/// The file is read once on start-up; later reads come from memory.
pub struct TimezoneStore {
    path: PathBuf,
    offset: RwLock<FixedOffset>,
}

impl TimezoneStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();

        let offset = match std::fs::read_to_string(&path) {
            Ok(content) => parse_hours(&content).unwrap_or_else(|err| {
                log::warn!("Ignoring timezone in {}: {}", path.display(), err);
                utc()
            }),
            Err(ref err) if err.kind() == std::io::ErrorKind::NotFound => utc(),
            Err(err) => {
                log::warn!("Could not read {}: {}", path.display(), err);
                utc()
            }
        };

        log::info!("Using timezone {}", display_offset(offset));
        Self { path, offset: RwLock::new(offset) }
    }

    pub fn offset(&self) -> FixedOffset {
        *self.offset.read()
    }

    /// Validate and persist a whole-hour offset, then make it current.
    pub fn set_hours(&self, hours: i64) -> Result<FixedOffset, Error> {
        if !(MIN_OFFSET_HOURS..=MAX_OFFSET_HOURS).contains(&hours) {
            return Err(Error::TimezoneRange(hours.to_string()));
        }

        let offset = FixedOffset::east_opt(hours as i32 * 3600)
            .ok_or_else(|| Error::TimezoneRange(hours.to_string()))?;

        std::fs::write(&self.path, format_hours(offset))?;
        *self.offset.write() = offset;

        Ok(offset)
    }
}

fn utc() -> FixedOffset {
    Utc.fix()
}

/// Parse a stored hour count such as `-5`, `5.0` or `3.5`.
pub fn parse_hours(content: &str) -> Result<FixedOffset, Error> {
    let content = content.trim();
    let hours = content
        .parse::<f64>()
        .map_err(|_| Error::TimezoneRange(content.to_string()))?;

    if !hours.is_finite() || hours < MIN_OFFSET_HOURS as f64 || hours > MAX_OFFSET_HOURS as f64 {
        return Err(Error::TimezoneRange(content.to_string()));
    }

    FixedOffset::east_opt((hours * 3600.0).round() as i32)
        .ok_or_else(|| Error::TimezoneRange(content.to_string()))
}

/// The stored form: whole hours without a fraction, otherwise a decimal.
pub fn format_hours(offset: FixedOffset) -> String {
    let secs = offset.local_minus_utc();
    if secs % 3600 == 0 {
        (secs / 3600).to_string()
    } else {
        (f64::from(secs) / 3600.0).to_string()
    }
}

/// `UTC`, `UTC+05:00`, `UTC-03:30`.
pub fn display_offset(offset: FixedOffset) -> String {
    let secs = offset.local_minus_utc();
    if secs == 0 {
        return String::from("UTC");
    }

    let sign = if secs < 0 { '-' } else { '+' };
    let secs = secs.abs();
    format!("UTC{}{:02}:{:02}", sign, secs / 3600, secs % 3600 / 60)
}
