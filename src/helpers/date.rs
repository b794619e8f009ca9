//! Date helper functions

use chrono::{DateTime, Datelike, FixedOffset, Local, NaiveDate, NaiveDateTime};
use chrono_tz::Tz;

use crate::error::{BlogError, Result};

/// Timezone that "now" and offset-carrying dates are read in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Zone {
    /// The machine's local time
    #[default]
    Local,
    Named(Tz),
}

impl Zone {
    /// Current wall-clock time in this zone
    pub fn now(&self) -> NaiveDateTime {
        match self {
            Zone::Local => Local::now().naive_local(),
            Zone::Named(tz) => chrono::Utc::now().with_timezone(tz).naive_local(),
        }
    }

    /// Wall-clock fields of `dt` as seen from this zone
    pub fn wall_clock(&self, dt: DateTime<FixedOffset>) -> NaiveDateTime {
        match self {
            Zone::Local => dt.with_timezone(&Local).naive_local(),
            Zone::Named(tz) => dt.with_timezone(tz).naive_local(),
        }
    }
}

/// Parse a publication date. A bare `YYYY-MM-DD` means midnight.
///
/// Timestamps carrying an offset (or `Z`) are converted into `zone`, the
/// same zone "now" is read in, so the field-wise comparison lines up.
pub fn parse_published(date: &str, zone: Zone) -> Result<NaiveDateTime> {
    let date = date.trim();
    let with_time = if date.contains('T') {
        date.to_string()
    } else {
        format!("{}T00:00:00", date)
    };

    let naive = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];
    for fmt in naive {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&with_time, fmt) {
            return Ok(dt);
        }
    }

    // chrono's offset parsers want a numeric offset
    let with_offset = match with_time.strip_suffix(['Z', 'z']) {
        Some(rest) => format!("{}+00:00", rest),
        None => with_time,
    };
    let offset = [
        "%Y-%m-%dT%H:%M:%S%:z",
        "%Y-%m-%dT%H:%M:%S%.f%:z",
        "%Y-%m-%dT%H:%M%:z",
        "%Y-%m-%dT%H:%M:%S%z",
        "%Y-%m-%dT%H:%M%z",
    ];
    for fmt in offset {
        if let Ok(dt) = DateTime::parse_from_str(&with_offset, fmt) {
            return Ok(zone.wall_clock(dt));
        }
    }

    Err(BlogError::InvalidDate(date.to_string()))
}

/// Relative label from independent year, month and day differences.
///
/// Each field is subtracted on its own, so `2023-12-31` seen on `2024-01-01`
/// reads "1y ago" and a later day in the same month reads "Today".
pub fn time_ago(now: NaiveDateTime, target: NaiveDateTime) -> String {
    let years_ago = now.year() - target.year();
    let months_ago = now.month() as i32 - target.month() as i32;
    let days_ago = now.day() as i32 - target.day() as i32;

    if years_ago > 0 {
        format!("{}y ago", years_ago)
    } else if months_ago > 0 {
        format!("{}mo ago", months_ago)
    } else if days_ago > 0 {
        format!("{}d ago", days_ago)
    } else {
        "Today".to_string()
    }
}

/// Format date in full format (like "June 15, 2024")
pub fn full_date(date: &NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// `"<Month> <Day>, <Year> (<relative>)"` as of `now`, both read in `zone`
pub fn format_published(date: &str, now: NaiveDateTime, zone: Zone) -> Result<String> {
    let target = parse_published(date, zone)?;
    Ok(format!(
        "{} ({})",
        full_date(&target.date()),
        time_ago(now, target)
    ))
}
