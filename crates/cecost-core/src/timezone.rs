//! Local calendar day used as the anchor for reporting windows
//!
//! Reports are anchored on "today" in the caller's local calendar. The zone
//! comes from the `TZ` environment variable, then the system zone, then UTC,
//! and can be overridden explicitly.

use crate::error::{CecostError, Result};
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use std::str::FromStr;
use tracing::debug;

/// Time zone used to decide which calendar day "today" is
#[derive(Debug, Clone)]
pub struct TimezoneConfig {
    pub tz: Tz,
    pub is_utc: bool,
}

impl Default for TimezoneConfig {
    fn default() -> Self {
        Self::from_tz(get_local_timezone())
    }
}

impl TimezoneConfig {
    pub fn from_tz(tz: Tz) -> Self {
        Self {
            is_utc: tz == Tz::UTC,
            tz,
        }
    }

    pub fn utc() -> Self {
        Self::from_tz(Tz::UTC)
    }

    /// Build from CLI arguments; `use_utc` overrides `timezone_str`
    pub fn from_cli(timezone_str: Option<&str>, use_utc: bool) -> Result<Self> {
        if use_utc {
            return Ok(Self::utc());
        }

        match timezone_str {
            Some(tz_str) => {
                let tz = Tz::from_str(tz_str).map_err(|_| {
                    CecostError::InvalidTimezone(format!(
                        "'{tz_str}'. Use format like 'America/New_York', 'Asia/Tokyo', or 'UTC'"
                    ))
                })?;
                Ok(Self::from_tz(tz))
            }
            None => Ok(Self::default()),
        }
    }

    pub fn display_name(&self) -> &str {
        if self.is_utc { "UTC" } else { self.tz.name() }
    }

    /// Current calendar day in this zone
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.tz).date_naive()
    }
}

/// Detect the system's local timezone, falling back to UTC
pub fn get_local_timezone() -> Tz {
    #[allow(clippy::collapsible_if)]
    if let Ok(tz_str) = std::env::var("TZ") {
        if let Ok(tz) = Tz::from_str(&tz_str) {
            debug!("Using timezone from TZ environment variable: {}", tz_str);
            return tz;
        }
    }

    match iana_time_zone::get_timezone() {
        Ok(tz_str) => match Tz::from_str(&tz_str) {
            Ok(tz) => {
                debug!("Using system timezone from iana-time-zone: {}", tz_str);
                tz
            }
            Err(_) => {
                debug!(
                    "Could not parse timezone from iana-time-zone: '{}', falling back to UTC",
                    tz_str
                );
                Tz::UTC
            }
        },
        Err(e) => {
            debug!(
                "Could not detect local timezone via iana-time-zone: {:?}, falling back to UTC",
                e
            );
            Tz::UTC
        }
    }
}
