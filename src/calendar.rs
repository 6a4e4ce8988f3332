//! Forex trading calendar
//!
//! Pure predicates over FXT-converted timestamps: weekend, fixed-date
//! holiday and trading day. The holiday calendar is fixed to January 1 and
//! December 25; there are no movable holidays and no regional variants.

use crate::clock::FxtClock;
use crate::error::{FxtError, Result};
use crate::types::{AbsoluteTime, ZoneId};
use chrono::{DateTime, Datelike, Utc, Weekday};
use std::sync::Arc;

/// Weekend and holiday classification in FXT
#[derive(Debug, Clone)]
pub struct ForexCalendar {
    clock: Arc<FxtClock>,
}

impl ForexCalendar {
    /// Create a calendar evaluating dates through the given clock
    pub fn new(clock: Arc<FxtClock>) -> Self {
        Self { clock }
    }

    /// The clock used for FXT conversion
    pub fn clock(&self) -> &FxtClock {
        &self.clock
    }

    /// Whether `time` (based in `zone`) falls on an FXT Saturday or Sunday
    pub fn is_weekend(&self, time: AbsoluteTime, zone: ZoneId) -> Result<bool> {
        let fxt = self.fxt_datetime(time, zone)?;
        Ok(matches!(fxt.weekday(), Weekday::Sat | Weekday::Sun))
    }

    /// Whether the FXT-converted date of `time` is January 1 or
    /// December 25
    pub fn is_holiday(&self, time: AbsoluteTime, zone: ZoneId) -> Result<bool> {
        let fxt = self.fxt_datetime(time, zone)?;
        Ok(is_holiday_date(fxt.month(), fxt.day()))
    }

    /// Holiday check against the calendar date of the *input* instant.
    ///
    /// Performs the same FXT conversion as [`is_holiday`](Self::is_holiday)
    /// but then samples month and day from the unconverted timestamp,
    /// mirroring an older code path whose output some historical data was
    /// produced with. Kept as a distinct variant until that data is
    /// reconciled; new callers want [`is_holiday`](Self::is_holiday).
    pub fn is_holiday_unshifted(&self, time: AbsoluteTime, zone: ZoneId) -> Result<bool> {
        // conversion kept for error parity with is_holiday; its date
        // fields are deliberately not consulted
        let _fxt = self.fxt_datetime(time, zone)?;
        let raw = DateTime::<Utc>::from_timestamp(time, 0).ok_or_else(|| {
            FxtError::OutOfRange(format!("timestamp not representable: {}", time))
        })?;
        Ok(is_holiday_date(raw.month(), raw.day()))
    }

    /// Whether `time` falls on a Forex trading day: neither an FXT weekend
    /// nor an FXT holiday
    pub fn is_trading_day(&self, time: AbsoluteTime, zone: ZoneId) -> Result<bool> {
        Ok(!self.is_weekend(time, zone)? && !self.is_holiday(time, zone)?)
    }

    /// FXT value of `time` interpreted as a zone-less calendar date-time
    fn fxt_datetime(&self, time: AbsoluteTime, zone: ZoneId) -> Result<DateTime<Utc>> {
        let fxt = self.clock.to_fxt(time, zone)?;
        DateTime::<Utc>::from_timestamp(fxt, 0)
            .ok_or_else(|| FxtError::OutOfRange(format!("timestamp not representable: {}", fxt)))
    }
}

fn is_holiday_date(month: u32, day: u32) -> bool {
    (month == 1 && day == 1) || (month == 12 && day == 25)
}
