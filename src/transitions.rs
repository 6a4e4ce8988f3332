//! DST transition tables for civil time zones
//!
//! A [`TransitionTable`] is the ascending sequence of (instant, new UTC
//! offset) records for one zone, derived once from the embedded IANA data
//! and immutable afterwards. The table only covers recorded history: an
//! instant before the first record has no known offset, which is an
//! observable state ([`OffsetQuery`]) rather than a zero default.

use crate::error::{FxtError, Result};
use crate::types::AbsoluteTime;
use chrono::{DateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};

/// Start of the scanned history (1970-01-01 00:00 UTC)
const SCAN_START: AbsoluteTime = 0;

/// End of the scanned history (2038-01-01 00:00 UTC), the upper bound of
/// the 32-bit epoch range the bar format can express
const SCAN_END: AbsoluteTime = 2_145_916_800;

/// Scan step; zones never change offset more than once per day
const SCAN_STEP: AbsoluteTime = 86_400;

/// One DST transition: the UTC offset effective at and after `instant`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub instant: AbsoluteTime,
    pub offset_secs: i32,
}

/// One side of a transition bracket
///
/// For a previous transition `offset` is the offset in effect *before*
/// `instant`; for a next transition it is the offset in effect at and
/// after `instant`. `None` means the value lies outside recorded history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionEdge {
    pub instant: AbsoluteTime,
    pub offset: Option<i32>,
}

/// Result of an offset query: the offset in effect plus the bracketing
/// transitions, each side `None` when unknown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OffsetQuery {
    pub offset: Option<i32>,
    pub prev: Option<TransitionEdge>,
    pub next: Option<TransitionEdge>,
}

/// Ascending, immutable sequence of DST transitions for one civil zone
#[derive(Debug, Clone)]
pub struct TransitionTable {
    records: Vec<TransitionRecord>,
}

static NEW_YORK_TABLE: OnceLock<Arc<TransitionTable>> = OnceLock::new();

/// UTC offset of `tz` at an absolute instant, in seconds
fn zone_offset(tz: Tz, instant: AbsoluteTime) -> Result<i32> {
    let dt = DateTime::<Utc>::from_timestamp(instant, 0)
        .ok_or_else(|| FxtError::OutOfRange(format!("timestamp not representable: {}", instant)))?;
    Ok(tz.offset_from_utc_datetime(&dt.naive_utc()).fix().local_minus_utc())
}

impl TransitionTable {
    /// Build the transition table for a zone from the embedded IANA data.
    ///
    /// Offsets are sampled day by day over the scanned history and every
    /// detected change is bisected to the exact second. A zone without a
    /// single offset change in that range cannot drive DST-dependent
    /// conversions and is rejected as a configuration error.
    pub fn for_zone(tz: Tz) -> Result<Self> {
        let mut records = Vec::new();
        let mut prev_offset = zone_offset(tz, SCAN_START)?;

        let mut t = SCAN_START + SCAN_STEP;
        while t <= SCAN_END {
            let offset = zone_offset(tz, t)?;
            if offset != prev_offset {
                let instant = Self::bisect(tz, t - SCAN_STEP, t)?;
                records.push(TransitionRecord {
                    instant,
                    offset_secs: offset,
                });
                prev_offset = offset;
            }
            t += SCAN_STEP;
        }

        if records.is_empty() {
            return Err(FxtError::ConfigError(format!(
                "timezone database has no transitions for {}",
                tz.name()
            )));
        }

        log::debug!("loaded {} transitions for {}", records.len(), tz.name());
        Ok(Self { records })
    }

    /// Build a table from explicit records (dependency injection / tests).
    /// Records must be strictly ascending by instant.
    pub fn from_records(records: Vec<TransitionRecord>) -> Result<Self> {
        if records.windows(2).any(|w| w[0].instant >= w[1].instant) {
            return Err(FxtError::InvalidArgument(
                "transition records must be strictly ascending".to_string(),
            ));
        }
        Ok(Self { records })
    }

    /// The process-wide America/New_York table, built at most once and
    /// shared read-only afterwards.
    pub fn new_york() -> Result<Arc<TransitionTable>> {
        if let Some(table) = NEW_YORK_TABLE.get() {
            return Ok(Arc::clone(table));
        }
        let table = Arc::new(Self::for_zone(chrono_tz::America::New_York)?);
        Ok(Arc::clone(NEW_YORK_TABLE.get_or_init(|| table)))
    }

    /// Smallest instant in `(lo, hi]` whose offset differs from the offset
    /// at `lo`. Caller guarantees the offsets at `lo` and `hi` differ.
    fn bisect(tz: Tz, mut lo: AbsoluteTime, mut hi: AbsoluteTime) -> Result<AbsoluteTime> {
        let base = zone_offset(tz, lo)?;
        while hi - lo > 1 {
            let mid = lo + (hi - lo) / 2;
            if zone_offset(tz, mid)? == base {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        Ok(hi)
    }

    /// All transition records, ascending by instant
    pub fn records(&self) -> &[TransitionRecord] {
        &self.records
    }

    /// UTC offset in effect at `instant`, or `None` when the instant
    /// precedes the first recorded transition (or the table is empty)
    pub fn offset_at(&self, instant: AbsoluteTime) -> Option<i32> {
        let idx = self.records.partition_point(|r| r.instant <= instant);
        if idx == 0 {
            None
        } else {
            Some(self.records[idx - 1].offset_secs)
        }
    }

    /// Offset plus bracketing transitions around `instant`.
    ///
    /// The previous edge is the transition that started the current
    /// period, carrying the offset in effect before it (`None` inside the
    /// first bracket, where no earlier reference point exists). The next
    /// edge carries the offset effective after it. At or after the last
    /// transition the next edge is `None`.
    pub fn query(&self, instant: AbsoluteTime) -> OffsetQuery {
        // number of transitions at or before the instant
        let idx = self.records.partition_point(|r| r.instant <= instant);

        let offset = if idx > 0 {
            Some(self.records[idx - 1].offset_secs)
        } else {
            None
        };

        let prev = if idx == 0 {
            None
        } else {
            Some(TransitionEdge {
                instant: self.records[idx - 1].instant,
                offset: if idx >= 2 {
                    Some(self.records[idx - 2].offset_secs)
                } else {
                    None
                },
            })
        };

        let next = if idx >= self.records.len() {
            None
        } else {
            Some(TransitionEdge {
                instant: self.records[idx].instant,
                offset: Some(self.records[idx].offset_secs),
            })
        };

        OffsetQuery { offset, prev, next }
    }
}
