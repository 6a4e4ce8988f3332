//! FXT (Forex Trading Time) conversion
//!
//! FXT is the America/New_York wall clock shifted forward by a constant 7
//! hours: the trading day starts at 17:00 New York time. It inherits New
//! York's DST calendar at that fixed offset and therefore never needs a
//! transition table of its own. An "FXT timestamp" is the FXT wall-clock
//! time expressed as seconds since 1970-01-01 00:00 FXT.
//!
//! All zone context is passed as explicit parameters; no conversion here
//! touches process-wide zone settings.

use crate::error::{FxtError, Result};
use crate::resolver::ZoneOffsetResolver;
use crate::transitions::{OffsetQuery, TransitionEdge};
use crate::types::{AbsoluteTime, ZoneId};
use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Constant shift between the New York wall clock and FXT
pub const FXT_SHIFT: i64 = 7 * 3600;

const NEW_YORK: Tz = chrono_tz::America::New_York;

/// Converts timestamps between civil zones and FXT
#[derive(Debug)]
pub struct FxtClock {
    resolver: ZoneOffsetResolver,
}

impl FxtClock {
    /// Create a clock backed by the shared New York transition table.
    ///
    /// Fails fast when the timezone database cannot supply the table.
    pub fn new() -> Result<Self> {
        Ok(Self {
            resolver: ZoneOffsetResolver::new()?,
        })
    }

    /// Create a clock around an explicitly constructed resolver
    pub fn with_resolver(resolver: ZoneOffsetResolver) -> Self {
        Self { resolver }
    }

    /// The underlying offset resolver
    pub fn resolver(&self) -> &ZoneOffsetResolver {
        &self.resolver
    }

    /// FXT timestamp of `time`, where `time` is based in `zone`.
    ///
    /// FXT input is returned unchanged, guarding against accidental
    /// double conversion. For a civil source zone the offset is sampled
    /// at the input instant; when a DST boundary falls strictly between
    /// the input and the resulting GMT instant the result is off by the
    /// DST delta. That window is a known limitation and is only logged.
    pub fn to_fxt(&self, time: AbsoluteTime, zone: ZoneId) -> Result<AbsoluteTime> {
        if zone == ZoneId::Fxt {
            return Ok(time);
        }

        let gmt_time = match zone {
            ZoneId::Gmt | ZoneId::Utc => time,
            ZoneId::Civil(_) => {
                let offset_a = self.resolver.offset_at(time, zone)? as i64;
                let gmt = time + offset_a;
                // second sample is diagnostic only; the conversion is
                // defined by offset_a even when gmt falls outside the
                // source zone's recorded history
                if let Ok(offset_b) = self.resolver.offset_at(gmt, zone) {
                    let offset_b = offset_b as i64;
                    if offset_a != offset_b {
                        log::debug!(
                            "DST boundary between {} and {} in {}; result off by {}s",
                            time,
                            gmt,
                            zone,
                            offset_b - offset_a
                        );
                    }
                }
                gmt
            }
            ZoneId::Fxt => unreachable!("handled above"),
        };

        let ny_offset = self.resolver.offset_at(gmt_time, ZoneId::Civil(NEW_YORK))? as i64;
        Ok(gmt_time + ny_offset + FXT_SHIFT)
    }

    /// FXT offset from GMT at a GMT instant, plus the bracketing DST
    /// transitions, each expressed in FXT terms (New York offset + 7h).
    ///
    /// FXT lies east of GMT, so a defined offset is always positive:
    /// GMT + offset = FXT. Instants outside the recorded transition
    /// history yield `None` fields rather than an error.
    pub fn fxt_offset_from_gmt(&self, time: AbsoluteTime) -> Result<OffsetQuery> {
        let q = self
            .resolver
            .offset_query(time, ZoneId::Civil(NEW_YORK))?;

        let shift = |edge: TransitionEdge| TransitionEdge {
            instant: edge.instant,
            offset: edge.offset.map(|o| o + FXT_SHIFT as i32),
        };

        Ok(OffsetQuery {
            offset: q.offset.map(|o| o + FXT_SHIFT as i32),
            prev: q.prev.map(shift),
            next: q.next.map(shift),
        })
    }

    /// Parse a calendar/time literal expressed in FXT into the underlying
    /// GMT instant.
    ///
    /// Accepted shapes: `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DD HH:MM` and
    /// `YYYY-MM-DD` (midnight). The text is interpreted on the New York
    /// wall clock and shifted back by 7 hours. Wall-clock times repeated
    /// by a fall-back transition map to their earlier occurrence; times
    /// skipped by a spring-forward transition are invalid.
    pub fn parse_fxt(&self, text: &str) -> Result<AbsoluteTime> {
        let naive = parse_naive(text)?;
        let local = match NEW_YORK.from_local_datetime(&naive) {
            LocalResult::Single(dt) => dt,
            LocalResult::Ambiguous(earlier, _) => earlier,
            LocalResult::None => {
                return Err(FxtError::InvalidArgument(format!(
                    "time does not exist in America/New_York: \"{}\"",
                    text
                )))
            }
        };
        Ok(local.timestamp() - FXT_SHIFT)
    }

    /// Render a GMT instant as an FXT wall-clock string
    /// (`YYYY-MM-DD HH:MM:SS`)
    pub fn format_fxt(&self, time: AbsoluteTime) -> Result<String> {
        self.format_fxt_with(time, "%Y-%m-%d %H:%M:%S")
    }

    /// Render a GMT instant as an FXT wall-clock string with a custom
    /// chrono format.
    ///
    /// Formatting the instant directly in the New York zone could not
    /// represent wall-clock times inside a transition; instead the value
    /// is converted to an FXT timestamp and formatted as if it were GMT.
    pub fn format_fxt_with(&self, time: AbsoluteTime, format: &str) -> Result<String> {
        let fxt = self.to_fxt(time, ZoneId::Gmt)?;
        let dt = DateTime::<Utc>::from_timestamp(fxt, 0)
            .ok_or_else(|| FxtError::OutOfRange(format!("timestamp not representable: {}", fxt)))?;
        Ok(dt.format(format).to_string())
    }
}

fn parse_naive(text: &str) -> Result<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M") {
        return Ok(dt);
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt);
        }
    }
    Err(FxtError::InvalidArgument(format!(
        "unrecognized time literal: \"{}\"",
        text
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-01-15 12:00:00 UTC (EST in New York)
    const WINTER_2024: AbsoluteTime = 1_705_320_000;
    // 2024-07-01 00:00:00 UTC (EDT in New York)
    const SUMMER_2024: AbsoluteTime = 1_719_792_000;
    // 2024-03-10 07:00:00 UTC, EST -> EDT
    const SPRING_2024: AbsoluteTime = 1_710_054_000;

    fn clock() -> FxtClock {
        FxtClock::new().unwrap()
    }

    #[test]
    fn test_fxt_input_is_identity() {
        let clock = clock();
        for t in [0, -1, WINTER_2024, SUMMER_2024, i64::from(u32::MAX)] {
            assert_eq!(clock.to_fxt(t, ZoneId::Fxt).unwrap(), t);
        }
    }

    #[test]
    fn test_to_fxt_from_gmt() {
        let clock = clock();
        // winter: EST -5h, FXT = GMT + 2h
        assert_eq!(
            clock.to_fxt(WINTER_2024, ZoneId::Gmt).unwrap(),
            WINTER_2024 + 7_200
        );
        // summer: EDT -4h, FXT = GMT + 3h
        assert_eq!(
            clock.to_fxt(SUMMER_2024, ZoneId::Utc).unwrap(),
            SUMMER_2024 + 10_800
        );
    }

    #[test]
    fn test_to_fxt_from_civil_zone() {
        let clock = clock();
        let berlin = ZoneId::Civil(chrono_tz::Europe::Berlin);
        // Berlin +1h in January: gmt = time + 3600, then +2h to FXT
        assert_eq!(
            clock.to_fxt(WINTER_2024, berlin).unwrap(),
            WINTER_2024 + 3_600 + 7_200
        );
    }

    #[test]
    fn test_second_offset_sample_never_aborts_conversion() {
        let clock = clock();
        // Caracas switched to -04:30 at its first recorded transition,
        // 2007-12-09 03:00 UTC. Sampling the offset there and stepping
        // back to GMT lands before that zone's recorded history; the
        // conversion is still defined by the first sample plus the New
        // York offset at the GMT instant (EST, FXT = GMT + 2h).
        let caracas = ZoneId::Civil(chrono_tz::America::Caracas);
        let t = 1_197_167_400i64;
        let gmt = t - 16_200;
        assert_eq!(clock.to_fxt(t, caracas).unwrap(), gmt + 7_200);
    }

    #[test]
    fn test_to_fxt_before_history_fails() {
        let clock = clock();
        assert!(matches!(
            clock.to_fxt(0, ZoneId::Gmt),
            Err(FxtError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_offsets_straddling_a_transition_differ_by_one_hour() {
        let clock = clock();
        let before = clock.fxt_offset_from_gmt(SPRING_2024 - 1).unwrap();
        let after = clock.fxt_offset_from_gmt(SPRING_2024).unwrap();
        assert_eq!(before.offset, Some(7_200));
        assert_eq!(after.offset, Some(10_800));
        assert_eq!(
            after.offset.unwrap() - before.offset.unwrap(),
            3_600
        );
    }

    #[test]
    fn test_offset_query_before_recorded_history() {
        let clock = clock();
        let q = clock.fxt_offset_from_gmt(0).unwrap();
        assert_eq!(q.offset, None);
        assert_eq!(q.prev, None);
        // first New York transition after the epoch, offset already in
        // FXT terms (-4h + 7h)
        let next = q.next.unwrap();
        assert_eq!(next.instant, 9_961_200);
        assert_eq!(next.offset, Some(10_800));
    }

    #[test]
    fn test_offset_query_brackets_around_transition() {
        let clock = clock();
        let q = clock.fxt_offset_from_gmt(SPRING_2024 + 1).unwrap();
        let prev = q.prev.unwrap();
        assert_eq!(prev.instant, SPRING_2024);
        assert_eq!(prev.offset, Some(7_200));
        assert!(q.next.is_some());
    }

    #[test]
    fn test_parse_fxt() {
        let clock = clock();
        // 14:00 EST = 19:00 UTC, minus the 7h FXT shift
        assert_eq!(
            clock.parse_fxt("2024-01-15 14:00:00").unwrap(),
            WINTER_2024
        );
        assert_eq!(clock.parse_fxt("2024-01-15 14:00").unwrap(), WINTER_2024);
        // date-only literal is midnight
        assert_eq!(clock.parse_fxt("2024-07-04").unwrap(), 1_720_040_400);
    }

    #[test]
    fn test_parse_fxt_round_trips_through_format() {
        let clock = clock();
        for text in ["2024-01-15 14:00:00", "2024-07-04 00:00:00"] {
            let t = clock.parse_fxt(text).unwrap();
            assert_eq!(clock.format_fxt(t).unwrap(), text);
        }
    }

    #[test]
    fn test_parse_fxt_ambiguous_takes_earlier_mapping() {
        let clock = clock();
        // 01:30 on 2024-11-03 occurs twice in New York; the earlier
        // occurrence is still EDT: 05:30 UTC
        let t = clock.parse_fxt("2024-11-03 01:30:00").unwrap();
        assert_eq!(t, 1_730_611_800 - FXT_SHIFT);
    }

    #[test]
    fn test_parse_fxt_rejects_gap_and_garbage() {
        let clock = clock();
        assert!(matches!(
            clock.parse_fxt("2024-03-10 02:30:00"),
            Err(FxtError::InvalidArgument(_))
        ));
        assert!(matches!(
            clock.parse_fxt("next tuesday"),
            Err(FxtError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_inverse_shift_recovers_input() {
        let clock = clock();
        let ny = ZoneId::Civil(chrono_tz::America::New_York);
        // sample a week well clear of any DST boundary
        for i in 0..7 {
            let t = WINTER_2024 + i * 86_400;
            let fxt = clock.to_fxt(t, ZoneId::Gmt).unwrap();
            let ny_offset = clock.resolver().offset_at(t, ny).unwrap() as i64;
            assert_eq!(fxt - ny_offset - FXT_SHIFT, t);
        }
    }

    #[test]
    fn test_with_injected_resolver() {
        use crate::transitions::{TransitionRecord, TransitionTable};
        use std::sync::Arc;

        let table = TransitionTable::from_records(vec![TransitionRecord {
            instant: 0,
            offset_secs: 3_600,
        }])
        .unwrap();
        let resolver = ZoneOffsetResolver::new()
            .unwrap()
            .with_table(NEW_YORK, Arc::new(table));
        let clock = FxtClock::with_resolver(resolver);

        assert_eq!(
            clock.to_fxt(1_000, ZoneId::Gmt).unwrap(),
            1_000 + 3_600 + FXT_SHIFT
        );
    }

    #[test]
    fn test_format_fxt() {
        let clock = clock();
        assert_eq!(
            clock.format_fxt(WINTER_2024).unwrap(),
            "2024-01-15 14:00:00"
        );
        assert_eq!(
            clock
                .format_fxt_with(WINTER_2024, "%a, %d-%b-%Y %H:%M:%S")
                .unwrap(),
            "Mon, 15-Jan-2024 14:00:00"
        );
    }
}
