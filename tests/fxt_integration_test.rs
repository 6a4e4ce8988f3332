//! Integration tests for fxt-core

use fxt_core::prelude::*;
use std::io::Write;
use std::sync::Arc;

// 2024-03-10 07:00:00 UTC, EST -> EDT in New York
const SPRING_2024: AbsoluteTime = 1_710_054_000;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn encode_bar(time: u32, open: u32, high: u32, low: u32, close: u32, ticks: u32) -> Vec<u8> {
    let mut buf = Vec::with_capacity(BAR_SIZE);
    for field in [time, open, high, low, close, ticks] {
        buf.extend_from_slice(&field.to_le_bytes());
    }
    buf
}

#[test]
fn test_fxt_identity_law() {
    init_logging();
    let clock = FxtClock::new().unwrap();
    for t in [0i64, 1_000_000_000, 1_705_320_000, 4_000_000_000] {
        assert_eq!(clock.to_fxt(t, ZoneId::Fxt).unwrap(), t);
    }
}

#[test]
fn test_gmt_round_trip_outside_dst_window() {
    init_logging();
    let clock = FxtClock::new().unwrap();
    let ny = ZoneId::Civil(chrono_tz::America::New_York);

    // hourly samples over two weeks around (but not inside) the spring
    // transition
    for i in 0..(14 * 24) {
        let t = SPRING_2024 - 7 * 86_400 + i * 3_600;
        if t == SPRING_2024 {
            continue;
        }
        let fxt = clock.to_fxt(t, ZoneId::Gmt).unwrap();
        let ny_offset = clock.resolver().offset_at(t, ny).unwrap() as i64;
        assert_eq!(fxt - ny_offset - FXT_SHIFT, t, "t = {}", t);
    }
}

#[test]
fn test_fxt_offsets_across_dst_transition() {
    init_logging();
    let clock = FxtClock::new().unwrap();

    let before = clock.fxt_offset_from_gmt(SPRING_2024 - 1).unwrap();
    let after = clock.fxt_offset_from_gmt(SPRING_2024).unwrap();
    assert_eq!(before.offset, Some(7_200));
    assert_eq!(after.offset, Some(10_800));

    // the bracket around the boundary names the transition itself
    let next = before.next.unwrap();
    assert_eq!(next.instant, SPRING_2024);
    assert_eq!(next.offset, Some(10_800));
    let prev = after.prev.unwrap();
    assert_eq!(prev.instant, SPRING_2024);
    assert_eq!(prev.offset, Some(7_200));
}

#[test]
fn test_offset_query_before_recorded_history() {
    init_logging();
    let clock = FxtClock::new().unwrap();
    let q = clock.fxt_offset_from_gmt(0).unwrap();
    assert_eq!(q.offset, None);
    assert_eq!(q.prev, None);
    assert!(q.next.is_some());
}

#[test]
fn test_trading_week_classification() {
    init_logging();
    let clock = Arc::new(FxtClock::new().unwrap());
    let calendar = ForexCalendar::new(clock);

    // Friday 2024-01-05 12:00 UTC through the following Monday
    let friday_noon = 1_704_456_000i64;
    assert!(calendar.is_trading_day(friday_noon, ZoneId::Gmt).unwrap());
    // Saturday and Sunday noon
    assert!(calendar.is_weekend(friday_noon + 86_400, ZoneId::Gmt).unwrap());
    assert!(calendar.is_weekend(friday_noon + 2 * 86_400, ZoneId::Gmt).unwrap());
    // Monday noon
    assert!(calendar.is_trading_day(friday_noon + 3 * 86_400, ZoneId::Gmt).unwrap());

    // holidays beat weekdays: 2024-12-25 falls on a Wednesday
    let christmas_noon = 1_735_128_000i64;
    assert!(!calendar.is_trading_day(christmas_noon, ZoneId::Gmt).unwrap());
    assert!(calendar.is_holiday(christmas_noon, ZoneId::Gmt).unwrap());
    // leap day is an ordinary trading day
    assert!(calendar.is_trading_day(1_709_208_000, ZoneId::Gmt).unwrap());
}

#[test]
fn test_decode_bar_file_and_classify() {
    init_logging();
    let clock = Arc::new(FxtClock::new().unwrap());
    let calendar = ForexCalendar::new(clock.clone());

    // one trading hour of M15 bars starting 2024-01-15 14:00 FXT
    let start_gmt = clock.parse_fxt("2024-01-15 14:00:00").unwrap();
    let base = clock.to_fxt(start_gmt, ZoneId::Gmt).unwrap() as u32;
    assert_eq!(base, 1_705_327_200);
    let mut data = Vec::new();
    for i in 0..4u32 {
        data.extend(encode_bar(base + i * 900, 108_900 + i, 108_950 + i, 108_850 + i, 108_930 + i, 120 + i));
    }

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&data).unwrap();

    let bars = read_bar_file(file.path()).unwrap();
    assert_eq!(bars.len(), 4);
    assert_eq!(bars[0].time, base as i64);
    assert!(bars.iter().all(|b| b.is_valid()));

    // record times are FXT-based and classify directly as FXT input
    for bar in &bars {
        assert!(calendar.is_trading_day(bar.time, ZoneId::Fxt).unwrap());
    }
}

#[test]
fn test_decode_failures_are_atomic() {
    init_logging();

    // malformed length, regardless of content
    assert!(matches!(
        decode_bars(&[0u8; 36]),
        Err(FxtError::MalformedLength { length: 36, .. })
    ));

    // a broken record in the middle yields no partial result
    let mut data = encode_bar(0, 100, 110, 90, 105, 5);
    data.extend(encode_bar(900, 100, 110, 90, 105, 0));
    data.extend(encode_bar(1_800, 100, 110, 90, 105, 5));
    assert!(matches!(
        decode_bars(&data),
        Err(FxtError::InvalidRecord { index: 1, .. })
    ));
}

#[test]
fn test_symbol_metadata_round_trip() {
    init_logging();
    let json = r#"[{
        "name": "EURUSD",
        "longName": "Euro vs US Dollar",
        "type": "forex",
        "digits": 5,
        "pip": 0.0001,
        "point": 0.00001,
        "historyStart": { "ticks": 1052082000, "M1": 1052006400 },
        "provider": "dukascopy"
    }]"#;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();

    let table = SymbolTable::from_file(file.path()).unwrap();
    let eurusd = table.get("EURUSD").unwrap();
    assert_eq!(eurusd.digits, 5);

    // a decoded close of 108933 points is a 1.08933 quote
    let price = eurusd.price_from_points(108_933);
    assert!((price - 1.08933).abs() < 1e-9);
}
