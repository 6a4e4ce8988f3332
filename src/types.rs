//! Core types and constants

use crate::error::FxtError;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Zone-less timestamp: seconds since the Unix epoch.
///
/// Zone semantics are applied only at the boundary of the conversion
/// functions in [`crate::clock`] and [`crate::resolver`].
pub type AbsoluteTime = i64;

/// Size of one history bar record in bytes
pub const BAR_SIZE: usize = 24;

/// Size of one tick record in bytes (hourly tick files)
pub const TICK_SIZE: usize = 12;

/// Tick record size used by Dukascopy raw feeds.
///
/// Conflicts with [`TICK_SIZE`]: one upstream definition documents three
/// 4-byte fields (12 bytes), another a 20-byte record. Neither is treated
/// as authoritative here; consumers of vendor tick files must pick the
/// constant matching their actual data samples.
pub const DUKASCOPY_TICK_SIZE: usize = 20;

/// Timestamp base of a conversion input
///
/// `Gmt` and `Utc` are offset-zero aliases. `Fxt` is the synthetic Forex
/// Trading Time zone (New York wall clock +7h, see [`crate::clock`]).
/// `Civil` covers any zone resolvable through the IANA database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZoneId {
    Gmt,
    Utc,
    Fxt,
    Civil(Tz),
}

impl Default for ZoneId {
    fn default() -> Self {
        ZoneId::Gmt
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoneId::Gmt => write!(f, "GMT"),
            ZoneId::Utc => write!(f, "UTC"),
            ZoneId::Fxt => write!(f, "FXT"),
            ZoneId::Civil(tz) => write!(f, "{}", tz.name()),
        }
    }
}

impl FromStr for ZoneId {
    type Err = FxtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GMT" => Ok(ZoneId::Gmt),
            "UTC" => Ok(ZoneId::Utc),
            "FXT" => Ok(ZoneId::Fxt),
            _ => s
                .parse::<Tz>()
                .map(ZoneId::Civil)
                .map_err(|_| FxtError::InvalidArgument(format!("unknown timezone id: \"{}\"", s))),
        }
    }
}

/// One decoded history bar
///
/// `time` is FXT-based (seconds since 1970-01-01 00:00 FXT), prices are
/// integer points. Constructed solely by [`crate::bars::decode_bars`] and
/// immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bar {
    pub time: AbsoluteTime,
    pub open: u32,
    pub high: u32,
    pub low: u32,
    pub close: u32,
    pub ticks: u32,
}

impl Bar {
    /// Check the structural record invariants: `low <= open <= high`,
    /// `low <= close <= high` and a non-zero tick count.
    pub fn is_valid(&self) -> bool {
        self.open <= self.high
            && self.open >= self.low
            && self.close <= self.high
            && self.close >= self.low
            && self.ticks > 0
    }

    /// Price range in points (high - low)
    pub fn range(&self) -> u32 {
        self.high - self.low
    }
}

/// One decoded tick record (12-byte layout)
///
/// `time_delta_ms` counts milliseconds since the start of the hour the
/// containing tick file covers. See [`DUKASCOPY_TICK_SIZE`] for the
/// competing vendor layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tick {
    pub time_delta_ms: u32,
    pub bid: u32,
    pub ask: u32,
}

/// Timeframe of a bar series, identified by the number of minutes per bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    M1,
    M5,
    M15,
    M30,
    H1,
    H4,
    D1,
    W1,
    MN1,
    Q1,
}

impl Period {
    /// Number of minutes covered by one bar of this period
    pub fn minutes(&self) -> u32 {
        match self {
            Period::M1 => 1,
            Period::M5 => 5,
            Period::M15 => 15,
            Period::M30 => 30,
            Period::H1 => 60,
            Period::H4 => 240,
            Period::D1 => 1_440,
            Period::W1 => 10_080,
            Period::MN1 => 43_200,
            Period::Q1 => 129_600,
        }
    }

    /// Resolve a period from its minute count
    pub fn from_minutes(minutes: u32) -> Option<Period> {
        match minutes {
            1 => Some(Period::M1),
            5 => Some(Period::M5),
            15 => Some(Period::M15),
            30 => Some(Period::M30),
            60 => Some(Period::H1),
            240 => Some(Period::H4),
            1_440 => Some(Period::D1),
            10_080 => Some(Period::W1),
            43_200 => Some(Period::MN1),
            129_600 => Some(Period::Q1),
            _ => None,
        }
    }

    /// Constant name, e.g. `PERIOD_H1`
    pub fn constant_name(&self) -> &'static str {
        match self {
            Period::M1 => "PERIOD_M1",
            Period::M5 => "PERIOD_M5",
            Period::M15 => "PERIOD_M15",
            Period::M30 => "PERIOD_M30",
            Period::H1 => "PERIOD_H1",
            Period::H4 => "PERIOD_H4",
            Period::D1 => "PERIOD_D1",
            Period::W1 => "PERIOD_W1",
            Period::MN1 => "PERIOD_MN1",
            Period::Q1 => "PERIOD_Q1",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Period::M1 => "M1",
            Period::M5 => "M5",
            Period::M15 => "M15",
            Period::M30 => "M30",
            Period::H1 => "H1",
            Period::H4 => "H4",
            Period::D1 => "D1",
            Period::W1 => "W1",
            Period::MN1 => "MN1",
            Period::Q1 => "Q1",
        };
        write!(f, "{}", s)
    }
}

/// MT4-style order operation types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationType {
    Buy,
    Sell,
    BuyLimit,
    SellLimit,
    BuyStop,
    SellStop,
    Balance,
    Credit,
}

impl OperationType {
    /// Numeric wire code of the operation type
    pub fn code(&self) -> u8 {
        match self {
            OperationType::Buy => 0,
            OperationType::Sell => 1,
            OperationType::BuyLimit => 2,
            OperationType::SellLimit => 3,
            OperationType::BuyStop => 4,
            OperationType::SellStop => 5,
            OperationType::Balance => 6,
            OperationType::Credit => 7,
        }
    }

    /// Resolve an operation type from its numeric code
    pub fn from_code(code: u8) -> Option<OperationType> {
        match code {
            0 => Some(OperationType::Buy),
            1 => Some(OperationType::Sell),
            2 => Some(OperationType::BuyLimit),
            3 => Some(OperationType::SellLimit),
            4 => Some(OperationType::BuyStop),
            5 => Some(OperationType::SellStop),
            6 => Some(OperationType::Balance),
            7 => Some(OperationType::Credit),
            _ => None,
        }
    }

    /// Human readable description
    pub fn description(&self) -> &'static str {
        match self {
            OperationType::Buy => "Buy",
            OperationType::Sell => "Sell",
            OperationType::BuyLimit => "Buy Limit",
            OperationType::SellLimit => "Sell Limit",
            OperationType::BuyStop => "Stop Buy",
            OperationType::SellStop => "Stop Sell",
            OperationType::Balance => "Balance",
            OperationType::Credit => "Credit",
        }
    }
}
