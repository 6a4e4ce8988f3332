//! # fxt-core
//!
//! Conversion between civil time zones and the synthetic "Forex Trading
//! Time" (FXT) zone, trading-day classification, and decoding of binary
//! bar-history records.
//!
//! FXT is the America/New_York wall clock shifted forward by a constant
//! 7 hours, so the trading day rolls over at 17:00 New York time and the
//! zone inherits New York's DST calendar without a transition table of
//! its own.
//!
//! ## Example
//!
//! ```rust
//! use fxt_core::prelude::*;
//!
//! let clock = std::sync::Arc::new(FxtClock::new()?);
//! let calendar = ForexCalendar::new(clock.clone());
//!
//! // 2024-01-15 12:00:00 UTC -> 14:00 FXT, a trading Monday
//! let fxt = clock.to_fxt(1_705_320_000, ZoneId::Gmt)?;
//! assert_eq!(fxt, 1_705_327_200);
//! assert!(calendar.is_trading_day(1_705_320_000, ZoneId::Gmt)?);
//! # Ok::<(), FxtError>(())
//! ```

pub mod bars;
pub mod calendar;
pub mod clock;
pub mod error;
pub mod resolver;
pub mod stats;
pub mod symbols;
pub mod transitions;
pub mod types;

pub mod prelude {
    //! Commonly used types and functions
    pub use crate::bars::{decode_bars, decode_ticks, read_bar_file, read_compressed_bar_file};
    pub use crate::calendar::ForexCalendar;
    pub use crate::clock::{FxtClock, FXT_SHIFT};
    pub use crate::error::{FxtError, Result};
    pub use crate::resolver::ZoneOffsetResolver;
    pub use crate::symbols::{Symbol, SymbolTable};
    pub use crate::transitions::{OffsetQuery, TransitionRecord, TransitionTable};
    pub use crate::types::*;
}
