//! Zone offset resolution
//!
//! Maps (instant, zone) pairs to UTC offsets. GMT and UTC are fixed at
//! zero; civil zones resolve through their [`TransitionTable`], built on
//! first use and cached for the lifetime of the resolver. All zone context
//! is passed explicitly; nothing here reads or mutates ambient process
//! state.

use crate::error::{FxtError, Result};
use crate::transitions::{OffsetQuery, TransitionTable};
use crate::types::{AbsoluteTime, ZoneId};
use chrono_tz::Tz;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

const NEW_YORK: Tz = chrono_tz::America::New_York;

/// Resolves UTC offsets for the supported zone identifiers
#[derive(Debug)]
pub struct ZoneOffsetResolver {
    /// Per-zone transition tables, populated under the write lock so
    /// concurrent first callers cannot observe a half-built table
    tables: RwLock<HashMap<Tz, Arc<TransitionTable>>>,
}

impl ZoneOffsetResolver {
    /// Create a resolver with the New York table loaded up front.
    ///
    /// Fails fast with a configuration error when the timezone database
    /// cannot supply the table; this precondition is not recovered.
    pub fn new() -> Result<Self> {
        let resolver = Self {
            tables: RwLock::new(HashMap::new()),
        };
        let ny = TransitionTable::new_york()?;
        resolver.tables.write().unwrap().insert(NEW_YORK, ny);
        Ok(resolver)
    }

    /// Inject an explicit table for a zone, replacing any cached one
    pub fn with_table(self, tz: Tz, table: Arc<TransitionTable>) -> Self {
        self.tables.write().unwrap().insert(tz, table);
        self
    }

    /// Transition table for a civil zone, building and caching it on
    /// first use
    pub fn table_for(&self, tz: Tz) -> Result<Arc<TransitionTable>> {
        if let Some(table) = self.tables.read().unwrap().get(&tz) {
            return Ok(Arc::clone(table));
        }

        let table = if tz == NEW_YORK {
            TransitionTable::new_york()?
        } else {
            Arc::new(TransitionTable::for_zone(tz)?)
        };

        let mut tables = self.tables.write().unwrap();
        Ok(Arc::clone(tables.entry(tz).or_insert(table)))
    }

    /// UTC offset in effect at `instant` for `zone`, in seconds.
    ///
    /// GMT and UTC always resolve to zero. A civil-zone instant preceding
    /// the recorded transition history is an out-of-range error, never a
    /// silent zero. FXT offsets are served by
    /// [`crate::clock::FxtClock::fxt_offset_from_gmt`].
    pub fn offset_at(&self, instant: AbsoluteTime, zone: ZoneId) -> Result<i32> {
        match zone {
            ZoneId::Gmt | ZoneId::Utc => Ok(0),
            ZoneId::Fxt => Err(FxtError::InvalidArgument(
                "FXT offsets are resolved through FxtClock::fxt_offset_from_gmt".to_string(),
            )),
            ZoneId::Civil(tz) => {
                self.table_for(tz)?.offset_at(instant).ok_or_else(|| {
                    FxtError::OutOfRange(format!(
                        "timestamp {} precedes the recorded transition history of {}",
                        instant,
                        tz.name()
                    ))
                })
            }
        }
    }

    /// Offset plus bracketing transitions for `zone` at `instant`.
    ///
    /// Unlike [`offset_at`](Self::offset_at) an instant outside recorded
    /// history is not an error here: the unknown sides of the bracket are
    /// reported as `None`.
    pub fn offset_query(&self, instant: AbsoluteTime, zone: ZoneId) -> Result<OffsetQuery> {
        match zone {
            ZoneId::Gmt | ZoneId::Utc => Ok(OffsetQuery {
                offset: Some(0),
                prev: None,
                next: None,
            }),
            ZoneId::Fxt => Err(FxtError::InvalidArgument(
                "FXT offsets are resolved through FxtClock::fxt_offset_from_gmt".to_string(),
            )),
            ZoneId::Civil(tz) => Ok(self.table_for(tz)?.query(instant)),
        }
    }
}
