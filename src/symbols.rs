//! Instrument metadata
//!
//! Static reference data about tradable symbols (decimal digits, pip and
//! point sizes, history provider, history start). The table is a read-only
//! configuration artifact loaded from JSON and injected into whichever
//! caller needs it; the core conversion and decoding paths only ever see
//! opaque symbol names.

use crate::error::Result;
use crate::types::AbsoluteTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Broad instrument class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstrumentType {
    Forex,
    Index,
    Metal,
}

/// Earliest available history per data kind, as GMT timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HistoryStart {
    /// Start of tick history, if any exists
    pub ticks: Option<AbsoluteTime>,
    /// Start of M1 bar history
    #[serde(rename = "M1")]
    pub m1: Option<AbsoluteTime>,
}

/// Static properties of one instrument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Symbol {
    pub name: String,
    pub long_name: String,
    #[serde(rename = "type")]
    pub instrument_type: InstrumentType,
    /// Number of decimal digits in a quoted price
    pub digits: u32,
    /// Pip size as a decimal fraction
    pub pip: f64,
    /// Point size (smallest quoted increment) as a decimal fraction
    pub point: f64,
    #[serde(default)]
    pub history_start: HistoryStart,
    pub provider: String,
}

impl Symbol {
    /// Decimal price of an integer point count
    pub fn price_from_points(&self, points: u32) -> f64 {
        points as f64 * self.point
    }
}

/// Read-only lookup table of instrument metadata, keyed by symbol name
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: BTreeMap<String, Symbol>,
}

impl SymbolTable {
    /// Build a table from a JSON array of symbol objects
    pub fn from_json_str(json: &str) -> Result<Self> {
        let list: Vec<Symbol> = serde_json::from_str(json)?;
        Ok(Self {
            symbols: list.into_iter().map(|s| (s.name.clone(), s)).collect(),
        })
    }

    /// Load a table from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Look up a symbol by name
    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    /// All symbols matching a predicate, in name order
    pub fn filter<P>(&self, predicate: P) -> Vec<&Symbol>
    where
        P: Fn(&Symbol) -> bool,
    {
        self.symbols.values().filter(|s| predicate(s)).collect()
    }

    /// Iterate all symbols in name order
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values()
    }

    /// Number of symbols in the table
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether the table holds no symbols
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
