//! Binary bar-history decoding
//!
//! History files are flat sequences of 24-byte little-endian records
//! (`time, open, high, low, close, ticks`, each an unsigned 32-bit field;
//! `time` is an FXT-based timestamp). Decoding is all-or-nothing: a length
//! that is not a multiple of the record size, or the first record that
//! violates the OHLC/tick invariants, aborts with an error and no partial
//! result.

use crate::error::{FxtError, Result};
use crate::types::{Bar, Tick, BAR_SIZE, TICK_SIZE};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::Path;

/// Decode a buffer of bar records, validating each one.
///
/// Returns the records in buffer order. The error for an invalid record
/// carries its zero-based index, the OHLC values, the tick count and the
/// record time GMT-rendered for diagnostics (the raw FXT-based value is
/// formatted as-is, no zone conversion is implied).
pub fn decode_bars(data: &[u8]) -> Result<Vec<Bar>> {
    if data.len() % BAR_SIZE != 0 {
        return Err(FxtError::MalformedLength {
            length: data.len(),
            record_size: BAR_SIZE,
        });
    }

    let mut bars = Vec::with_capacity(data.len() / BAR_SIZE);

    for (index, record) in data.chunks_exact(BAR_SIZE).enumerate() {
        let time = read_u32(record, 0);
        let bar = Bar {
            time: time as i64,
            open: read_u32(record, 4),
            high: read_u32(record, 8),
            low: read_u32(record, 12),
            close: read_u32(record, 16),
            ticks: read_u32(record, 20),
        };

        if !bar.is_valid() {
            return Err(FxtError::InvalidRecord {
                index,
                open: bar.open,
                high: bar.high,
                low: bar.low,
                close: bar.close,
                ticks: bar.ticks,
                time: gm_date(time),
            });
        }

        bars.push(bar);
    }

    Ok(bars)
}

/// Decode a buffer of 12-byte tick records (`time_delta_ms, bid, ask`).
///
/// Tick records carry no OHLC invariant; only the buffer length is
/// checked. See [`crate::types::DUKASCOPY_TICK_SIZE`] for the competing
/// vendor layout this function does not cover.
pub fn decode_ticks(data: &[u8]) -> Result<Vec<Tick>> {
    if data.len() % TICK_SIZE != 0 {
        return Err(FxtError::MalformedLength {
            length: data.len(),
            record_size: TICK_SIZE,
        });
    }

    Ok(data
        .chunks_exact(TICK_SIZE)
        .map(|record| Tick {
            time_delta_ms: read_u32(record, 0),
            bid: read_u32(record, 4),
            ask: read_u32(record, 8),
        })
        .collect())
}

/// Read and decode a bar-history file.
///
/// Byte reading is delegated to the filesystem; I/O errors propagate
/// unchanged.
pub fn read_bar_file<P: AsRef<Path>>(path: P) -> Result<Vec<Bar>> {
    let data = fs::read(path)?;
    decode_bars(&data)
}

/// Read and decode a compressed bar-history file.
///
/// Compressed histories are a future extension point; calling this is
/// always an error.
pub fn read_compressed_bar_file<P: AsRef<Path>>(_path: P) -> Result<Vec<Bar>> {
    Err(FxtError::Unimplemented("read_compressed_bar_file"))
}

fn read_u32(record: &[u8], offset: usize) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&record[offset..offset + 4]);
    u32::from_le_bytes(buf)
}

/// GMT rendering of a raw record timestamp for diagnostics
fn gm_date(time: u32) -> String {
    DateTime::<Utc>::from_timestamp(time as i64, 0)
        .map(|dt| dt.format("%a, %d-%b-%Y %H:%M:%S").to_string())
        .unwrap_or_else(|| time.to_string())
}
