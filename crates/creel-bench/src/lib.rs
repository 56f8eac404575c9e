//! Shared setup helpers for the creel benchmarks.

#![deny(missing_docs)]
#![forbid(unsafe_code)]

use creel::{Buffer, Registry, Table};

/// Build a buffer holding `count` sequential u64 values.
pub fn seeded_buffer(count: usize) -> Buffer<u64> {
    let mut buffer = Buffer::with_capacity(count).expect("bench allocation");
    for v in 0..count as u64 {
        buffer.push_back(v).expect("bench push");
    }
    buffer
}

/// Build a table with `count` slots holding `count / 2` entries.
pub fn seeded_table(count: usize) -> Table<u64> {
    let mut table = Table::with_capacity(count).expect("bench allocation");
    for key in 0..(count / 2) as u32 {
        table.insert(key, key as u64).expect("bench insert");
    }
    table
}

/// Build a registry holding `count` live identifiers.
pub fn seeded_registry(count: usize) -> Registry<u64> {
    let mut registry = Registry::with_capacity(count).expect("bench allocation");
    for v in 0..count as u64 {
        registry.push(v).expect("bench push");
    }
    registry
}
