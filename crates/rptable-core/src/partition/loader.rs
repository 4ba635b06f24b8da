//! Loading partition tables into a store
//!
//! Both entry points share one pipeline: resolve every partition, suggest
//! the table offset, pick a flash size, and only then touch the store. Any
//! error leaves the store exactly as it was.

use alloc::vec::Vec;

use super::csv::{parse_row, split_rows};
use super::layout::{resolve_offsets, suggest_table_offset, total_size, OffsetResolver};
use super::{FlashSizeCatalog, Partition, PartitionStore, Preset};
use crate::error::{LoadError, Result};

/// Options for loading a partition table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Use this flash size (MiB) instead of picking one from the catalog.
    /// `Some(0)` counts as unset.
    pub force_flash_size: Option<u32>,
    /// Flash sizes to pick from
    pub catalog: FlashSizeCatalog,
}

impl LoadOptions {
    /// Options forcing a specific flash size
    pub fn with_flash_size(megabytes: u32) -> Self {
        Self {
            force_flash_size: Some(megabytes),
            ..Self::default()
        }
    }
}

/// What a successful load committed to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    /// New partition table offset
    pub table_offset: u32,
    /// Selected flash size in MiB
    pub flash_size_mb: u32,
    /// Sum of all partition sizes in bytes
    pub total_size: u64,
    /// Number of partitions
    pub count: usize,
}

/// Load a CSV partition table into `store`
///
/// Offsets are checked against, and auto-layout starts at, the store's
/// current base offset. On success the store holds the parsed partitions,
/// the suggested table offset and the selected flash size.
pub fn load_partitions_from_csv<S: PartitionStore + ?Sized>(
    csv: &str,
    store: &mut S,
    options: &LoadOptions,
) -> Result<LoadSummary> {
    let base = store.partition_table_base_offset();
    let rows = split_rows(csv)?;

    let mut resolver = OffsetResolver::new(base);
    let partitions = rows
        .iter()
        .map(|(line, row)| parse_row(*line, row).and_then(|row| resolver.place(row)))
        .collect::<Result<Vec<_>>>()?;

    let table_offset = suggest_table_offset(&partitions).unwrap_or(base);
    commit(store, partitions, table_offset, options)
}

/// Apply a preset to `store` using auto-layout for every partition
///
/// An empty preset clears the partitions and keeps the table where it is.
pub fn apply_preset<S: PartitionStore + ?Sized>(
    preset: &Preset,
    store: &mut S,
    options: &LoadOptions,
) -> Result<LoadSummary> {
    let base = store.partition_table_base_offset();
    let rows = preset
        .partitions
        .iter()
        .enumerate()
        .map(|(i, entry)| entry.to_row(i + 1));
    let partitions = resolve_offsets(rows, base)?;

    let table_offset = suggest_table_offset(&partitions).unwrap_or(base);
    commit(store, partitions, table_offset, options)
}

fn select_flash_size(total: u64, options: &LoadOptions) -> Result<u32> {
    if let Some(forced) = options.force_flash_size.filter(|&mb| mb != 0) {
        return Ok(forced);
    }
    options
        .catalog
        .select(total)
        .ok_or(LoadError::FlashSizeExceeded {
            total,
            largest_mb: options.catalog.largest_mb().unwrap_or(0),
        })
}

fn commit<S: PartitionStore + ?Sized>(
    store: &mut S,
    partitions: Vec<Partition>,
    table_offset: u32,
    options: &LoadOptions,
) -> Result<LoadSummary> {
    let total = total_size(&partitions);
    let flash_size_mb = select_flash_size(total, options)?;
    let count = partitions.len();

    store.clear_partitions();
    store.set_partition_table_offset(table_offset);
    for partition in partitions {
        store.add_partition(partition);
    }
    store.set_flash_size(flash_size_mb);

    log::debug!(
        "Loaded {} partitions ({} bytes), table at {:#x}, flash {} MiB",
        count,
        total,
        table_offset,
        flash_size_mb
    );

    Ok(LoadSummary {
        table_offset,
        flash_size_mb,
        total_size: total,
        count,
    })
}
