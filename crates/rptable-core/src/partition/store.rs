//! Partition table store
//!
//! The loader never owns the table it fills. It talks to a
//! [`PartitionStore`], which keeps the current partitions, the table base
//! offset and the selected flash size. [`PartitionTable`] is the plain
//! in-memory implementation.

use alloc::vec::Vec;

use super::{mb_to_bytes, total_size, Partition, DEFAULT_PARTITION_TABLE_OFFSET};

/// Destination for a loaded partition table
///
/// Implementations are only mutated after a load has fully validated, in
/// this order: clear, set table offset, add each partition, set flash size.
pub trait PartitionStore {
    /// Offset the partition table is currently stored at
    fn partition_table_base_offset(&self) -> u32;

    /// Remove all partitions
    fn clear_partitions(&mut self);

    /// Append a partition, returning its index in the table
    fn add_partition(&mut self, partition: Partition) -> usize;

    /// Move the partition table to a new offset
    fn set_partition_table_offset(&mut self, offset: u32);

    /// Select the flash chip size in megabytes
    fn set_flash_size(&mut self, megabytes: u32);
}

/// In-memory partition table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionTable {
    partitions: Vec<Partition>,
    base_offset: u32,
    flash_size_mb: Option<u32>,
}

impl PartitionTable {
    /// Create an empty table at the default offset
    pub fn new() -> Self {
        Self::with_base_offset(DEFAULT_PARTITION_TABLE_OFFSET)
    }

    /// Create an empty table stored at `base_offset`
    pub fn with_base_offset(base_offset: u32) -> Self {
        Self {
            partitions: Vec::new(),
            base_offset,
            flash_size_mb: None,
        }
    }

    /// Partitions in layout order
    pub fn partitions(&self) -> &[Partition] {
        &self.partitions
    }

    /// Offset of the partition table itself
    pub fn base_offset(&self) -> u32 {
        self.base_offset
    }

    /// Selected flash size in megabytes
    pub fn flash_size_mb(&self) -> Option<u32> {
        self.flash_size_mb
    }

    /// Find a partition by name
    pub fn find(&self, name: &str) -> Option<&Partition> {
        self.partitions.iter().find(|p| p.name == name)
    }

    /// Get the number of partitions
    pub fn len(&self) -> usize {
        self.partitions.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }

    /// Sum of all partition sizes in bytes
    pub fn total_size(&self) -> u64 {
        total_size(&self.partitions)
    }

    /// Bytes of the selected flash left after the highest partition end
    pub fn free_space(&self) -> Option<u64> {
        let capacity = mb_to_bytes(self.flash_size_mb?);
        let used = self.partitions.iter().map(Partition::end).max().unwrap_or(0);
        Some(capacity.saturating_sub(used))
    }
}

impl Default for PartitionTable {
    fn default() -> Self {
        Self::new()
    }
}

impl PartitionStore for PartitionTable {
    fn partition_table_base_offset(&self) -> u32 {
        self.base_offset
    }

    fn clear_partitions(&mut self) {
        self.partitions.clear();
    }

    fn add_partition(&mut self, partition: Partition) -> usize {
        self.partitions.push(partition);
        self.partitions.len() - 1
    }

    fn set_partition_table_offset(&mut self, offset: u32) {
        self.base_offset = offset;
    }

    fn set_flash_size(&mut self, megabytes: u32) {
        self.flash_size_mb = Some(megabytes);
    }
}
