//! Region layout export
//!
//! Turns a resolved partition table into a flash region layout so region
//! based tools can read, write or erase single partitions:
//!
//! ```toml
//! [layout]
//! name = "partitions.csv"
//! chip_size = "4 MiB"
//!
//! [[region]]
//! name = "partition-table"
//! start = 32768
//! end = 36863
//! readonly = false
//! dangerous = true
//!
//! [[region]]
//! name = "nvs"
//! start = 36864
//! end = 57343
//! readonly = false
//! dangerous = false
//! ```
//!
//! Region ends are inclusive.

use std::format;
use std::string::String;
use std::vec::Vec;

use serde::{Deserialize, Serialize};

use super::{Partition, PartitionTable, PARTITION_TABLE_SIZE};

/// Name of the region covering the partition table itself
pub const TABLE_REGION_NAME: &str = "partition-table";

/// Flag marking a partition read-only
const READONLY_FLAG: &str = "readonly";

/// Layout metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutMeta {
    /// Optional layout name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Chip size, e.g. `"4 MiB"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chip_size: Option<String>,
}

/// One flash region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionEntry {
    /// Region name
    pub name: String,
    /// Start address (inclusive)
    pub start: u32,
    /// End address (inclusive)
    pub end: u32,
    /// Whether writes to this region should be refused
    #[serde(default)]
    pub readonly: bool,
    /// Whether modifying this region deserves a warning
    #[serde(default)]
    pub dangerous: bool,
}

impl RegionEntry {
    /// Region covering a partition, `None` for empty partitions
    pub fn from_partition(partition: &Partition) -> Option<Self> {
        if partition.size == 0 {
            return None;
        }
        Some(Self {
            name: partition.name.clone(),
            start: partition.offset,
            end: partition.offset + (partition.size - 1),
            readonly: partition.flags.split(':').any(|f| f == READONLY_FLAG),
            dangerous: false,
        })
    }
}

/// A flash region layout derived from a partition table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionLayout {
    /// Layout metadata
    #[serde(default)]
    pub layout: LayoutMeta,
    /// Regions in flash order
    #[serde(rename = "region", default)]
    pub regions: Vec<RegionEntry>,
}

impl RegionLayout {
    /// Build a layout from a loaded partition table
    ///
    /// The partition table gets a region of its own unless a partition
    /// already occupies its sector, as auto-layout from the base offset does.
    /// Regions never overlap.
    pub fn from_table(table: &PartitionTable, name: Option<&str>) -> Self {
        let mut regions = Vec::with_capacity(table.len() + 1);
        let start = table.base_offset();
        let end = start.saturating_add(PARTITION_TABLE_SIZE - 1);
        let occupied = table
            .partitions()
            .iter()
            .any(|p| p.size > 0 && p.offset <= end && p.end() > u64::from(start));
        if occupied {
            log::debug!(
                "Partition table sector 0x{:X} holds a partition, no separate region",
                start
            );
        } else {
            regions.push(RegionEntry {
                name: String::from(TABLE_REGION_NAME),
                start,
                end,
                readonly: false,
                dangerous: true,
            });
        }
        regions.extend(table.partitions().iter().filter_map(RegionEntry::from_partition));
        regions.sort_by_key(|r| r.start);

        Self {
            layout: LayoutMeta {
                name: name.map(String::from),
                chip_size: table.flash_size_mb().map(|mb| format!("{} MiB", mb)),
            },
            regions,
        }
    }

    /// Render as TOML
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Parse from TOML
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
