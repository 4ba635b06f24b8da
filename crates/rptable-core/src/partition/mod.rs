//! Partition table support
//!
//! This module turns partition table descriptions into resolved partitions
//! with concrete flash offsets. A description can be:
//!
//! - Parsed from CSV text (`# Name,Type,SubType,Offset,Size,Flags`)
//! - Taken from the built-in preset catalog
//!
//! # Loading
//!
//! Loading validates every row, assigns offsets to rows that omit them,
//! suggests where the table itself should sit, picks a flash size and only
//! then commits the result into a [`PartitionStore`]:
//!
//! ```ignore
//! let mut table = PartitionTable::new();
//! load_partitions_from_csv(&text, &mut table, &LoadOptions::default())?;
//! for p in table.partitions() {
//!     println!("{} @ {:#x}", p.name, p.offset);
//! }
//! ```

mod csv;
mod layout;
mod loader;
mod presets;
mod store;
mod types;

#[cfg(feature = "std")]
mod region;

pub use csv::{is_header_line, parse_offset, parse_row, parse_size, split_rows, PartitionRow};
pub use layout::{align_down, align_up, resolve_offsets, suggest_table_offset, total_size};
pub use loader::{apply_preset, load_partitions_from_csv, LoadOptions, LoadSummary};
pub use presets::{find_preset, presets, Preset, PresetEntry};
pub use store::{PartitionStore, PartitionTable};
pub use types::*;

#[cfg(feature = "std")]
pub use region::{LayoutMeta, RegionEntry, RegionLayout, TABLE_REGION_NAME};
