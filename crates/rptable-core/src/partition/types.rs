//! Partition types
//!
//! Core types for partition tables that work in no_std environments.

use alloc::string::String;
use core::fmt;

/// Start of the app region; app partitions are aligned to it as well
pub const OFFSET_APP_TYPE: u32 = 0x10000;

/// Alignment of every non-app partition
pub const OFFSET_DATA_TYPE: u32 = 0x1000;

/// Space reserved in flash for the partition table itself
pub const PARTITION_TABLE_SIZE: u32 = 0x1000;

/// Where the partition table lives unless told otherwise
pub const DEFAULT_PARTITION_TABLE_OFFSET: u32 = 0x8000;

/// Longest partition name the on-flash entry can hold
pub const PARTITION_NAME_MAX_LEN: usize = 16;

/// Supported flash chip sizes in megabytes, ascending
pub const FLASH_SIZES_MB: &[u32] = &[1, 2, 4, 8, 16, 32, 64, 128];

/// Partition type
///
/// Only `app` and `data` change how a partition is laid out. Any other tag
/// is kept verbatim so tables using custom types still load.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PartitionType {
    /// Executable firmware image
    App,
    /// Anything that is not executed (nvs, ota data, filesystems, ...)
    Data,
    /// Unrecognized type tag
    Other(String),
}

impl PartitionType {
    /// Parse a type tag (case-sensitive)
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "app" => Self::App,
            "data" => Self::Data,
            other => Self::Other(String::from(other)),
        }
    }

    /// The tag as written in a partition table
    pub fn as_str(&self) -> &str {
        match self {
            Self::App => "app",
            Self::Data => "data",
            Self::Other(tag) => tag,
        }
    }

    /// Check if this is an app partition
    pub fn is_app(&self) -> bool {
        matches!(self, Self::App)
    }

    /// Required offset alignment for partitions of this type
    pub fn alignment(&self) -> u32 {
        if self.is_app() {
            OFFSET_APP_TYPE
        } else {
            OFFSET_DATA_TYPE
        }
    }
}

impl fmt::Display for PartitionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A resolved partition with a concrete offset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    /// Name of the partition
    pub name: String,
    /// Partition type
    pub kind: PartitionType,
    /// Subtype tag (e.g. `nvs`, `ota_0`), not checked against the type
    pub subtype: String,
    /// Size in bytes
    pub size: u32,
    /// Absolute offset in flash
    pub offset: u32,
    /// Opaque flags string
    pub flags: String,
    /// Whether the offset was given explicitly rather than auto-assigned
    ///
    /// Tools that regenerate the table keep fixed offsets where they are.
    pub fixed_offset: bool,
}

impl Partition {
    /// Create a new partition
    pub fn new(
        name: impl Into<String>,
        kind: PartitionType,
        subtype: impl Into<String>,
        size: u32,
        offset: u32,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            subtype: subtype.into(),
            size,
            offset,
            flags: String::new(),
            fixed_offset: false,
        }
    }

    /// Check if this is an app partition
    pub fn is_app(&self) -> bool {
        self.kind.is_app()
    }

    /// First byte after the partition
    pub fn end(&self) -> u64 {
        u64::from(self.offset) + u64::from(self.size)
    }

    /// Check if an address is within this partition
    pub fn contains(&self, addr: u32) -> bool {
        addr >= self.offset && u64::from(addr) < self.end()
    }
}

/// Ordered list of supported flash chip sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashSizeCatalog {
    sizes_mb: &'static [u32],
}

impl FlashSizeCatalog {
    /// Create a catalog from sizes in megabytes, which must be ascending
    pub const fn new(sizes_mb: &'static [u32]) -> Self {
        Self { sizes_mb }
    }

    /// All sizes in megabytes
    pub fn sizes_mb(&self) -> &'static [u32] {
        self.sizes_mb
    }

    /// Largest supported size in megabytes
    pub fn largest_mb(&self) -> Option<u32> {
        self.sizes_mb.last().copied()
    }

    /// Smallest size whose capacity holds `total` bytes
    pub fn select(&self, total: u64) -> Option<u32> {
        self.sizes_mb
            .iter()
            .copied()
            .find(|&mb| total <= mb_to_bytes(mb))
    }

    /// Check if a size is part of the catalog
    pub fn contains(&self, megabytes: u32) -> bool {
        self.sizes_mb.contains(&megabytes)
    }
}

impl Default for FlashSizeCatalog {
    fn default() -> Self {
        Self::new(FLASH_SIZES_MB)
    }
}

/// Convert megabytes to bytes
pub fn mb_to_bytes(megabytes: u32) -> u64 {
    u64::from(megabytes) * 1024 * 1024
}
