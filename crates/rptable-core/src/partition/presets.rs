//! Built-in partition table presets
//!
//! Presets carry no offsets; applying one always goes through auto-layout.

use alloc::string::String;

use super::{PartitionRow, PartitionType};

/// One partition of a preset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetEntry {
    /// Partition name
    pub name: &'static str,
    /// Type tag (`app`, `data`, ...)
    pub kind: &'static str,
    /// Subtype tag
    pub subtype: &'static str,
    /// Size in bytes
    pub size: u32,
}

impl PresetEntry {
    const fn new(name: &'static str, kind: &'static str, subtype: &'static str, size: u32) -> Self {
        Self {
            name,
            kind,
            subtype,
            size,
        }
    }

    /// Convert to an auto-layout row
    pub fn to_row(&self, line: usize) -> PartitionRow {
        PartitionRow {
            line,
            name: String::from(self.name),
            kind: PartitionType::from_tag(self.kind),
            subtype: String::from(self.subtype),
            offset: None,
            size: self.size,
            flags: String::new(),
        }
    }
}

/// A named partition layout template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    /// Display name
    pub name: &'static str,
    /// Partitions in layout order
    pub partitions: &'static [PresetEntry],
}

impl Preset {
    /// Sum of all partition sizes in bytes
    pub fn total_size(&self) -> u64 {
        self.partitions.iter().map(|e| u64::from(e.size)).sum()
    }
}

static PRESETS: &[Preset] = &[
    Preset {
        name: "Empty (no partitions)",
        partitions: &[],
    },
    Preset {
        name: "OTA with SPIFFS",
        partitions: &[
            PresetEntry::new("nvs", "data", "nvs", 0x5000),
            PresetEntry::new("otadata", "data", "ota", 0x2000),
            PresetEntry::new("app0", "app", "ota_0", 0x140000),
            PresetEntry::new("app1", "app", "ota_1", 0x140000),
            PresetEntry::new("spiffs", "data", "spiffs", 0x160000),
            PresetEntry::new("coredump", "data", "coredump", 0x10000),
        ],
    },
    Preset {
        name: "OTA with FAT",
        partitions: &[
            PresetEntry::new("nvs", "data", "nvs", 0x5000),
            PresetEntry::new("otadata", "data", "ota", 0x2000),
            PresetEntry::new("app0", "app", "ota_0", 0x140000),
            PresetEntry::new("app1", "app", "ota_1", 0x140000),
            PresetEntry::new("fat", "data", "fat", 0x160000),
            PresetEntry::new("coredump", "data", "coredump", 0x10000),
        ],
    },
    Preset {
        name: "Single factory app (no OTA)",
        partitions: &[
            PresetEntry::new("nvs", "data", "nvs", 0x5000),
            PresetEntry::new("factory", "app", "factory", 0x3F0000),
        ],
    },
];

/// All built-in presets
pub fn presets() -> &'static [Preset] {
    PRESETS
}

/// Find a preset by name (case-insensitive)
pub fn find_preset(name: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}
