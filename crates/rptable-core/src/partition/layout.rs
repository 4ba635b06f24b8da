//! Offset resolution and layout derivation
//!
//! Rows are placed in input order with a running cursor. An explicit
//! offset is trusted after the base/alignment checks and moves the cursor
//! to the end of that partition; a missing offset packs the partition at
//! the next aligned address after the cursor.

use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::vec::Vec;

use super::{
    Partition, PartitionRow, OFFSET_APP_TYPE, OFFSET_DATA_TYPE, PARTITION_TABLE_SIZE,
};
use crate::error::{DataFault, LoadError, Result};

/// End of the 32-bit flash address space
const ADDRESS_SPACE_END: u64 = 1 << 32;

/// Round `value` up to a multiple of `alignment`
pub fn align_up(value: u64, alignment: u32) -> u64 {
    let alignment = u64::from(alignment);
    value.div_ceil(alignment) * alignment
}

/// Round `value` down to a multiple of `alignment`
pub fn align_down(value: u32, alignment: u32) -> u32 {
    value - value % alignment
}

/// Places rows one at a time, carrying the auto-layout cursor
pub(crate) struct OffsetResolver {
    base: u32,
    next_offset: u64,
    names: BTreeSet<String>,
}

impl OffsetResolver {
    /// Start a new layout at the table base offset
    pub(crate) fn new(base: u32) -> Self {
        Self {
            base,
            next_offset: u64::from(base),
            names: BTreeSet::new(),
        }
    }

    /// Resolve the offset of the next row
    pub(crate) fn place(&mut self, row: PartitionRow) -> Result<Partition> {
        let line = row.line;
        if self.names.contains(&row.name) {
            return Err(LoadError::DuplicateName {
                line,
                name: row.name,
            });
        }

        let alignment = row.kind.alignment();
        let fixed_offset = row.offset.is_some();

        let offset = match row.offset {
            Some(offset) => {
                if offset < self.base {
                    return Err(LoadError::InvalidOffset {
                        line,
                        base: self.base,
                    });
                }
                if offset % alignment != 0 {
                    return Err(LoadError::InvalidOffsetAlignment { line, alignment });
                }
                if row.kind.is_app()
                    && (offset < OFFSET_APP_TYPE || offset % OFFSET_APP_TYPE != 0)
                {
                    return Err(LoadError::InvalidAppOffset { line });
                }
                self.next_offset = u64::from(offset) + u64::from(row.size);
                offset
            }
            None => {
                let mut cursor = self.next_offset;
                if row.kind.is_app() {
                    cursor = cursor.max(u64::from(OFFSET_APP_TYPE));
                }
                cursor = cursor.max(u64::from(self.base));
                cursor = align_up(cursor, alignment);

                let offset = u32::try_from(cursor).map_err(|_| LoadError::InvalidData {
                    line,
                    fault: DataFault::OutOfRange,
                })?;
                self.next_offset = cursor + u64::from(row.size);
                offset
            }
        };

        if self.next_offset > ADDRESS_SPACE_END {
            return Err(LoadError::InvalidData {
                line,
                fault: DataFault::OutOfRange,
            });
        }

        log::debug!(
            "Placed '{}' at {:#x}, size {:#x} ({})",
            row.name,
            offset,
            row.size,
            if fixed_offset { "fixed" } else { "auto" }
        );

        self.names.insert(row.name.clone());
        Ok(Partition {
            name: row.name,
            kind: row.kind,
            subtype: row.subtype,
            size: row.size,
            offset,
            flags: row.flags,
            fixed_offset,
        })
    }
}

/// Resolve offsets for a list of rows laid out after `base`
///
/// Stops at the first row that fails validation.
pub fn resolve_offsets(
    rows: impl IntoIterator<Item = PartitionRow>,
    base: u32,
) -> Result<Vec<Partition>> {
    let mut resolver = OffsetResolver::new(base);
    rows.into_iter().map(|row| resolver.place(row)).collect()
}

/// Suggest where the partition table itself should be stored
///
/// With app partitions present, the table goes half an app alignment before
/// the first app. Otherwise it goes directly before the lowest partition.
/// The result never drops below the data alignment. Returns `None` for an
/// empty list.
pub fn suggest_table_offset(partitions: &[Partition]) -> Option<u32> {
    let min_offset = partitions.iter().map(|p| p.offset).min()?;
    let min_app = partitions
        .iter()
        .filter(|p| p.is_app())
        .map(|p| p.offset)
        .min();

    let candidate = match min_app {
        Some(app) if app >= OFFSET_APP_TYPE => app - OFFSET_APP_TYPE / 2,
        _ => min_offset.saturating_sub(PARTITION_TABLE_SIZE),
    };

    Some(align_down(candidate, OFFSET_DATA_TYPE).max(OFFSET_DATA_TYPE))
}

/// Sum of all partition sizes in bytes
pub fn total_size(partitions: &[Partition]) -> u64 {
    partitions.iter().map(|p| u64::from(p.size)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::PartitionType;

    fn row(line: usize, name: &str, kind: &str, offset: Option<u32>, size: u32) -> PartitionRow {
        PartitionRow {
            line,
            name: String::from(name),
            kind: PartitionType::from_tag(kind),
            subtype: String::from("x"),
            offset,
            size,
            flags: String::new(),
        }
    }

    #[test]
    fn test_align() {
        assert_eq!(align_up(0x8000, 0x1000), 0x8000);
        assert_eq!(align_up(0x8001, 0x1000), 0x9000);
        assert_eq!(align_up(0xE000, 0x10000), 0x10000);
        assert_eq!(align_up(0, 0x10000), 0);
        assert_eq!(align_down(0x8FFF, 0x1000), 0x8000);
        assert_eq!(align_down(0x8000, 0x1000), 0x8000);
    }

    #[test]
    fn test_explicit_offsets_preserved() {
        let parts = resolve_offsets(
            [
                row(2, "nvs", "data", Some(0x9000), 0x5000),
                row(3, "app0", "app", Some(0x10000), 0x3F0000),
            ],
            0x8000,
        )
        .unwrap();
        assert_eq!(parts[0].offset, 0x9000);
        assert_eq!(parts[1].offset, 0x10000);
        assert!(parts.iter().all(|p| p.fixed_offset));
    }

    #[test]
    fn test_auto_layout() {
        let parts = resolve_offsets(
            [
                row(2, "nvs", "data", None, 0x5000),
                row(3, "otadata", "data", None, 0x2000),
                row(4, "phy", "data", None, 0x1000),
                row(5, "app0", "app", None, 0x140000),
                row(6, "app1", "app", None, 0x140000),
                row(7, "spiffs", "data", None, 0x1800),
                row(8, "coredump", "data", None, 0x10000),
            ],
            0x8000,
        )
        .unwrap();
        let offsets: Vec<u32> = parts.iter().map(|p| p.offset).collect();
        assert_eq!(
            offsets,
            [0x8000, 0xD000, 0xF000, 0x10000, 0x150000, 0x290000, 0x292000]
        );
        assert!(parts.iter().all(|p| !p.fixed_offset));
        for p in &parts {
            assert_eq!(p.offset % p.kind.alignment(), 0);
        }
    }

    #[test]
    fn test_explicit_offset_resets_cursor() {
        // Auto-layout resumes after the last explicit partition, not after
        // the highest one seen.
        let parts = resolve_offsets(
            [
                row(2, "big", "data", Some(0x100000), 0x10000),
                row(3, "low", "data", Some(0x9000), 0x1000),
                row(4, "next", "data", None, 0x1000),
            ],
            0x8000,
        )
        .unwrap();
        assert_eq!(parts[2].offset, 0xA000);
    }

    #[test]
    fn test_app_auto_layout_respects_app_region() {
        let parts = resolve_offsets([row(2, "factory", "app", None, 0x1000)], 0x8000).unwrap();
        assert_eq!(parts[0].offset, OFFSET_APP_TYPE);

        let parts = resolve_offsets([row(2, "factory", "app", None, 0x1000)], 0x12000).unwrap();
        assert_eq!(parts[0].offset, 0x20000);
    }

    #[test]
    fn test_offset_below_base() {
        let err = resolve_offsets([row(4, "nvs", "data", Some(0x7000), 0x1000)], 0x8000);
        assert_eq!(
            err,
            Err(LoadError::InvalidOffset {
                line: 4,
                base: 0x8000
            })
        );

        // Misaligned and below base still reports the base violation
        let err = resolve_offsets([row(4, "nvs", "data", Some(0x7800), 0x1000)], 0x8000);
        assert!(matches!(err, Err(LoadError::InvalidOffset { .. })));
    }

    #[test]
    fn test_offset_alignment() {
        let err = resolve_offsets([row(2, "nvs", "data", Some(0x9800), 0x1000)], 0x8000);
        assert_eq!(
            err,
            Err(LoadError::InvalidOffsetAlignment {
                line: 2,
                alignment: OFFSET_DATA_TYPE
            })
        );

        let err = resolve_offsets([row(2, "app0", "app", Some(0x18000), 0x1000)], 0x8000);
        assert_eq!(
            err,
            Err(LoadError::InvalidOffsetAlignment {
                line: 2,
                alignment: OFFSET_APP_TYPE
            })
        );
    }

    #[test]
    fn test_app_offset_below_app_region() {
        // 0x0 is app-aligned but below the app region
        let err = resolve_offsets([row(2, "app0", "app", Some(0x0), 0x1000)], 0x0);
        assert_eq!(err, Err(LoadError::InvalidAppOffset { line: 2 }));
    }

    #[test]
    fn test_duplicate_name() {
        let err = resolve_offsets(
            [
                row(2, "nvs", "data", None, 0x1000),
                row(3, "nvs", "data", None, 0x1000),
            ],
            0x8000,
        );
        assert_eq!(
            err,
            Err(LoadError::DuplicateName {
                line: 3,
                name: String::from("nvs")
            })
        );
    }

    #[test]
    fn test_out_of_range() {
        let err = resolve_offsets(
            [row(2, "huge", "data", Some(0xFFFF_0000), 0x20000)],
            0x8000,
        );
        assert_eq!(
            err,
            Err(LoadError::InvalidData {
                line: 2,
                fault: DataFault::OutOfRange
            })
        );

        // Ending exactly at the top of the address space is fine
        let parts =
            resolve_offsets([row(2, "top", "data", Some(0xFFFF_0000), 0x10000)], 0x8000).unwrap();
        assert_eq!(parts[0].end(), ADDRESS_SPACE_END);
    }

    #[test]
    fn test_suggest_table_offset_with_app() {
        let parts = resolve_offsets(
            [
                row(2, "nvs", "data", Some(0x9000), 0x5000),
                row(3, "app0", "app", Some(0x10000), 0x3F0000),
            ],
            0x8000,
        )
        .unwrap();
        assert_eq!(suggest_table_offset(&parts), Some(0x8000));

        let parts = resolve_offsets([row(2, "app0", "app", Some(0x20000), 0x1000)], 0x8000).unwrap();
        assert_eq!(suggest_table_offset(&parts), Some(0x18000));
    }

    #[test]
    fn test_suggest_table_offset_without_app() {
        let parts = resolve_offsets([row(2, "nvs", "data", Some(0x9000), 0x5000)], 0x8000).unwrap();
        assert_eq!(suggest_table_offset(&parts), Some(0x8000));

        // Never below the data alignment
        let parts = resolve_offsets([row(2, "nvs", "data", Some(0x1000), 0x5000)], 0x0).unwrap();
        assert_eq!(suggest_table_offset(&parts), Some(OFFSET_DATA_TYPE));

        assert_eq!(suggest_table_offset(&[]), None);
    }

    #[test]
    fn test_total_size() {
        let parts = resolve_offsets(
            [
                row(2, "nvs", "data", None, 0x5000),
                row(3, "app0", "app", None, 0x3F0000),
            ],
            0x8000,
        )
        .unwrap();
        assert_eq!(total_size(&parts), 0x3F5000);
        assert_eq!(total_size(&[]), 0);
    }
}
