//! Error types for rptable-core
//!
//! Every failure a partition table load can hit is reported through
//! [`LoadError`]. Each variant renders to a short title plus an explanatory
//! sentence, which is the shape front ends show to the user.

use alloc::format;
use alloc::string::String;
use core::fmt;

use crate::partition::OFFSET_APP_TYPE;

/// Why a data row was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFault {
    /// One of name, type, subtype or size is empty or missing
    MissingField,
    /// Size field is not `<digits>[K|M|B]` or `0x<hex>`
    InvalidSize,
    /// Offset field is not a hexadecimal number
    InvalidOffset,
    /// Partition would end beyond the 32-bit address space
    OutOfRange,
}

/// Error returned when loading a partition table fails
///
/// Row-level variants carry the 1-based line number of the offending row in
/// the original text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// Header line missing or malformed, or no data rows
    InvalidFormat,
    /// A data row has a missing or unparseable field
    InvalidData {
        /// Line of the offending row
        line: usize,
        /// What was wrong with it
        fault: DataFault,
    },
    /// Explicit offset lies below the partition table base offset
    InvalidOffset {
        /// Line of the offending row
        line: usize,
        /// Base offset partitions must start at
        base: u32,
    },
    /// Explicit offset is not aligned for the partition type
    InvalidOffsetAlignment {
        /// Line of the offending row
        line: usize,
        /// Required alignment
        alignment: u32,
    },
    /// App partition does not start at or after the app region, aligned to it
    InvalidAppOffset {
        /// Line of the offending row
        line: usize,
    },
    /// Two partitions share a name
    DuplicateName {
        /// Line of the second occurrence
        line: usize,
        /// The repeated name
        name: String,
    },
    /// Partitions need more space than the largest supported flash chip
    FlashSizeExceeded {
        /// Sum of all partition sizes in bytes
        total: u64,
        /// Largest catalog entry in megabytes
        largest_mb: u32,
    },
}

impl LoadError {
    /// Short title for the error
    pub fn title(&self) -> &'static str {
        match self {
            Self::InvalidFormat => "Invalid CSV format",
            Self::InvalidData { .. } => "Invalid CSV data",
            Self::InvalidOffset { .. } => "Invalid offset",
            Self::InvalidOffsetAlignment { .. } => "Invalid offset alignment",
            Self::InvalidAppOffset { .. } => "Invalid app offset",
            Self::DuplicateName { .. } => "Duplicate partition name",
            Self::FlashSizeExceeded { .. } => "Partitions too large",
        }
    }

    /// Human readable explanation of the error
    pub fn text(&self) -> String {
        match self {
            Self::InvalidFormat => {
                String::from("The CSV file is malformed, please use the correct format.")
            }
            Self::InvalidData { line, fault } => format!(
                "The CSV file contains invalid data on line {} ({}), please check the file and try again.",
                line, fault
            ),
            Self::InvalidOffset { line, base } => format!(
                "Partition offsets must start at 0x{:X} (line {}).",
                base, line
            ),
            Self::InvalidOffsetAlignment { line, alignment } => format!(
                "Partition offsets must be aligned to 0x{:X} (line {}).",
                alignment, line
            ),
            Self::InvalidAppOffset { line } => format!(
                "App partitions must start at or after 0x{:X} and be aligned to 0x{:X} (line {}).",
                OFFSET_APP_TYPE, OFFSET_APP_TYPE, line
            ),
            Self::DuplicateName { line, name } => {
                format!("Partition name '{}' is used more than once (line {}).", name, line)
            }
            Self::FlashSizeExceeded { total, largest_mb } => format!(
                "Partitions need {} bytes, more than the largest supported flash size of {} MiB.",
                total, largest_mb
            ),
        }
    }

    /// Line of the row that caused the error, if the error is row-specific
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::InvalidData { line, .. }
            | Self::InvalidOffset { line, .. }
            | Self::InvalidOffsetAlignment { line, .. }
            | Self::InvalidAppOffset { line }
            | Self::DuplicateName { line, .. } => Some(*line),
            Self::InvalidFormat | Self::FlashSizeExceeded { .. } => None,
        }
    }
}

impl fmt::Display for DataFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField => write!(f, "missing field"),
            Self::InvalidSize => write!(f, "invalid size"),
            Self::InvalidOffset => write!(f, "invalid offset"),
            Self::OutOfRange => write!(f, "partition exceeds 32-bit address space"),
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title(), self.text())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LoadError {}

/// Result type alias using the load error
pub type Result<T> = core::result::Result<T, LoadError>;
