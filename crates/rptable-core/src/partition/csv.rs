//! CSV partition table parsing
//!
//! Parses partition tables in the CSV-like format used by ESP-style
//! bootloaders:
//!
//! ```text
//! # Name,   Type, SubType, Offset,  Size,     Flags
//! nvs,      data, nvs,     0x9000,  0x5000,
//! otadata,  data, ota,     0xe000,  0x2000,
//! app0,     app,  ota_0,   0x10000, 0x140000,
//! ```
//!
//! Whitespace is insignificant anywhere in a line. Lines starting with `#`
//! are comments unless they are the header. An empty offset column leaves
//! the partition to auto-layout.

use alloc::string::String;
use alloc::vec::Vec;

use super::{PartitionType, PARTITION_NAME_MAX_LEN};
use crate::error::{DataFault, LoadError, Result};

/// Column names every header line starts with
const HEADER_COLUMNS: &str = "Name,Type,SubType,Offset,Size";

/// A validated data row, before offset resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionRow {
    /// 1-based line number in the source text
    pub line: usize,
    /// Partition name
    pub name: String,
    /// Partition type
    pub kind: PartitionType,
    /// Subtype tag
    pub subtype: String,
    /// Explicit offset, `None` for auto-layout
    pub offset: Option<u32>,
    /// Size in bytes
    pub size: u32,
    /// Flags column, empty if absent
    pub flags: String,
}

/// Check if a whitespace-stripped line is a header line
///
/// Any number of leading `#` is accepted, so both `Name,Type,...` and
/// `# Name,Type,...` are headers. A trailing `,Flags` column (or anything
/// else after `Size`) is tolerated.
pub fn is_header_line(line: &str) -> bool {
    line.trim_start_matches('#').starts_with(HEADER_COLUMNS)
}

/// Remove spaces, tabs and carriage returns
fn strip_whitespace(line: &str) -> String {
    line.chars()
        .filter(|c| !matches!(c, ' ' | '\t' | '\r'))
        .collect()
}

/// Split text into data lines, checking the header
///
/// Returns `(line number, stripped line)` pairs for every data row. The
/// first line that is not blank or a comment must be the header, and at
/// least one data row must follow it.
pub fn split_rows(text: &str) -> Result<Vec<(usize, String)>> {
    let mut lines = text
        .split('\n')
        .enumerate()
        .map(|(i, raw)| (i + 1, strip_whitespace(raw)))
        .filter(|(line, row)| {
            if is_header_line(row) {
                return true;
            }
            if row.starts_with('#') {
                log::trace!("Skipping comment on line {}", line);
            }
            !row.is_empty() && !row.starts_with('#')
        });

    match lines.next() {
        Some((_, header)) if is_header_line(&header) => {}
        _ => return Err(LoadError::InvalidFormat),
    }

    let rows: Vec<(usize, String)> = lines.collect();
    if rows.is_empty() {
        return Err(LoadError::InvalidFormat);
    }
    Ok(rows)
}

/// Parse one stripped data row
///
/// Columns past `Flags` are ignored.
pub fn parse_row(line: usize, row: &str) -> Result<PartitionRow> {
    let invalid = |fault| LoadError::InvalidData { line, fault };

    let mut fields = row.split(',');
    let mut next = || fields.next().unwrap_or("");
    let (name, kind, subtype, offset, size, flags) =
        (next(), next(), next(), next(), next(), next());

    if name.is_empty() || kind.is_empty() || subtype.is_empty() || size.is_empty() {
        return Err(invalid(DataFault::MissingField));
    }
    if name.len() > PARTITION_NAME_MAX_LEN {
        log::warn!(
            "Line {}: name '{}' is longer than {} bytes and will be truncated on flash",
            line,
            name,
            PARTITION_NAME_MAX_LEN
        );
    }

    let size = parse_size(size).map_err(invalid)?;
    let offset = if offset.is_empty() {
        None
    } else {
        Some(parse_offset(offset).map_err(invalid)?)
    };

    Ok(PartitionRow {
        line,
        name: String::from(name),
        kind: PartitionType::from_tag(kind),
        subtype: String::from(subtype),
        offset,
        size,
        flags: String::from(flags),
    })
}

/// Parse a size field
///
/// Accepts `<digits>` (bytes), `<digits>B`, `<digits>K` (KiB),
/// `<digits>M` (MiB) or a `0x`-prefixed hex literal.
pub fn parse_size(s: &str) -> core::result::Result<u32, DataFault> {
    if let Some(hex) = s.strip_prefix("0x") {
        if hex.is_empty() || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(DataFault::InvalidSize);
        }
        return u32::from_str_radix(hex, 16).map_err(|_| DataFault::InvalidSize);
    }

    let (digits, multiplier) = match s.as_bytes().last() {
        Some(b'K') => (&s[..s.len() - 1], 1024),
        Some(b'M') => (&s[..s.len() - 1], 1024 * 1024),
        Some(b'B') => (&s[..s.len() - 1], 1),
        _ => (s, 1),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DataFault::InvalidSize);
    }

    digits
        .parse::<u32>()
        .ok()
        .and_then(|n| n.checked_mul(multiplier))
        .ok_or(DataFault::InvalidSize)
}

/// Parse an offset field as hex, with or without a `0x` prefix
pub fn parse_offset(s: &str) -> core::result::Result<u32, DataFault> {
    let hex = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);

    if hex.is_empty() || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(DataFault::InvalidOffset);
    }
    u32::from_str_radix(hex, 16).map_err(|_| DataFault::InvalidOffset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("4096"), Ok(4096));
        assert_eq!(parse_size("4096B"), Ok(4096));
        assert_eq!(parse_size("20K"), Ok(20 * 1024));
        assert_eq!(parse_size("1M"), Ok(1024 * 1024));
        assert_eq!(parse_size("0x5000"), Ok(0x5000));
        assert_eq!(parse_size("0x3F0000"), Ok(0x3F0000));
        assert_eq!(parse_size("0"), Ok(0));
    }

    #[test]
    fn test_parse_size_invalid() {
        assert_eq!(parse_size("abc"), Err(DataFault::InvalidSize));
        assert_eq!(parse_size(""), Err(DataFault::InvalidSize));
        assert_eq!(parse_size("K"), Err(DataFault::InvalidSize));
        assert_eq!(parse_size("20k"), Err(DataFault::InvalidSize));
        assert_eq!(parse_size("0x"), Err(DataFault::InvalidSize));
        assert_eq!(parse_size("0X5000"), Err(DataFault::InvalidSize));
        assert_eq!(parse_size("0xZZ"), Err(DataFault::InvalidSize));
        assert_eq!(parse_size("-5"), Err(DataFault::InvalidSize));
        assert_eq!(parse_size("+5"), Err(DataFault::InvalidSize));
        assert_eq!(parse_size("5000M"), Err(DataFault::InvalidSize));
        assert_eq!(parse_size("0x100000000"), Err(DataFault::InvalidSize));
    }

    #[test]
    fn test_parse_offset() {
        assert_eq!(parse_offset("9000"), Ok(0x9000));
        assert_eq!(parse_offset("0x9000"), Ok(0x9000));
        assert_eq!(parse_offset("0X10000"), Ok(0x10000));
        assert_eq!(parse_offset("e000"), Ok(0xE000));
        assert_eq!(parse_offset("0x"), Err(DataFault::InvalidOffset));
        assert_eq!(parse_offset("12zz"), Err(DataFault::InvalidOffset));
        assert_eq!(parse_offset("123456789"), Err(DataFault::InvalidOffset));
    }

    #[test]
    fn test_is_header_line() {
        assert!(is_header_line("#Name,Type,SubType,Offset,Size,Flags"));
        assert!(is_header_line("##Name,Type,SubType,Offset,Size"));
        assert!(is_header_line("Name,Type,SubType,Offset,Size"));
        assert!(!is_header_line("#name,type,subtype,offset,size"));
        assert!(!is_header_line("#Name,Type,SubType,Size"));
        assert!(!is_header_line("nvs,data,nvs,0x9000,0x5000,"));
    }

    #[test]
    fn test_split_rows() {
        let text = "# ESP-IDF Partition Table\r\n\
                    # Name,   Type, SubType, Offset,  Size, Flags\r\n\
                    \r\n\
                    nvs,      data, nvs,     0x9000,  0x5000,\r\n\
                    # spare slot\n\
                    \tapp0,   app,  ota_0,   0x10000, 0x140000,\n";
        let rows = split_rows(text).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], (4, String::from("nvs,data,nvs,0x9000,0x5000,")));
        assert_eq!(rows[1], (6, String::from("app0,app,ota_0,0x10000,0x140000,")));
    }

    #[test]
    fn test_split_rows_invalid_format() {
        assert_eq!(split_rows(""), Err(LoadError::InvalidFormat));
        assert_eq!(
            split_rows("#Name,Type,SubType,Offset,Size\n# only comments\n"),
            Err(LoadError::InvalidFormat)
        );
        assert_eq!(
            split_rows("nvs,data,nvs,0x9000,0x5000\n#Name,Type,SubType,Offset,Size\n"),
            Err(LoadError::InvalidFormat)
        );
    }

    #[test]
    fn test_parse_row() {
        let row = parse_row(2, "app0,app,ota_0,,1M,encrypted").unwrap();
        assert_eq!(row.line, 2);
        assert_eq!(row.name, "app0");
        assert_eq!(row.kind, PartitionType::App);
        assert_eq!(row.subtype, "ota_0");
        assert_eq!(row.offset, None);
        assert_eq!(row.size, 0x100000);
        assert_eq!(row.flags, "encrypted");

        let row = parse_row(3, "nvs,data,nvs,9000,0x5000").unwrap();
        assert_eq!(row.offset, Some(0x9000));
        assert_eq!(row.flags, "");

        // Names past the on-flash field width are kept whole
        let row = parse_row(4, "ota_data_partition_x,data,ota,,0x2000,").unwrap();
        assert_eq!(row.name, "ota_data_partition_x");
        assert_eq!(row.size, 0x2000);
    }

    #[test]
    fn test_parse_row_errors() {
        assert_eq!(
            parse_row(5, "nvs,data,nvs,0x9000"),
            Err(LoadError::InvalidData {
                line: 5,
                fault: DataFault::MissingField
            })
        );
        assert_eq!(
            parse_row(5, "nvs,data,,0x9000,0x5000"),
            Err(LoadError::InvalidData {
                line: 5,
                fault: DataFault::MissingField
            })
        );
        assert_eq!(
            parse_row(6, "nvs,data,nvs,0x9000,abc"),
            Err(LoadError::InvalidData {
                line: 6,
                fault: DataFault::InvalidSize
            })
        );
        assert_eq!(
            parse_row(7, "nvs,data,nvs,xyz,0x5000"),
            Err(LoadError::InvalidData {
                line: 7,
                fault: DataFault::InvalidOffset
            })
        );
    }
}
