//! CLI command implementations
//!
//! ## Table commands
//!
//! The `table` module loads CSV partition tables from disk and either
//! prints the resolved layout or exports it as a flash region layout.
//!
//! ## Preset commands
//!
//! The `presets` module lists the built-in templates and applies one
//! through the same auto-layout pipeline.

pub mod presets;
pub mod table;

/// Format a byte count as a human-readable size
pub fn format_size(bytes: u64) -> String {
    if bytes >= 1024 * 1024 && bytes % (1024 * 1024) == 0 {
        format!("{} MiB", bytes / (1024 * 1024))
    } else if bytes >= 1024 && bytes % 1024 == 0 {
        format!("{} KiB", bytes / 1024)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0x5000), "20 KiB");
        assert_eq!(format_size(0x140000), "1280 KiB");
        assert_eq!(format_size(0x400000), "4 MiB");
        assert_eq!(format_size(0x1800), "6 KiB");
        assert_eq!(format_size(100), "100 B");
    }
}
