//! Preset command implementations

use crate::cli::TableArgs;
use crate::error::{CliError, Result};
use rptable_core::partition::{apply_preset, find_preset, presets};

/// List all built-in presets
pub fn cmd_list() {
    println!("Built-in presets:");
    println!();
    println!("{:<30} {:>10} {:>10}", "Name", "Partitions", "Size");
    println!("{}", "-".repeat(52));

    for preset in presets() {
        println!(
            "{:<30} {:>10} {:>10}",
            preset.name,
            preset.partitions.len(),
            super::format_size(preset.total_size())
        );
    }
}

/// Apply a preset and show the result
pub fn cmd_apply(name: &str, args: &TableArgs) -> Result<()> {
    let preset = find_preset(name).ok_or_else(|| CliError::UnknownPreset(name.to_string()))?;

    let mut table = super::table::new_table(args);
    apply_preset(preset, &mut table, &super::table::load_options(args)).map_err(|source| {
        CliError::LoadFailed {
            path: preset.name.to_string(),
            source,
        }
    })?;

    super::table::print_table(&table);
    Ok(())
}
