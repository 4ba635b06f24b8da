//! Partition table command implementations

use crate::cli::TableArgs;
use crate::error::{CliError, Result};
use rptable_core::partition::{
    load_partitions_from_csv, FlashSizeCatalog, LoadOptions, PartitionTable, RegionLayout,
    DEFAULT_PARTITION_TABLE_OFFSET,
};
use std::fs;
use std::path::Path;

/// Build load options from the command line
pub fn load_options(args: &TableArgs) -> LoadOptions {
    if let Some(mb) = args.flash_size {
        if mb == 0 {
            log::debug!("Flash size 0 given, selecting from the catalog");
        } else if !FlashSizeCatalog::default().contains(mb) {
            log::warn!("Flash size {} MiB is not a standard size", mb);
        }
    }
    LoadOptions {
        force_flash_size: args.flash_size,
        ..LoadOptions::default()
    }
}

/// Create an empty table at the requested base offset
pub fn new_table(args: &TableArgs) -> PartitionTable {
    PartitionTable::with_base_offset(args.base_offset.unwrap_or(DEFAULT_PARTITION_TABLE_OFFSET))
}

/// Read and load a CSV partition table
fn load_file(file: &Path, args: &TableArgs) -> Result<PartitionTable> {
    let text = fs::read_to_string(file).map_err(|source| CliError::ReadFailed {
        path: file.to_path_buf(),
        source,
    })?;

    let mut table = new_table(args);
    let summary = load_partitions_from_csv(&text, &mut table, &load_options(args)).map_err(
        |source| CliError::LoadFailed {
            path: file.display().to_string(),
            source,
        },
    )?;

    log::info!(
        "Loaded {} partitions from {}",
        summary.count,
        file.display()
    );
    Ok(table)
}

/// Show the resolved layout of a CSV partition table
pub fn cmd_show(file: &Path, args: &TableArgs) -> Result<()> {
    let table = load_file(file, args)?;
    print_table(&table);
    Ok(())
}

/// Export a CSV partition table as a region layout
pub fn cmd_regions(file: &Path, output: Option<&Path>, args: &TableArgs) -> Result<()> {
    let table = load_file(file, args)?;

    let name = file.file_name().map(|n| n.to_string_lossy().into_owned());
    let layout = RegionLayout::from_table(&table, name.as_deref());
    let content = layout.to_toml_string()?;

    if let Some(out) = output {
        fs::write(out, content).map_err(|source| CliError::WriteFailed {
            path: out.to_path_buf(),
            source,
        })?;
        println!("Saved region layout to {:?}", out);
    } else {
        print!("{}", content);
    }

    Ok(())
}

/// Print partition table information
pub fn print_table(table: &PartitionTable) {
    println!("Partition Table");
    println!("===============");
    println!("Offset: {:#X}", table.base_offset());

    if let Some(mb) = table.flash_size_mb() {
        println!(
            "Flash:  {} MiB ({} used, {} free)",
            mb,
            super::format_size(table.total_size()),
            super::format_size(table.free_space().unwrap_or(0))
        );
    }

    println!("\nPartitions ({}):", table.len());
    println!(
        "{:<16} {:<6} {:<10} {:>10} {:>10} {:>10} {:<10} {:>6}",
        "Name", "Type", "SubType", "Offset", "End", "Size", "Flags", "Fixed"
    );
    println!("{:-<86}", "");

    for p in table.partitions() {
        println!(
            "{:<16} {:<6} {:<10} {:#010X} {:#010X} {:>10} {:<10} {:>6}",
            p.name,
            p.kind,
            p.subtype,
            p.offset,
            p.end(),
            super::format_size(u64::from(p.size)),
            p.flags,
            if p.fixed_offset { "yes" } else { "-" }
        );
    }
}
