//! rptable - Partition table loader and layout tool
//!
//! Loads partition tables written in the CSV format used by ESP-style
//! bootloaders, resolves every partition to a concrete flash offset and
//! reports where the table itself belongs and which flash size it needs.
//!
//! The resolved table can also be exported as a flash region layout so
//! region-aware flashing tools can operate on single partitions.

mod cli;
mod commands;
mod error;

use clap::Parser;
use cli::{Cli, Commands};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Set log level based on verbosity
    match cli.verbose {
        0 => {} // default (info)
        1 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    }

    match cli.command {
        Commands::Show { file, table } => commands::table::cmd_show(&file, &table)?,
        Commands::Regions {
            file,
            output,
            table,
        } => commands::table::cmd_regions(&file, output.as_deref(), &table)?,
        Commands::Presets => commands::presets::cmd_list(),
        Commands::Preset { name, table } => commands::presets::cmd_apply(&name, &table)?,
    }

    Ok(())
}
