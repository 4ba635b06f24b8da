//! CLI argument parsing

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Parse a string as a hex or decimal u32
fn parse_hex_u32(s: &str) -> Result<u32, String> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).map_err(|e| format!("Invalid hex value: {}", e))
    } else {
        s.parse::<u32>().map_err(|e| format!("Invalid number: {}", e))
    }
}

#[derive(Parser)]
#[command(name = "rptable")]
#[command(author, version, about = "Partition table loader and layout tool", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Table placement options shared across commands
#[derive(Args, Debug, Clone, Default)]
pub struct TableArgs {
    /// Offset the partition table is stored at (hex, e.g., 0x8000)
    #[arg(long, value_parser = parse_hex_u32)]
    pub base_offset: Option<u32>,

    /// Force the flash size in MiB instead of picking the smallest that fits
    #[arg(long)]
    pub flash_size: Option<u32>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load a CSV partition table and show the resolved layout
    Show {
        /// Partition table (CSV format)
        #[arg(short, long)]
        file: PathBuf,

        #[command(flatten)]
        table: TableArgs,
    },

    /// Export a CSV partition table as a flash region layout
    Regions {
        /// Partition table (CSV format)
        #[arg(short, long)]
        file: PathBuf,

        /// Output layout file (TOML format, optional - prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        table: TableArgs,
    },

    /// List built-in partition table presets
    Presets,

    /// Apply a built-in preset and show the resolved layout
    Preset {
        /// Preset name (see `presets`)
        name: String,

        #[command(flatten)]
        table: TableArgs,
    },
}
