//! rptable-core - Core library for partition table loading
//!
//! This crate parses partition table descriptions written in the CSV-like
//! text format used by ESP-style bootloaders, resolves every partition to a
//! concrete flash offset, and derives where the table itself should live and
//! how large a flash chip has to be to hold it.
//!
//! It is `no_std` compatible (with `alloc`) so the same validation can run
//! on a host tool or inside firmware tooling.
//!
//! # Features
//!
//! - `std` - Enable standard library support (includes `alloc`, region export)
//! - `alloc` - Enable heap allocation, required for partition tables
//!
//! # Example
//!
//! ```ignore
//! use rptable_core::partition::{load_partitions_from_csv, LoadOptions, PartitionTable};
//!
//! let csv = "# Name,Type,SubType,Offset,Size,Flags\n\
//!            nvs,data,nvs,0x9000,0x5000,\n\
//!            factory,app,factory,0x10000,1M,\n";
//!
//! let mut table = PartitionTable::new();
//! match load_partitions_from_csv(csv, &mut table, &LoadOptions::default()) {
//!     Ok(summary) => println!("{} partitions, {} MiB flash", summary.count, summary.flash_size_mb),
//!     Err(e) => println!("{}", e),
//! }
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

#[cfg(feature = "alloc")]
pub mod error;
#[cfg(feature = "alloc")]
pub mod partition;

#[cfg(feature = "alloc")]
pub use error::{DataFault, LoadError, Result};
