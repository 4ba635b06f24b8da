//! Man page generator for rptable
//!
//! Writes `rptable.1` plus one `rptable-<command>.1` page per subcommand.
//!
//! Usage: cargo run --bin gen-manpage -- [output-dir]

use clap::{Command, CommandFactory};
use std::fs;
use std::io;
use std::path::PathBuf;

#[path = "../cli.rs"]
#[allow(dead_code)]
mod cli;

/// Render the top-level page and a page per subcommand as `(file name, roff)`
fn render_pages(cmd: &Command) -> io::Result<Vec<(String, Vec<u8>)>> {
    let bin = cmd.get_name().to_string();
    let mut pages = Vec::new();

    let mut buffer = Vec::new();
    clap_mangen::Man::new(cmd.clone()).render(&mut buffer)?;
    pages.push((format!("{}.1", bin), buffer));

    for sub in cmd.get_subcommands() {
        let title = format!("{}-{}", bin, sub.get_name());
        let mut buffer = Vec::new();
        clap_mangen::Man::new(sub.clone())
            .title(title.clone())
            .render(&mut buffer)?;
        pages.push((format!("{}.1", title), buffer));
    }

    Ok(pages)
}

fn main() -> io::Result<()> {
    let output_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("man"));

    fs::create_dir_all(&output_dir)?;

    for (file, roff) in render_pages(&cli::Cli::command())? {
        let path = output_dir.join(file);
        fs::write(&path, roff)?;
        println!("Wrote {}", path.display());
    }

    println!("\nView with: man -l {}", output_dir.join("rptable.1").display());
    Ok(())
}
