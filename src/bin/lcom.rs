// src/bin/lcom.rs
use std::process;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use lcom_core::cli::{self, Cli};

fn main() {
    match run() {
        Ok(false) => {}
        Ok(true) => process::exit(1),
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            process::exit(1);
        }
    }
}

fn run() -> Result<bool> {
    let cli = Cli::parse();
    cli::init_tracing(cli.verbose);
    cli::handle_analyze(&cli)
}
