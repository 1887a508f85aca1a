//! Work Hours MCP Server - Main Entry Point
//!
//! This is the main entry point for the work hours MCP server application.
//! The actual implementation is in the `work_hours_mcp` library.

use anyhow::Result;
use clap::{CommandFactory, Parser};
use mcp_attr::server::serve_stdio;
use std::path::PathBuf;
use tracing::info;
use work_hours_mcp::{ScheduleMode, WorkHoursServerHandler, load_config};

/// Work Hours MCP Server - edit a teacher's weekly work hours via Model Context Protocol
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the work hours data file
    file: PathBuf,

    /// Edit one-off hours for the dates of the current week instead of the recurring schedule
    #[arg(long)]
    week: bool,

    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Check if no arguments were provided (except the program name)
    if std::env::args().len() == 1 {
        // No arguments provided, show help and exit with error code
        let mut cmd = Args::command();
        cmd.print_help().ok();
        println!(); // Add a newline after help
        std::process::exit(2);
    }

    let args = Args::parse();

    // stdout carries the MCP transport, so logs go to stderr
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config(args.config.as_deref())?;
    let mode = if args.week {
        ScheduleMode::SpecificWeek
    } else {
        ScheduleMode::Weekday
    };

    info!(file = %args.file.display(), ?mode, "Starting work-hours-mcp");
    let handler = WorkHoursServerHandler::with_storage(&args.file, mode, config)?;
    serve_stdio(handler).await?;
    Ok(())
}
