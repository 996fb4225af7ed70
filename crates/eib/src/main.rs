//! Edge Image Builder MCP launcher
//!
//! With no subcommand the binary serves MCP over stdio until the client
//! closes stdin. `schema` and `generate` run the same pipeline offline.

use anyhow::Result;
use clap::{Parser, Subcommand};
use eib_config::DEFAULT_BCRYPT_COST;
use eib_logging::{init_logging, LogConfig};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

mod cli;

#[derive(Parser, Debug)]
#[command(
    name = "eib-mcp",
    version,
    about = "MCP server generating Edge Image Builder definition files"
)]
struct Cli {
    /// Enable verbose logging (debug to stderr)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Also write logs to a daily-rolling file in this directory
    #[arg(long, env = "EIB_MCP_LOG_DIR", global = true)]
    log_dir: Option<PathBuf>,

    /// bcrypt work factor for plaintext passwords
    #[arg(
        long,
        env = "EIB_MCP_BCRYPT_COST",
        default_value_t = DEFAULT_BCRYPT_COST,
        value_parser = clap::value_parser!(u32).range(4..=31),
        global = true
    )]
    bcrypt_cost: u32,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Serve MCP over stdio (default)
    Serve,

    /// Print the embedded definition schema
    Schema,

    /// Validate a definition file (JSON or YAML) and print the generated YAML
    Generate {
        /// Definition file to process
        file: PathBuf,
    },
}

fn run_command(cli: Cli) -> Result<()> {
    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => cli::mcp::run(cli::mcp::McpArgs {
            bcrypt_cost: cli.bcrypt_cost,
        }),
        Commands::Schema => cli::schema::run(),
        Commands::Generate { file } => cli::generate::run(cli::generate::GenerateArgs {
            file,
            bcrypt_cost: cli.bcrypt_cost,
        }),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_guard = match init_logging(LogConfig {
        app_name: "eib-mcp",
        verbose: cli.verbose,
        log_dir: cli.log_dir.as_deref(),
    }) {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("Warning: failed to initialize logging: {:?}", err);
            None
        }
    };

    let code = match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if log_guard.is_some() {
                error!("{:#}", err);
            } else {
                eprintln!("Error: {:?}", err);
            }
            ExitCode::from(1)
        }
    };

    // Flush the file writer before exit.
    drop(log_guard);
    code
}
