//! `dotdir` - locate and load a project's dot directory configuration.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Log filter when no `-v` flag is given (default `warn`)
//! - `DOTDIR_ESBUILD`: Bundler command
//! - `DOTDIR_NODE`: Loader command
//! - `DOTDIR_TARGET`: Bundler target
//! - `DOTDIR_ARTIFACT_MODE`: `file` or `memory`

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{bail, Result};
use colored::Colorize;
use dd_core::config::{load_settings, resolve_binary};
use dd_core::{get_config, DotDir};
use dd_protocol::{DotDirResponse, FindOptions};
use std::path::PathBuf;
use std::time::Instant;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dotdir")]
#[command(version, about = "Locate and load a project's dot directory configuration", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v: debug, -vv: trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Find the dot directory and print its configuration as JSON
    Find(FindArgs),

    /// Check that the bundler and loader can be found
    Doctor,
}

#[derive(Args, Debug)]
struct FindArgs {
    /// Directory to start searching from (defaults to the current directory)
    #[arg(long, value_name = "PATH")]
    cwd: Option<PathBuf>,

    /// Dot directory name without the leading dot (defaults to package.json `name`)
    #[arg(long, value_name = "NAME")]
    dir_name: Option<String>,

    /// Run the lookup this many times
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    repeat: u32,

    /// Print only the location metadata
    #[arg(long)]
    meta_only: bool,

    /// Compile on every run instead of reusing cached results
    #[arg(long)]
    no_cache: bool,
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_response(response: &DotDirResponse, meta_only: bool) -> Result<()> {
    let json = if meta_only {
        serde_json::to_string_pretty(&response.meta)?
    } else {
        serde_json::to_string_pretty(response)?
    };
    println!("{json}");
    Ok(())
}

async fn run_find(args: FindArgs) -> Result<()> {
    let options = FindOptions {
        cwd: args.cwd,
        dir_name: args.dir_name,
    };
    let dotdir = DotDir::new();

    for run in 1..=args.repeat {
        let started = Instant::now();
        let response = if args.no_cache {
            get_config(&options).await?
        } else {
            dotdir.find(&options).await?
        };
        debug!(run, elapsed_ms = started.elapsed().as_millis() as u64, "lookup finished");

        print_response(&response, args.meta_only)?;
        eprintln!(
            "{} {} ({} ms)",
            "Loaded".green().bold(),
            response.meta.file_path.display(),
            started.elapsed().as_millis()
        );
    }
    Ok(())
}

fn run_doctor() -> Result<()> {
    let settings = load_settings();
    let project_root = std::env::current_dir().ok();
    let mut missing = 0;

    for (role, command) in [("bundler", &settings.esbuild), ("loader", &settings.node)] {
        match resolve_binary(command, project_root.as_deref()) {
            Ok(path) => println!("{} {role} `{command}`: {}", "ok".green().bold(), path.display()),
            Err(e) => {
                missing += 1;
                println!("{} {role} `{command}`: {e}", "missing".red().bold());
            }
        }
    }

    println!("{}", "Effective settings:".bold());
    println!("{}", serde_json::to_string_pretty(&settings)?);

    if missing > 0 {
        bail!("{missing} required tool(s) could not be found");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Find(args) => run_find(args).await,
        Command::Doctor => run_doctor(),
    }
}
