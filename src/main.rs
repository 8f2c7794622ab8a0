use clap::{Parser, Subcommand};
use git_revloc::commands::*;
use git_revloc::core::{
    error::{Result, RevlocError},
    print_error,
};
use std::env;

#[derive(Parser)]
#[command(name = "git-revloc")]
#[command(about = "Revision-aware file locators for git repositories")]
#[command(version = "0.1.0")]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the revision locator for a file
    Encode {
        /// File inside a git working tree
        file: String,
        /// Revision to encode (defaults to the working copy)
        #[arg(short = 'r', long = "rev")]
        revision: Option<String>,
    },
    /// Show what a locator points at
    Decode {
        /// A gitrev:, git: or file: locator
        locator: String,
    },
    /// List the commits that changed a file, following renames
    History {
        /// File inside a git working tree
        file: String,
        /// Maximum number of commits (defaults to the configured limit)
        #[arg(short = 'n', long = "limit")]
        limit: Option<usize>,
        /// Resolve and show each commit's previous revision of the file
        #[arg(long)]
        resolve_previous: bool,
    },
}

fn report(result: Result<()>) {
    if let Err(e) = result {
        if let RevlocError::NotInGitRepo = e {
            print_error("Not in a git repository");
        } else {
            print_error(&e.to_string());
        }
        std::process::exit(1);
    }
}

fn main() {
    let cli = Cli::parse();

    // Configure logging based on --debug flag
    if cli.debug {
        env::set_var("RUST_LOG", "debug");
    } else if env::var_os("RUST_LOG").is_none() {
        env::set_var("RUST_LOG", "warn");
    }
    env_logger::init();

    match cli.command {
        Commands::Encode { file, revision } => report(execute_encode(&file, revision.as_deref())),
        Commands::Decode { locator } => report(execute_decode(&locator)),
        Commands::History {
            file,
            limit,
            resolve_previous,
        } => report(execute_history(&file, limit, resolve_previous)),
    }
}
