//! Command-line front end for the rollsmith table engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "rollsmith",
    about = "Generate random results from TableSmith-style table files",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new result from a table
    New {
        /// Table calls of the form `Table[.Group][:repeat]`
        #[arg(required = true)]
        calls: Vec<String>,

        /// Root directory to search for .tab files
        /// (defaults to $ROLLSMITH_ROOT, then the current directory)
        #[arg(short, long)]
        root: Option<PathBuf>,

        /// RNG seed for reproducible generation
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Roll dice expressions such as `3d6+1` or `4-1d8`
    Roll {
        /// Dice expressions; an `N-` prefix repeats the roll N times
        #[arg(required = true)]
        exprs: Vec<String>,

        /// RNG seed for reproducible rolls
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Parse tables and report errors
    Parse {
        /// Table names or paths relative to the root
        #[arg(required = true)]
        names: Vec<String>,

        /// Root directory to search for .tab files
        #[arg(short, long)]
        root: Option<PathBuf>,

        /// Print the parsed table as JSON
        #[arg(short = 'x', long)]
        export: bool,
    },

    /// List available tables by category
    List {
        /// Root directory to search for .tab files
        #[arg(short, long)]
        root: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::New { calls, root, seed } => commands::new::run(&calls, root.as_deref(), seed),
        Commands::Roll { exprs, seed } => commands::roll::run(&exprs, seed),
        Commands::Parse {
            names,
            root,
            export,
        } => commands::parse::run(&names, root.as_deref(), export),
        Commands::List { root } => commands::list::run(root.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
