//! snippet-repl - CLI

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use snippet_repl::tokenizer::tokenize;
use snippet_repl::util::{config, logger};
use snippet_repl::{eval, run_file, start_repl, NAME, VERSION};

/// Interactive snippet REPL with token logging and a debug mode
#[derive(Parser, Debug)]
#[command(name = "snippet-repl")]
#[command(version = VERSION)]
#[command(about = NAME, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file to use instead of the default lookup
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// History file
    #[arg(long, value_name = "FILE", global = true)]
    history_file: Option<PathBuf>,

    /// Log of tokens from input that ran
    #[arg(long, value_name = "FILE", global = true)]
    tokens_file: Option<PathBuf>,

    /// Log of tokens from input that raised an error
    #[arg(long, value_name = "FILE", global = true)]
    error_tokens_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the interactive REPL (default)
    Repl,

    /// Evaluate code and print its value
    Eval {
        /// Code to evaluate
        #[arg(value_name = "CODE")]
        code: String,
    },

    /// Run a source file
    Run {
        /// Source file to run
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Print the token classification of some code
    Tokens {
        /// Code to tokenize
        #[arg(value_name = "CODE")]
        code: String,
    },

    /// Print version information
    Version,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = config::load(args.config.as_deref()).context("Failed to load configuration")?;
    logger::init_with_level(logger::cli_level(args.verbose, config.log.level));

    if args.no_color {
        config.repl.colors = false;
    }
    if let Some(path) = args.history_file {
        config.repl.history_file = path;
    }
    if let Some(path) = args.tokens_file {
        config.repl.tokens_file = path;
    }
    if let Some(path) = args.error_tokens_file {
        config.repl.error_tokens_file = path;
    }

    if args.verbose {
        eprintln!("{} version: {}", NAME, VERSION);
        eprintln!("Host: {}", std::env::consts::OS);
    }

    match args.command.unwrap_or(Commands::Repl) {
        Commands::Repl => {
            start_repl(&config.repl).context("REPL failed")?;
        }
        Commands::Eval { code } => {
            if let Some(value) = eval(&code).context("Failed to evaluate code")? {
                println!("{}", value);
            }
        }
        Commands::Run { file } => {
            run_file(&file).with_context(|| format!("Failed to run: {}", file.display()))?;
        }
        Commands::Tokens { code } => {
            for token in tokenize(&code) {
                println!("{}", token);
            }
        }
        Commands::Version => {
            println!("{} {}", NAME, VERSION);
        }
    }

    Ok(())
}
