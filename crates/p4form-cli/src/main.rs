mod cmd_fmt;
mod cmd_json;
mod cmd_tagged;
mod cmd_validate;
mod cmd_view;
mod input;
mod kind;

use anyhow::Result;
use clap::{Parser, Subcommand};
use kind::FormKind;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "p4form")]
#[command(about = "Parse, normalize, and inspect Perforce specification forms")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Log parse details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Re-emit a form in canonical layout
    Fmt {
        /// Input file (defaults to stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Schema to parse with
        #[arg(long, value_enum, default_value_t)]
        kind: FormKind,

        /// Use CRLF line endings
        #[arg(long)]
        crlf: bool,

        /// Print a diff and fail if the input is not canonical
        #[arg(long)]
        check: bool,
    },
    /// Dump a form as JSON
    Json {
        /// Input file (defaults to stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Schema to parse with
        #[arg(long, value_enum, default_value_t)]
        kind: FormKind,
    },
    /// Print the mapping lines of a view field as JSON
    View {
        /// Input file (defaults to stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Field holding the view
        #[arg(long, default_value = "View")]
        field: String,
    },
    /// Build a form from flat tagged output (a JSON object)
    Tagged {
        /// Input JSON file (defaults to stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Schema to ingest with
        #[arg(long, value_enum)]
        kind: FormKind,
    },
    /// Check that a form parses and its mapping lines are well formed
    Validate {
        /// Input file (defaults to stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Schema to parse with
        #[arg(long, value_enum, default_value_t)]
        kind: FormKind,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("P4FORM_LOG")
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Fmt {
            input,
            kind,
            crlf,
            check,
        } => cmd_fmt::run(input, kind, crlf, check),
        Commands::Json { input, kind } => cmd_json::run(input, kind, cli.pretty),
        Commands::View { input, field } => cmd_view::run(input, &field, cli.pretty),
        Commands::Tagged { input, kind } => cmd_tagged::run(input, kind),
        Commands::Validate { input, kind } => cmd_validate::run(input, kind),
    }
}
