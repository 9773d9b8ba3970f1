//! gradebook CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "gradebook", version, about = "Weighted course grade calculator")]
struct Cli {
    /// Snapshot JSON file (overrides `data` in the config)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show one course's grade, range and required average
    Course {
        /// Course id or code (e.g. "CS 246")
        #[arg(long)]
        course: String,

        /// Target final grade, overriding the stored one
        #[arg(long)]
        target: Option<f64>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Summarize terms
    Term {
        /// Only this term (e.g. "Fall 2025")
        #[arg(long)]
        term: Option<String>,

        /// Goal term average, overriding the stored one
        #[arg(long)]
        goal: Option<f64>,

        /// Date used for term progress (YYYY-MM-DD, default: today)
        #[arg(long)]
        today: Option<NaiveDate>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Write a full grade report
    Report {
        /// Output file
        #[arg(long)]
        output: PathBuf,

        /// Output format: json, markdown
        #[arg(long, default_value = "json")]
        format: String,

        /// Date used for term progress (YYYY-MM-DD, default: today)
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// Check a snapshot for data-entry problems
    Validate,

    /// Create starter config and example snapshot
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gradebook=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let data = cli.data;
    let config = cli.config;

    let result = match cli.command {
        Commands::Course {
            course,
            target,
            format,
        } => commands::course::execute(data, config, course, target, format),
        Commands::Term {
            term,
            goal,
            today,
            format,
        } => commands::term::execute(data, config, term, goal, today, format),
        Commands::Report {
            output,
            format,
            today,
        } => commands::report::execute(data, config, output, format, today),
        Commands::Validate => commands::validate::execute(data, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
