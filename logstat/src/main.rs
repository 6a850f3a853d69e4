use clap::{Parser, Subcommand};
use logstat_core::cli;
use logstat_core::conf::CONFIG_FILE;
use logstat_core::logging::Verbosity;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "logstat",
    version,
    about = "logstat: daily statistics from web server access logs"
)]
struct Cli {
    /// Path to the logstat config file
    #[arg(long, short, global = true, default_value = CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Aggregate access logs into daily stats (default)
    Import {
        /// Log files to import; defaults to `log_pattern` under the logs directory
        files: Vec<PathBuf>,

        /// Override the configured verbosity
        #[arg(long, value_enum)]
        verbosity: Option<Verbosity>,

        /// Re-read every line instead of resuming after the last parsed one
        #[arg(long)]
        full: bool,
    },

    /// Print the summary of one day
    Show {
        /// Day to show, as YYYY-MM-DD
        date: String,

        /// No colors
        #[arg(long)]
        plain: bool,
    },

    /// Configuration tooling
    Config {
        #[command(subcommand)]
        cmd: cli::ConfigCmd,
    },
}

fn main() {
    let args = Cli::parse();

    let result = match args.command {
        Some(Command::Import {
            files,
            verbosity,
            full,
        }) => cli::run_import(&args.config, files, verbosity, full),

        Some(Command::Show { date, plain }) => cli::run_show(&args.config, &date, plain),

        Some(Command::Config { cmd }) => cli::conf::run(cmd, &args.config),

        None => cli::run_import(&args.config, Vec::new(), None, false),
    };

    if let Err(e) = result {
        eprintln!("logstat error: {e:#}");
        std::process::exit(1);
    }
}
