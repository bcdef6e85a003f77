// ===== forcegrade/src/main.rs =====
use clap::{Parser, Subcommand};
use std::process;
use tracing_subscriber::EnvFilter;

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the built-in tasks, or show one in detail.
    Tasks(cmd::tasks::TasksArgs),
    /// Grade a drawn-force snapshot against a task.
    Check(cmd::check::CheckArgs),
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Tasks(args) => cmd::tasks::run(args),
        Commands::Check(args) => cmd::check::run(args),
    };

    if let Err(e) = result {
        eprintln!("\n\u{274c} {}", e);
        process::exit(1);
    }
}
