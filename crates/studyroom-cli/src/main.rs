use clap::{Parser, Subcommand};
use studyroom_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;
mod http;

#[derive(Parser)]
#[command(name = "studyroom", version, about = "Studyroom CLI and backend")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// User management
    User {
        #[command(subcommand)]
        action: commands::user::UserAction,
    },
    /// Exam management
    Exam {
        #[command(subcommand)]
        action: commands::exam::ExamAction,
    },
    /// Study plan generation and lookup
    Plan {
        #[command(subcommand)]
        action: commands::plan::PlanAction,
    },
    /// Performance records and weak topics
    Performance {
        #[command(subcommand)]
        action: commands::performance::PerformanceAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Run the REST backend
    Serve(commands::serve::ServeArgs),
}

/// Log to stderr so JSON on stdout stays machine-readable. `RUST_LOG` wins
/// over the configured filter.
fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    let config = Config::load_or_default();
    init_tracing(&config);

    let result = match cli.command {
        Commands::User { action } => commands::user::run(action),
        Commands::Exam { action } => commands::exam::run(action),
        Commands::Plan { action } => commands::plan::run(action, &config),
        Commands::Performance { action } => commands::performance::run(action, &config),
        Commands::Config { action } => commands::config::run(action, config),
        Commands::Serve(args) => commands::serve::run(args, config),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
