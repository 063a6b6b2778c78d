use clap::{Parser, Subcommand};

mod commands;
mod terminal;

#[derive(Parser)]
#[command(name = "tempo", version, about = "Tempo: task timer with rewards")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Age profile, language and voice
    Profile {
        #[command(subcommand)]
        action: commands::profile::ProfileAction,
    },
    /// Task management and timed sessions
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Show the coin balance
    Coins {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Spend coins on accessories and houses
    Shop {
        #[command(subcommand)]
        action: commands::shop::ShopAction,
    },
    /// Weekly routine calendar
    Calendar {
        #[command(subcommand)]
        action: commands::calendar::CalendarAction,
    },
    /// Packing checklists
    Checklist {
        #[command(subcommand)]
        action: commands::checklist::ChecklistAction,
    },
    /// Talk to the assistant
    Chat {
        /// Send one message and exit instead of reading lines from stdin
        message: Option<String>,
    },
    /// Alarm sounds
    Alarm {
        #[command(subcommand)]
        action: commands::alarm::AlarmAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("TEMPO_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Profile { action } => commands::profile::run(action),
        Commands::Task { action } => commands::task::run(action),
        Commands::Coins { json } => commands::coins::run(json),
        Commands::Shop { action } => commands::shop::run(action),
        Commands::Calendar { action } => commands::calendar::run(action),
        Commands::Checklist { action } => commands::checklist::run(action),
        Commands::Chat { message } => commands::chat::run(message),
        Commands::Alarm { action } => commands::alarm::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
