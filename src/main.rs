use anyhow::Result;
use clap::{Parser, Subcommand};

// Use the library modules
use wrenkit::{commands, core};

#[derive(Parser)]
#[clap(name = "wrenkit")]
#[clap(about = "Maintenance toolkit for the Wren voice server bundle")]
#[clap(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Music addon management
    Music {
        #[clap(subcommand)]
        command: MusicCommands,
    },
    /// Pull upstream server updates, optionally through a mirror proxy
    Update,
    /// Check the bundle layout and tooling
    Doctor,
}

#[derive(Subcommand)]
enum MusicCommands {
    /// Download and install the music addon
    Install,
    /// First-run setup: install the addon and seed shared configuration
    Init,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // One configuration, built at startup and passed to every command.
    let config = core::config::Config::load().map_err(|e| anyhow::anyhow!(e))?;

    let result = match cli.command {
        Commands::Music { command } => match command {
            MusicCommands::Install => {
                commands::music::install(&config).map_err(|e| anyhow::anyhow!(e))
            }
            MusicCommands::Init => commands::music::init(&config).map_err(|e| anyhow::anyhow!(e)),
        },
        Commands::Update => commands::update::run(&config).map_err(|e| anyhow::anyhow!(e)),
        Commands::Doctor => {
            commands::doctor::check_environment(&config).map_err(|e| anyhow::anyhow!(e))
        }
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {e}");
        std::process::exit(1);
    }

    Ok(())
}
