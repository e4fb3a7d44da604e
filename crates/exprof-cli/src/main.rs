use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use exprof_reconcile::{ProfileAction, STARTUP_DELAY};

mod commands;
mod host;

use commands::{ProfileCommand, SettingsPaths};

#[derive(Parser)]
#[command(name = "exprof")]
#[command(about = "Extension profile manager", long_about = None)]
struct Cli {
    /// User settings layer (YAML). Falls back to EXPROF_USER_SETTINGS.
    #[arg(long, global = true)]
    user_settings: Option<String>,

    /// Workspace settings layer (YAML); active-profile writes go here.
    /// Falls back to EXPROF_WORKSPACE_SETTINGS.
    #[arg(long, global = true)]
    workspace_settings: Option<String>,

    /// Workspace-folder settings layer; repeat for multi-root workspaces.
    #[arg(long = "folder-settings", global = true)]
    folder_settings: Vec<String>,

    /// Newline-separated enabled extension ids.
    /// Falls back to EXPROF_ENABLED_EXTENSIONS.
    #[arg(long, global = true)]
    enabled_extensions: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List known and active profiles
    List,

    /// Print the actions available for one profile
    Choices { name: String },

    /// Activate a profile and show what still needs changing
    Activate { name: String },

    /// Deactivate a profile
    Deactivate { name: String },

    /// Show everything a profile lists
    View { name: String },

    /// Run the process-start check over active profiles
    Startup {
        /// Wait before querying extension state
        #[arg(long = "delay-ms")]
        delay_ms: Option<u64>,

        /// Run even when enableStartupCheck is off
        #[arg(long, default_value_t = false)]
        force: bool,
    },

    /// Settings utilities
    Config {
        #[command(subcommand)]
        cmd: ConfigCmd,
    },
}

#[derive(Subcommand)]
enum ConfigCmd {
    /// Print the effective profile section hash + canonical JSON
    Show,

    /// Report unknown keys under extension-profiles
    Lint {
        /// Fail when unknown keys exist
        #[arg(long, default_value_t = false)]
        strict: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Silent if the file does not exist.
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let cli = Cli::parse();
    let paths = SettingsPaths::resolve(
        cli.user_settings,
        cli.workspace_settings,
        cli.folder_settings,
        cli.enabled_extensions,
    );

    match cli.cmd {
        Commands::List => commands::run_profile_command(&paths, ProfileCommand::List).await,
        Commands::Choices { name } => {
            commands::run_profile_command(&paths, ProfileCommand::Choices(name)).await
        }
        Commands::Activate { name } => {
            commands::run_profile_command(&paths, ProfileCommand::Run(name, ProfileAction::Activate))
                .await
        }
        Commands::Deactivate { name } => {
            commands::run_profile_command(
                &paths,
                ProfileCommand::Run(name, ProfileAction::Deactivate),
            )
            .await
        }
        Commands::View { name } => {
            commands::run_profile_command(&paths, ProfileCommand::Run(name, ProfileAction::View))
                .await
        }
        Commands::Startup { delay_ms, force } => {
            let delay = delay_ms.map(Duration::from_millis).unwrap_or(STARTUP_DELAY);
            commands::run_profile_command(&paths, ProfileCommand::Startup { delay, force }).await
        }
        Commands::Config { cmd } => match cmd {
            ConfigCmd::Show => commands::config_show(&paths),
            ConfigCmd::Lint { strict } => commands::config_lint(&paths, strict),
        },
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
