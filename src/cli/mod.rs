pub mod host_manifest;
pub mod output;
pub mod process;

use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;

use crate::{
    daemon::{
        config::Config,
        start_daemon,
        storage::{
            export::ExportDocument,
            snapshot::{Snapshot, SnapshotStorage, SnapshotStorageImpl},
        },
        tracking::state::TrackerState,
    },
    utils::{
        dir::application_state_dir,
        logging::{enable_logging, CLI_PREFIX},
    },
};

#[derive(Parser, Debug)]
#[command(name = "Sitewatch", version, long_about = None)]
#[command(about = "Tracks time spent on websites through a browser extension", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, help = "Enable console logging")]
    log: bool,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(
        about = "Register the native-messaging host manifest so the browser can launch the daemon"
    )]
    Init {
        #[arg(long, help = "Id of the extension allowed to talk to the host")]
        extension_id: String,
        #[arg(
            long,
            help = "Directory for the manifest. Defaults to Chrome's per-user NativeMessagingHosts directory"
        )]
        manifest_dir: Option<PathBuf>,
    },
    #[command(
        about = "Run the native-messaging host attached to the current console. Used by the browser and for debugging"
    )]
    Serve {
        #[arg(
            long,
            help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
        )]
        dir: Option<PathBuf>,
    },
    #[command(about = "Stop currently running daemon.")]
    Stop {},
    #[command(about = "Display the tracked sessions and today's totals")]
    Status {
        #[arg(long, help = "Application directory")]
        dir: Option<PathBuf>,
    },
    #[command(
        about = "Write the export document: sessions, daily totals and the classification table"
    )]
    Export {
        #[arg(long, help = "Application directory")]
        dir: Option<PathBuf>,
        #[arg(
            short,
            long,
            help = "Output file. Defaults to productivity-data-<date>.json in the working directory"
        )]
        out: Option<PathBuf>,
    },
    #[command(about = "Zero the visible timer. Session accumulation survives unless --sessions is given")]
    Reset {
        #[arg(long, help = "Application directory")]
        dir: Option<PathBuf>,
        #[arg(long, help = "Also forget per-website accumulation and daily totals")]
        sessions: bool,
    },
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(CLI_PREFIX, &application_state_dir()?, logging_level, args.log)?;

    match args.commands {
        Commands::Init {
            extension_id,
            manifest_dir,
        } => {
            let path = host_manifest::install(&extension_id, manifest_dir)?;
            println!("Installed host manifest at {}", path.display());
            Ok(())
        }
        Commands::Serve { dir } => {
            let dir = resolve_dir(dir)?;
            let config = Config::load(&dir)?;
            start_daemon(dir, config).await
        }
        Commands::Stop {} => {
            let terminated = process::kill_running_daemons(&host_manifest::daemon_path()?);
            println!("Stopped {terminated} daemon(s)");
            Ok(())
        }
        Commands::Status { dir } => {
            let snapshot = load_snapshot(dir).await?;
            output::print_status(&snapshot);
            Ok(())
        }
        Commands::Export { dir, out } => {
            let dir = resolve_dir(dir)?;
            let config = Config::load(&dir)?;
            let snapshot = SnapshotStorageImpl::new(dir)?.load().await?;

            let now = Utc::now();
            let document = ExportDocument::build(&snapshot, &config.classifier(), now);
            let out =
                out.unwrap_or_else(|| PathBuf::from(ExportDocument::file_name(now.date_naive())));
            tokio::fs::write(&out, document.to_pretty_json()?).await?;
            println!("Exported data to {}", out.display());
            Ok(())
        }
        Commands::Reset { dir, sessions } => {
            let storage = SnapshotStorageImpl::new(resolve_dir(dir)?)?;
            let mut state = TrackerState::from(storage.load().await?);
            if sessions {
                state.clear_sessions();
                println!("Cleared the timer and all tracked sessions");
            } else {
                state.reset_timer();
                println!("Timer reset");
            }
            storage.save(&Snapshot::from(&state)).await?;
            Ok(())
        }
    }
}

fn resolve_dir(dir: Option<PathBuf>) -> Result<PathBuf> {
    dir.map_or_else(application_state_dir, Ok)
}

async fn load_snapshot(dir: Option<PathBuf>) -> Result<Snapshot> {
    SnapshotStorageImpl::new(resolve_dir(dir)?)?.load().await
}
