// This runs the host on Windows without creating a console window. Disable
// during development to see stderr.
#![windows_subsystem = "windows"]

use anyhow::Result;
use clap::Parser;
use sitewatch::{
    daemon::{args::DaemonArgs, config::Config, start_daemon},
    utils::{
        dir::application_state_dir,
        logging::{enable_logging, DAEMON_PREFIX},
        runtime::daemon_runtime,
    },
};

fn main() {
    run_host_service().unwrap();
}

fn run_host_service() -> Result<()> {
    let args = DaemonArgs::parse();

    let app_dir = args.dir.map_or_else(application_state_dir, Ok)?;
    enable_logging(DAEMON_PREFIX, &app_dir, args.log, args.log_console).unwrap();
    let config = Config::load(&app_dir)?;
    daemon_runtime()?.block_on(async move { start_daemon(app_dir, config).await })?;
    Ok(())
}
