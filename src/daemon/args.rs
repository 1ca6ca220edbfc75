use std::path::PathBuf;

use clap::Parser;
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
pub struct DaemonArgs {
    #[arg(long)]
    pub dir: Option<PathBuf>,
    /// This option is for debugging purposes only.
    #[arg(long = "log-console")]
    pub log_console: bool,
    #[arg(long = "log-filter")]
    pub log: Option<LevelFilter>,
    /// The browser passes its extension origin as the first argument when it
    /// launches the host. Nothing here needs it.
    #[arg(hide = true)]
    pub origin: Option<String>,
    /// Chrome on Windows also hands over the window handle of the caller.
    #[arg(long = "parent-window", hide = true)]
    pub parent_window: Option<String>,
}
