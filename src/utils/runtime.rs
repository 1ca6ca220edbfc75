use anyhow::Result;

/// The daemon is cooperative and timer-driven, a single thread is all it needs.
pub fn daemon_runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}
