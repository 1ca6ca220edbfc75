use tokio::select;
use tokio_util::sync::CancellationToken;

/// Resolves once the daemon should wind down, either because the process got
/// a termination signal or because another module cancelled the token (the
/// browser closing the bridge does that).
///
/// On Windows detached processes can't detect signals sent to them, there the
/// bridge EOF is the realistic shutdown path.
pub async fn detect_shutdown(cancellation: CancellationToken) {
    select! {
        _ = tokio::signal::ctrl_c() => {
            cancellation.cancel();
        },
        _ = cancellation.cancelled() => {},
    };
}
