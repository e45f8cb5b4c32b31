//! Ctrl-C handling

use tokio_util::sync::CancellationToken;

/// Exit status after a forced interrupt
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Token cancelled on the first Ctrl-C
///
/// A second Ctrl-C exits immediately.
pub fn cancel_on_interrupt() -> CancellationToken {
    let token = CancellationToken::new();
    let interrupted = token.clone();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        tracing::warn!("Interrupted, cancelling (press Ctrl-C again to exit)");
        interrupted.cancel();

        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(INTERRUPTED_EXIT_CODE);
        }
    });

    token
}
