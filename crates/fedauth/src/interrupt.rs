use std::sync::{Arc, Mutex, PoisonError};

use fedauth_okta::{CancellationToken, login::PushCancellation};
use tracing::{debug, warn};

/// Exit status of a process stopped by `SIGINT`.
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Routes `Ctrl-C`.
///
/// While an operation is armed a press cancels it, which is how the push wait is abandoned in
/// favor of a passcode. Any other press exits the process.
#[derive(Clone, Default)]
pub(crate) struct Interrupts {
    armed: Arc<Mutex<Option<CancellationToken>>>,
}

impl Interrupts {
    /// Starts listening for `Ctrl-C`. Must be called from within the runtime.
    pub(crate) fn listen() -> Self {
        let interrupts = Self::default();
        let handler = interrupts.clone();

        tokio::spawn(async move {
            loop {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    warn!(error = %e, "Unable to listen for Ctrl-C");
                    return;
                }
                handler.interrupted();
            }
        });

        interrupts
    }

    /// Returns a fresh token cancelled by the next press.
    fn arm(&self) -> CancellationToken {
        let token = CancellationToken::new();
        *self.lock() = Some(token.clone());
        token
    }

    pub(crate) fn disarm(&self) {
        self.lock().take();
    }

    fn interrupted(&self) {
        match self.lock().take() {
            Some(token) => {
                debug!("Cancelling the pending operation");
                token.cancel();
            }
            None => std::process::exit(INTERRUPTED_EXIT_CODE),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<CancellationToken>> {
        self.armed.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Presses only cancel the push wait once it has started, earlier ones exit.
impl PushCancellation for Interrupts {
    fn push_wait_started(&self) -> CancellationToken {
        self.arm()
    }
}
