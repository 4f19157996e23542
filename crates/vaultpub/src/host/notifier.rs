//! Notifications printed to the terminal.

use std::time::Duration;

use vaultpub_core::{NOTICE_ERROR, Notifier};

use crate::output::Output;

/// [`Notifier`] writing to stderr.
///
/// Long-lived notices are problems the user should act on and are shown as
/// warnings; the rest are shown as success messages.
pub(crate) struct TerminalNotifier {
    output: Output,
}

impl TerminalNotifier {
    pub(crate) fn new() -> Self {
        Self {
            output: Output::new(),
        }
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, message: &str, duration: Duration) {
        if duration >= NOTICE_ERROR {
            self.output.warning(message);
        } else {
            self.output.success(message);
        }
    }
}
