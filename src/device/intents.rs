//! Contact intents: phone call, e-mail and WhatsApp deep links.
//!
//! Launching is fire-and-forget; nothing is awaited from the platform.

use std::fmt;
use std::sync::Mutex;

/// A request to contact a provider through a platform app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactIntent {
    Call(String),
    Email(String),
    WhatsApp(String),
}

impl ContactIntent {
    /// Deep link handed to the platform.
    ///
    /// ```
    /// use service_finder::device::ContactIntent;
    ///
    /// assert_eq!(ContactIntent::Call("+911234567890".into()).uri(), "tel:+911234567890");
    /// assert_eq!(
    ///     ContactIntent::WhatsApp("+911234567890".into()).uri(),
    ///     "whatsapp://send?phone=+911234567890"
    /// );
    /// ```
    #[must_use]
    pub fn uri(&self) -> String {
        match self {
            Self::Call(number) => format!("tel:{number}"),
            Self::Email(address) => format!("mailto:{address}"),
            Self::WhatsApp(number) => format!("whatsapp://send?phone={number}"),
        }
    }
}

impl fmt::Display for ContactIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri())
    }
}

/// Hands intents to the platform.
pub trait IntentLauncher: Send + Sync {
    fn launch(&self, intent: &ContactIntent);
}

/// Launcher for headless runs: logs each intent and keeps its URI.
#[derive(Debug, Default)]
pub struct LoggingLauncher {
    launched: Mutex<Vec<String>>,
}

impl LoggingLauncher {
    /// URIs launched so far, oldest first.
    #[must_use]
    pub fn launched(&self) -> Vec<String> {
        self.launched.lock().map(|uris| uris.clone()).unwrap_or_default()
    }
}

impl IntentLauncher for LoggingLauncher {
    fn launch(&self, intent: &ContactIntent) {
        let uri = intent.uri();
        tracing::info!(uri = %uri, "launching contact intent");
        if let Ok(mut launched) = self.launched.lock() {
            launched.push(uri);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_uses_mailto() {
        assert_eq!(
            ContactIntent::Email("help@example.com".into()).to_string(),
            "mailto:help@example.com"
        );
    }

    #[test]
    fn logging_launcher_records_uris() {
        let launcher = LoggingLauncher::default();
        launcher.launch(&ContactIntent::Call("100".into()));
        launcher.launch(&ContactIntent::Email("a@b.c".into()));
        assert_eq!(launcher.launched(), vec!["tel:100", "mailto:a@b.c"]);
    }
}
