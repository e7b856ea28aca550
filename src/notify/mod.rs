// src/notify/mod.rs
//! Best-effort alerts to a chat. Delivery problems are logged, never raised,
//! so a failing alert can't trigger another alert.

pub mod telegram;

use async_trait::async_trait;

use crate::utils::config::AppConfig;
use crate::utils::error::NotifierError;

pub use telegram::TelegramTransport;

/// Upstream refusal or transport failure, described the way the API described it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportFailure {
    pub description: String,
}

impl TransportFailure {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

#[async_trait]
pub trait MessageTransport: Send + Sync {
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), TransportFailure>;
}

/// Maps an upstream error description onto the closed set of known causes.
pub fn classify(description: &str) -> NotifierError {
    let d = description.trim();
    match d {
        "Unauthorized" => NotifierError::MissingCredential,
        "Bad Request: message to edit not found" => NotifierError::MessageNotFound,
        "Bad Request: message to delete not found" => NotifierError::MessageAlreadyGone,
        "Bad Request: message can't be edited" => NotifierError::EditNotPermitted,
        "Bad Request: chat_id is empty" => NotifierError::MissingChatId,
        "Forbidden: bot was blocked by the user" => NotifierError::BlockedByUser,
        _ if d.starts_with("Bad Request: message is not modified") => NotifierError::MessageNotModified,
        _ => NotifierError::Unknown {
            description: description.to_string(),
        },
    }
}

pub struct Notifier {
    transport: Option<Box<dyn MessageTransport>>,
    chat_id: Option<String>,
}

impl Notifier {
    pub fn new(transport: Option<Box<dyn MessageTransport>>, chat_id: Option<String>) -> Self {
        Self { transport, chat_id }
    }

    /// Telegram-backed notifier. Without a token nothing is sent and every alert logs code 1.
    pub fn from_config(config: &AppConfig, http: reqwest::Client) -> Self {
        let transport = config
            .bot_token
            .clone()
            .map(|token| Box::new(TelegramTransport::new(http, token)) as Box<dyn MessageTransport>);
        Self::new(transport, config.chat_id.clone())
    }

    /// Sends `header` then `detail`. Never fails; delivery errors are logged with their code.
    pub async fn alert(&self, header: &str, detail: &str) {
        match self.try_alert(header, detail).await {
            Ok(()) => tracing::info!("Alert delivered: {}", header),
            Err(e) => tracing::error!(code = e.code(), "Failed to deliver alert '{}': {}", header, e),
        }
    }

    async fn try_alert(&self, header: &str, detail: &str) -> Result<(), NotifierError> {
        let transport = self.transport.as_ref().ok_or(NotifierError::MissingCredential)?;
        let chat_id = self.chat_id.as_deref().ok_or(NotifierError::MissingChatId)?;

        for text in [header, detail] {
            transport
                .send_message(chat_id, text)
                .await
                .map_err(|failure| classify(&failure.description))?;
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Records every message; optionally refuses all of them with one description.
    #[derive(Clone, Default)]
    pub(crate) struct RecordingTransport {
        pub sent: Arc<Mutex<Vec<(String, String)>>>,
        pub refuse_with: Option<&'static str>,
    }

    #[async_trait]
    impl MessageTransport for RecordingTransport {
        async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), TransportFailure> {
            if let Some(description) = self.refuse_with {
                return Err(TransportFailure::new(description));
            }
            self.sent
                .lock()
                .unwrap()
                .push((chat_id.to_string(), text.to_string()));
            Ok(())
        }
    }

    #[test]
    fn test_blocked_by_user_is_code_7() {
        let err = classify("Forbidden: bot was blocked by the user");
        assert_eq!(err, NotifierError::BlockedByUser);
        assert_eq!(err.code(), 7);
    }

    #[test]
    fn test_unknown_description_is_code_0_and_kept() {
        let err = classify("Too Many Requests: retry after 5");
        assert_eq!(err.code(), 0);
        assert_eq!(
            err,
            NotifierError::Unknown {
                description: "Too Many Requests: retry after 5".to_string()
            }
        );
    }

    #[test]
    fn test_known_descriptions_have_stable_codes() {
        let cases = [
            ("Unauthorized", 1),
            ("Bad Request: message to edit not found", 2),
            ("Bad Request: message to delete not found", 3),
            ("Bad Request: message can't be edited", 4),
            ("Bad Request: chat_id is empty", 5),
            ("Bad Request: message is not modified: specified new message content and reply markup are exactly the same", 6),
            ("Forbidden: bot was blocked by the user", 7),
        ];
        for (description, code) in cases {
            assert_eq!(classify(description).code(), code, "{}", description);
        }
    }

    #[tokio::test]
    async fn test_alert_sends_header_then_detail() {
        let transport = RecordingTransport::default();
        let sent = transport.sent.clone();
        let notifier = Notifier::new(Some(Box::new(transport)), Some("42".to_string()));

        notifier.alert("Nisab scraper error", "All 2 nisab strategies failed").await;

        let sent = sent.lock().unwrap();
        assert_eq!(
            *sent,
            vec![
                ("42".to_string(), "Nisab scraper error".to_string()),
                ("42".to_string(), "All 2 nisab strategies failed".to_string()),
            ]
        );
    }

    #[test]
    fn test_missing_configuration_is_classified_without_sending() {
        let notifier = Notifier::new(None, Some("42".to_string()));
        let err = tokio_test::block_on(notifier.try_alert("h", "d")).unwrap_err();
        assert_eq!(err.code(), 1);

        let transport = RecordingTransport::default();
        let sent = transport.sent.clone();
        let notifier = Notifier::new(Some(Box::new(transport)), None);
        let err = tokio_test::block_on(notifier.try_alert("h", "d")).unwrap_err();
        assert_eq!(err.code(), 5);
        assert!(sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_refused_delivery_is_swallowed() {
        let transport = RecordingTransport {
            refuse_with: Some("Forbidden: bot was blocked by the user"),
            ..RecordingTransport::default()
        };
        let notifier = Notifier::new(Some(Box::new(transport)), Some("42".to_string()));

        assert_eq!(
            notifier.try_alert("h", "d").await,
            Err(NotifierError::BlockedByUser)
        );
        // Public entry point must not propagate anything.
        notifier.alert("h", "d").await;
    }
}
