//! UI/backend events and error modeling for desktop GUI controller.

use shared::domain::Car;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Info(String),
    /// Latest rendered state of the mounted list.
    CarsChanged(Vec<Car>),
    CarCreated(Car),
    CreateRejected(String),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    EventFeed,
    DeleteCar,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("timeout")
            || message_lower.contains("timed out")
            || message_lower.contains("connection")
            || message_lower.contains("connect")
            || message_lower.contains("network")
            || message_lower.contains("dns")
            || message_lower.contains("unavailable")
            || message_lower.contains("disconnect")
        {
            UiErrorCategory::Transport
        } else if message_lower.contains("invalid")
            || message_lower.contains("missing")
            || message_lower.contains("malformed")
            || message_lower.contains("not found")
            || message_lower.contains("no record")
        {
            UiErrorCategory::Validation
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// One-line text for the status banner.
    pub fn banner_text(&self) -> String {
        match self.category {
            UiErrorCategory::Transport => {
                format!("Record service unreachable; check the URL/network: {}", self.message)
            }
            _ => self.message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{UiError, UiErrorCategory, UiErrorContext};

    #[test]
    fn classifies_connection_failures_as_transport() {
        let err = UiError::from_message(
            UiErrorContext::EventFeed,
            "event feed connection failed: ws://127.0.0.1:1/cars/events: Connection refused",
        );
        assert_eq!(err.category(), UiErrorCategory::Transport);
        assert!(err.banner_text().starts_with("Record service unreachable"));
    }

    #[test]
    fn classifies_missing_record_as_validation() {
        let err = UiError::from_message(UiErrorContext::DeleteCar, "No record found for id '9'");
        assert_eq!(err.category(), UiErrorCategory::Validation);
        assert_eq!(err.context(), UiErrorContext::DeleteCar);
        assert_eq!(err.banner_text(), "No record found for id '9'");
    }
}
