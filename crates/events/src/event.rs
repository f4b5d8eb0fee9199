use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of authentication lifecycle notification.
///
/// Mirrors the lifecycle an identity broker client reports: every
/// interactive or silent operation has a start, a success and a failure.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    AccountAdded,
    AccountRemoved,
    ActiveAccountChanged,
    LoginStart,
    LoginSuccess,
    LoginFailure,
    AcquireTokenStart,
    AcquireTokenSuccess,
    AcquireTokenFailure,
    SsoSilentStart,
    SsoSilentSuccess,
    SsoSilentFailure,
    LogoutStart,
    LogoutSuccess,
    LogoutFailure,
}

impl EventType {
    pub const ALL: [EventType; 15] = [
        EventType::AccountAdded,
        EventType::AccountRemoved,
        EventType::ActiveAccountChanged,
        EventType::LoginStart,
        EventType::LoginSuccess,
        EventType::LoginFailure,
        EventType::AcquireTokenStart,
        EventType::AcquireTokenSuccess,
        EventType::AcquireTokenFailure,
        EventType::SsoSilentStart,
        EventType::SsoSilentSuccess,
        EventType::SsoSilentFailure,
        EventType::LogoutStart,
        EventType::LogoutSuccess,
        EventType::LogoutFailure,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::AccountAdded => "auth.account.added",
            EventType::AccountRemoved => "auth.account.removed",
            EventType::ActiveAccountChanged => "auth.account.active_changed",
            EventType::LoginStart => "auth.login.start",
            EventType::LoginSuccess => "auth.login.success",
            EventType::LoginFailure => "auth.login.failure",
            EventType::AcquireTokenStart => "auth.acquire_token.start",
            EventType::AcquireTokenSuccess => "auth.acquire_token.success",
            EventType::AcquireTokenFailure => "auth.acquire_token.failure",
            EventType::SsoSilentStart => "auth.sso_silent.start",
            EventType::SsoSilentSuccess => "auth.sso_silent.success",
            EventType::SsoSilentFailure => "auth.sso_silent.failure",
            EventType::LogoutStart => "auth.logout.start",
            EventType::LogoutSuccess => "auth.logout.success",
            EventType::LogoutFailure => "auth.logout.failure",
        }
    }
}

impl core::fmt::Display for EventType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Notification that an authentication operation reached a lifecycle point.
///
/// Events are immutable facts. They are delivered to subscribers and never
/// stored.
///
/// `payload` is whatever the operation produced (typically the account and
/// its ID token claims); failure events usually carry only `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthEvent<P> {
    event_type: EventType,
    timestamp: DateTime<Utc>,
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    payload: Option<P>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<P> AuthEvent<P> {
    pub fn new(event_type: EventType, payload: Option<P>) -> Self {
        Self {
            event_type,
            timestamp: Utc::now(),
            payload,
            error: None,
        }
    }

    pub fn failure(event_type: EventType, error: impl Into<String>) -> Self {
        Self {
            event_type,
            timestamp: Utc::now(),
            payload: None,
            error: Some(error.into()),
        }
    }

    pub fn kind(&self) -> EventType {
        self.event_type
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn payload(&self) -> Option<&P> {
        self.payload.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
