//! Session
//!
//! Authentication state for talking to the backend. A session is an owned value with an
//! explicit lifecycle: it starts anonymous, [`Session::login`] stores tokens, and
//! [`Session::logout`] wipes them. Clients receive the session they should use rather
//! than reading it from anywhere global.

use std::{fmt, sync::Arc};

use jiff::Timestamp;
use serde::Deserialize;
use tokio::sync::RwLock;
use zeroize::Zeroize;

/// A session shared between the clients that issue requests on its behalf.
pub type SharedSession = Arc<RwLock<Session>>;

/// A bearer or refresh token, wiped from memory on drop.
#[derive(Clone)]
pub struct SecretToken(String);

impl SecretToken {
    /// Wrap a raw token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretToken(***)")
    }
}

impl Drop for SecretToken {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    /// User id
    pub id: String,

    /// Display name
    pub name: String,

    /// Role, e.g. `"cashier"`
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone)]
struct Tokens {
    access: SecretToken,
    refresh: Option<SecretToken>,
}

/// Authentication context for backend requests.
#[derive(Debug, Clone, Default)]
pub struct Session {
    tokens: Option<Tokens>,
    user: Option<SessionUser>,
    started_at: Option<Timestamp>,
}

impl Session {
    /// An anonymous session; requests are sent without credentials.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Store credentials, replacing any previous ones.
    pub fn login(
        &mut self,
        access: SecretToken,
        refresh: Option<SecretToken>,
        user: Option<SessionUser>,
    ) {
        self.tokens = Some(Tokens { access, refresh });
        self.user = user;
        self.started_at = Some(Timestamp::now());
    }

    /// Replace the access token after a refresh, keeping the rest of the session.
    pub fn rotate_access_token(&mut self, access: SecretToken) {
        if let Some(tokens) = self.tokens.as_mut() {
            tokens.access = access;
        }
    }

    /// Wipe credentials and user identity.
    pub fn logout(&mut self) {
        self.tokens = None;
        self.user = None;
        self.started_at = None;
    }

    /// Whether credentials are held.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.tokens.is_some()
    }

    /// Access token for the `Authorization` header.
    #[must_use]
    pub fn bearer(&self) -> Option<&str> {
        self.tokens.as_ref().map(|tokens| tokens.access.expose())
    }

    /// Refresh token, if one was issued.
    #[must_use]
    pub fn refresh_token(&self) -> Option<&str> {
        self.tokens
            .as_ref()
            .and_then(|tokens| tokens.refresh.as_ref())
            .map(SecretToken::expose)
    }

    /// The signed-in user.
    #[must_use]
    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    /// When the current login started.
    #[must_use]
    pub fn started_at(&self) -> Option<Timestamp> {
        self.started_at
    }

    /// Wrap this session for sharing between clients.
    #[must_use]
    pub fn shared(self) -> SharedSession {
        Arc::new(RwLock::new(self))
    }
}
