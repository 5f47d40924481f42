use crate::storage::{Storage, StorageError};
use reqwest::header::{
    HeaderMap, HeaderValue, InvalidHeaderValue, AUTHORIZATION,
};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;

/// The key the bearer token is stored under.
pub const TOKEN_KEY: &str = "token";
/// The key the JSON-encoded user record is stored under.
pub const USER_KEY: &str = "user";

/// The logged-in user's token and profile, kept in a [`Storage`].
///
/// The token and the user are independent; either may be missing.
#[derive(Debug, Clone)]
pub struct SessionStore {
    storage: Arc<dyn Storage>,
}

impl SessionStore {
    pub fn new<S: Storage + 'static>(storage: S) -> Self {
        SessionStore {
            storage: Arc::new(storage),
        }
    }

    pub fn from_shared(storage: Arc<dyn Storage>) -> Self {
        SessionStore { storage }
    }

    /// Remember the token and user returned by a successful login,
    /// overwriting any previous session.
    pub fn set_auth<U>(&self, token: &str, user: &U) -> Result<(), SessionError>
    where
        U: Serialize + ?Sized,
    {
        let user = serde_json::to_string(user)?;

        self.storage
            .set_many(&[(TOKEN_KEY, token), (USER_KEY, user.as_str())])?;

        Ok(())
    }

    pub fn token(&self) -> Option<String> { self.storage.get(TOKEN_KEY) }

    /// The stored user, or `None` if it is missing or can't be parsed.
    pub fn user<U: DeserializeOwned>(&self) -> Option<U> {
        let raw = self.storage.get(USER_KEY)?;

        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                log::debug!("Ignoring the unreadable stored user: {}", e);
                None
            },
        }
    }

    /// Headers which authenticate a request as the current user.
    ///
    /// This is empty when nobody is logged in.
    pub fn auth_header(&self) -> Result<HeaderMap, InvalidHeaderValue> {
        let mut headers = HeaderMap::new();

        if let Some(token) = self.token() {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        Ok(headers)
    }

    /// Forget the current token and user.
    pub fn clear(&self) -> Result<(), SessionError> {
        self.storage.remove(TOKEN_KEY)?;
        self.storage.remove(USER_KEY)?;

        Ok(())
    }
}

/// Possible errors when saving a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Unable to save the session")]
    Storage(#[from] StorageError),
    #[error("Unable to serialize the user")]
    Serialize(#[from] serde_json::Error),
}
