//! Login, registration and logout.
//!
//! A successful login or registration persists the token pair to a
//! `KeyValueStore` and arms the `ApiClient` session with the access token.
//! Logout invalidates the refresh token server-side, then forgets both tokens
//! locally.

use tracing::{info, warn};

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::hooks::state::RequestState;
use crate::hooks::Phase;
use crate::messages::Locale;
use crate::storage::{KeyValueStore, StorageError, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
use crate::transport::Transport;
use crate::types::{Credentials, TokenPair};

#[derive(Debug, Default)]
pub struct AuthFlow {
    state: RequestState,
    success: Option<String>,
    locale: Locale,
}

impl AuthFlow {
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            ..Self::default()
        }
    }

    pub fn login<T: Transport, S: KeyValueStore>(
        &mut self,
        api: &mut ApiClient<T>,
        store: &mut S,
        email: &str,
        password: &str,
    ) -> bool {
        self.begin();
        let credentials = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        let result = api.login(&credentials);
        let success = self.locale.login_success();
        let succeeded = self.sign_in(api, store, result, success);
        if succeeded {
            info!(email, "logged in");
        }
        succeeded
    }

    /// Fails with a validation error, without any request, when the
    /// passwords differ.
    pub fn register<T: Transport, S: KeyValueStore>(
        &mut self,
        api: &mut ApiClient<T>,
        store: &mut S,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> bool {
        self.begin();
        if password != confirm_password {
            let err = ApiError::Validation(self.locale.password_mismatch().to_string());
            return self.complete(Err(err), "");
        }
        let credentials = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        let result = api.register(&credentials);
        let success = self.locale.register_success();
        let succeeded = self.sign_in(api, store, result, success);
        if succeeded {
            info!(email, "registered");
        }
        succeeded
    }

    /// Sends the stored refresh token to the server, then clears the session
    /// and both stored tokens whatever the server answered.
    pub fn logout<T: Transport, S: KeyValueStore>(
        &mut self,
        api: &mut ApiClient<T>,
        store: &mut S,
    ) -> bool {
        self.begin();
        let server = match store.get(REFRESH_TOKEN_KEY) {
            Ok(Some(token)) if !token.is_empty() => api.logout(&token).map(|_| ()),
            Ok(_) => Ok(()),
            Err(e) => Err(e.into()),
        };

        info!(server_acknowledged = server.is_ok(), "logging out");

        // `clear` overwrites the store wholesale, so it also repairs a
        // corrupt token file.
        api.clear_token();
        let local = store.clear().map_err(ApiError::from);

        let success = self.locale.logout_success();
        self.complete(server.and(local), success)
    }

    /// Re-arm the session from a previously stored access token. Returns
    /// whether a session was restored.
    pub fn restore<T: Transport, S: KeyValueStore>(
        &mut self,
        api: &mut ApiClient<T>,
        store: &S,
    ) -> bool {
        match store.get(ACCESS_TOKEN_KEY) {
            Ok(Some(token)) if !token.is_empty() => {
                api.set_token(token);
                true
            }
            Ok(_) => false,
            Err(e) => {
                warn!(error = %e, "could not read stored tokens");
                let err = ApiError::from(e);
                self.state.fail(self.locale.describe(&err));
                false
            }
        }
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error()
    }

    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    fn begin(&mut self) {
        self.success = None;
        self.state.begin();
    }

    /// Persist the pair first; the session is armed only once both tokens
    /// are stored. A failed write leaves neither token behind.
    fn sign_in<T: Transport, S: KeyValueStore>(
        &mut self,
        api: &mut ApiClient<T>,
        store: &mut S,
        result: Result<TokenPair, ApiError>,
        success: &str,
    ) -> bool {
        let result = result.and_then(|pair| match persist(store, &pair) {
            Ok(()) => Ok(pair),
            Err(e) => {
                discard_tokens(store);
                Err(e.into())
            }
        });
        if let Ok(pair) = &result {
            api.set_token(pair.access_token.clone());
        }
        self.complete(result.map(|_| ()), success)
    }

    fn complete(&mut self, result: Result<(), ApiError>, success: &str) -> bool {
        match result {
            Ok(()) => {
                self.success = Some(success.to_string());
                self.state.succeed();
                true
            }
            Err(err) => {
                warn!(error = %err, "auth request failed");
                self.state.fail(self.locale.describe_auth(&err));
                false
            }
        }
    }
}

/// An unreadable store is reset once and the write retried.
fn persist<S: KeyValueStore>(store: &mut S, pair: &TokenPair) -> Result<(), StorageError> {
    match write_pair(store, pair) {
        Err(StorageError::Corrupt { path, source }) => {
            warn!(path = %path.display(), error = %source, "token store unreadable, resetting");
            store.clear()?;
            write_pair(store, pair)
        }
        other => other,
    }
}

fn write_pair<S: KeyValueStore>(store: &mut S, pair: &TokenPair) -> Result<(), StorageError> {
    store.set(ACCESS_TOKEN_KEY, &pair.access_token)?;
    store.set(REFRESH_TOKEN_KEY, &pair.refresh_token)
}

fn discard_tokens<S: KeyValueStore>(store: &mut S) {
    for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY] {
        if let Err(e) = store.remove(key) {
            warn!(key, error = %e, "could not discard partially stored token");
        }
    }
}
