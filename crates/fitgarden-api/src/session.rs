// Injected session/token provider.
//
// The transport layer never reaches into ambient state for credentials:
// whoever constructs the ApiClient supplies a SessionProvider, and a 401
// from the backend surfaces as Error::SessionExpired for the caller to
// handle. This keeps the client testable without any global environment.

use secrecy::SecretString;

/// Supplies the bearer token attached to every backend request.
pub trait SessionProvider: Send + Sync {
    /// The token for the next request, or `None` for anonymous access.
    fn token(&self) -> Option<SecretString>;
}

/// A fixed token resolved once at startup (config file, env var, keyring).
pub struct StaticToken(SecretString);

impl StaticToken {
    pub fn new(token: SecretString) -> Self {
        Self(token)
    }
}

impl SessionProvider for StaticToken {
    fn token(&self) -> Option<SecretString> {
        Some(self.0.clone())
    }
}

/// No authentication — used by tests and local development backends.
pub struct Anonymous;

impl SessionProvider for Anonymous {
    fn token(&self) -> Option<SecretString> {
        None
    }
}
