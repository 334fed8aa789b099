use std::sync::Arc;

use crate::auth::{CredentialStore, TokenService};
use crate::store::{TaskRepository, UserRepository};

/// Shared, read-only-after-startup application state handed to every handler
/// through `web::Data<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub tasks: Arc<dyn TaskRepository>,
    pub tokens: TokenService,
    pub credentials: CredentialStore,
}

impl AppState {
    /// Builds state over one store that serves both repositories.
    pub fn new<S>(store: Arc<S>, tokens: TokenService, credentials: CredentialStore) -> Self
    where
        S: UserRepository + TaskRepository + 'static,
    {
        Self {
            users: store.clone(),
            tasks: store,
            tokens,
            credentials,
        }
    }
}
