use crate::error::AppError;
use bcrypt::{hash, verify};

/// bcrypt cost used when nothing else is configured.
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// Hashes and verifies passwords. Holds no token or network logic.
#[derive(Clone)]
pub struct CredentialStore {
    cost: u32,
    // Compared against when the login email is unknown so both failure paths
    // pay for one full bcrypt verification.
    dummy_hash: String,
}

impl CredentialStore {
    pub fn new(cost: u32) -> Result<Self, AppError> {
        let dummy_hash = hash("taskguard-dummy-password", cost)?;
        Ok(Self { cost, dummy_hash })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Salted one-way hash; two calls with the same input never return the same string.
    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        hash(password, self.cost)
            .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))
    }

    /// Absence of a match is `false`, including when the stored hash is unreadable.
    pub fn verify(&self, password: &str, hashed_password: &str) -> bool {
        match verify(password, hashed_password) {
            Ok(matches) => matches,
            Err(e) => {
                log::warn!("stored password hash could not be checked: {}", e);
                false
            }
        }
    }

    /// Burns the same work as `verify` for a login key that matched no identity.
    /// Always `false`.
    pub fn verify_absent(&self, password: &str) -> bool {
        let _ = verify(password, &self.dummy_hash);
        false
    }
}
