//! Credential validation port

use crate::error::DomainError;
use crate::value_objects::UserId;

/// Resolves a bearer credential to the user it was issued for
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, credential: &str) -> Result<UserId, DomainError>;
}
