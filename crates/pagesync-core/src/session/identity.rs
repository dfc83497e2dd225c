//! Identity endpoint port.

use async_trait::async_trait;

use super::model::User;
use crate::error::IdentityError;
use crate::token::Token;

/// Exchanges a bearer token for the identity it belongs to.
///
/// Implementations issue exactly one request per call and never retry.
#[async_trait]
pub trait IdentityGateway: Send + Sync {
    /// Resolves `token` to a user.
    ///
    /// # Returns
    ///
    /// - `Ok(User)`: the backend accepted the token
    /// - `Err(IdentityError::Rejected)`: the backend answered with an error indicator
    /// - `Err(IdentityError::Network | Decode)`: no usable answer
    async fn fetch_identity(&self, token: &Token) -> Result<User, IdentityError>;
}
