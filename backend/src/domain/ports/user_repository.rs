//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;
use pagination::PageParams;

use crate::domain::{Page, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Page through all users ordered by username.
    async fn list(&self, page: &PageParams) -> Result<Page<User>, UserPersistenceError>;

    /// Page through the authors `subscriber` follows, ordered by username.
    async fn subscribed_authors(
        &self,
        subscriber: &UserId,
        page: &PageParams,
    ) -> Result<Page<User>, UserPersistenceError>;
}
