//! Port for the join tables behind favourites, shopping carts and
//! subscriptions.
//!
//! Each adapter stores unique `(user, target)` pairs. The store's unique
//! constraint is the only arbiter of concurrent adds: a losing insert must
//! surface as [`RelationRepositoryError::AlreadyExists`].

use std::collections::HashSet;
use std::hash::Hash;

use async_trait::async_trait;

use crate::domain::UserId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by relation repositories.
    pub enum RelationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "relation repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "relation repository query failed: {message}",
        /// The pair is already present.
        AlreadyExists => "relation already exists",
        /// The target row vanished before the pair was written.
        MissingTarget => "relation target does not exist",
    }
}

/// Store of unique `(user, target)` pairs.
#[cfg_attr(test, mockall::automock(type Target = crate::domain::RecipeId;))]
#[async_trait]
pub trait RelationRepository: Send + Sync {
    /// Identifier of the related entity.
    type Target: Clone + Eq + Hash + Send + Sync + 'static;

    /// Insert the pair, failing with `AlreadyExists` if present.
    async fn insert(
        &self,
        user: &UserId,
        target: &Self::Target,
    ) -> Result<(), RelationRepositoryError>;

    /// Delete the pair. Returns whether a row was removed.
    async fn remove(
        &self,
        user: &UserId,
        target: &Self::Target,
    ) -> Result<bool, RelationRepositoryError>;

    /// Subset of `candidates` paired with `user`.
    async fn targets_among(
        &self,
        user: &UserId,
        candidates: &[Self::Target],
    ) -> Result<HashSet<Self::Target>, RelationRepositoryError>;
}

#[cfg(test)]
mockall::mock! {
    /// Relation repository mock keyed by author, for subscription tests.
    pub SubscriptionRelationRepository {}

    #[async_trait]
    impl RelationRepository for SubscriptionRelationRepository {
        type Target = UserId;

        async fn insert(
            &self,
            user: &UserId,
            target: &UserId,
        ) -> Result<(), RelationRepositoryError>;

        async fn remove(
            &self,
            user: &UserId,
            target: &UserId,
        ) -> Result<bool, RelationRepositoryError>;

        async fn targets_among(
            &self,
            user: &UserId,
            candidates: &[UserId],
        ) -> Result<HashSet<UserId>, RelationRepositoryError>;
    }
}
