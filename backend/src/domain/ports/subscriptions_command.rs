//! Driving port for following and unfollowing authors.

use async_trait::async_trait;

use crate::domain::{Error, RelationAction, RelationOutcome, SubscriptionProfile, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionsCommand: Send + Sync {
    /// Subscribe `user` to `author`, or remove the subscription.
    ///
    /// Subscribing to oneself is a conflict and touches nothing. On add, the
    /// returned profile previews up to `recipes_limit` recipes.
    async fn subscription(
        &self,
        user: &UserId,
        author: &UserId,
        action: RelationAction,
        recipes_limit: Option<usize>,
    ) -> Result<RelationOutcome<SubscriptionProfile>, Error>;
}

/// Command port over an empty user directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSubscriptionsCommand;

#[async_trait]
impl SubscriptionsCommand for FixtureSubscriptionsCommand {
    async fn subscription(
        &self,
        user: &UserId,
        author: &UserId,
        _action: RelationAction,
        _recipes_limit: Option<usize>,
    ) -> Result<RelationOutcome<SubscriptionProfile>, Error> {
        if user == author {
            return Err(Error::conflict(crate::domain::SELF_SUBSCRIPTION_MESSAGE));
        }
        Err(Error::not_found(format!("user {author} not found")))
    }
}
