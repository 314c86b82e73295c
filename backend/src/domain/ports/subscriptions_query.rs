//! Driving port listing the authors a user follows.

use async_trait::async_trait;
use pagination::PageParams;

use crate::domain::{Error, Page, SubscriptionProfile, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionsQuery: Send + Sync {
    /// Page through the authors `user` follows, each previewing up to
    /// `recipes_limit` recipes.
    async fn subscriptions(
        &self,
        user: &UserId,
        page: PageParams,
        recipes_limit: Option<usize>,
    ) -> Result<Page<SubscriptionProfile>, Error>;
}

/// Query port for a user with no subscriptions.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSubscriptionsQuery;

#[async_trait]
impl SubscriptionsQuery for FixtureSubscriptionsQuery {
    async fn subscriptions(
        &self,
        _user: &UserId,
        _page: PageParams,
        _recipes_limit: Option<usize>,
    ) -> Result<Page<SubscriptionProfile>, Error> {
        Ok(Page::empty())
    }
}
