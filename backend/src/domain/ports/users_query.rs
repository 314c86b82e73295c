//! Driving port for user-facing queries.
//!
//! Inbound adapters (HTTP handlers) use this port to fetch user profiles
//! without importing outbound persistence concerns.

use async_trait::async_trait;
use pagination::PageParams;

use crate::domain::{Error, Page, UserId, UserProfile};

/// Domain use-case port for reading user profiles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Page through users ordered by username, flagged for `viewer`.
    async fn users(
        &self,
        viewer: Option<UserId>,
        page: PageParams,
    ) -> Result<Page<UserProfile>, Error>;

    /// Fetch one profile as seen by `viewer`.
    async fn user(&self, viewer: Option<UserId>, id: &UserId) -> Result<UserProfile, Error>;
}

/// Users query over an empty directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUsersQuery;

#[async_trait]
impl UsersQuery for FixtureUsersQuery {
    async fn users(
        &self,
        _viewer: Option<UserId>,
        _page: PageParams,
    ) -> Result<Page<UserProfile>, Error> {
        Ok(Page::empty())
    }

    async fn user(&self, _viewer: Option<UserId>, id: &UserId) -> Result<UserProfile, Error> {
        Err(Error::not_found(format!("user {id} not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn fixture_users_query_is_empty() {
        let query = FixtureUsersQuery;
        let page = query
            .users(None, PageParams::default())
            .await
            .expect("users page");
        assert_eq!(page.total, 0);

        let error = query
            .user(None, &UserId::random())
            .await
            .expect_err("no users");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }
}
