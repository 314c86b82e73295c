//! User profile read service.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::PageParams;

use crate::domain::ports::{RelationRepository, UserPersistenceError, UserRepository, UsersQuery};
use crate::domain::recipes_service::map_flag_error;
use crate::domain::{Error, Page, User, UserId, UserProfile};

/// Serves user profiles flagged with the viewer's subscriptions.
#[derive(Clone)]
pub struct UsersService<U, S> {
    users: Arc<U>,
    subscriptions: Arc<S>,
}

impl<U, S> UsersService<U, S> {
    pub fn new(users: Arc<U>, subscriptions: Arc<S>) -> Self {
        Self {
            users,
            subscriptions,
        }
    }
}

pub(crate) fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

pub(crate) fn user_not_found(id: &UserId) -> Error {
    Error::not_found(format!("user {id} not found"))
}

impl<U, S> UsersService<U, S>
where
    U: UserRepository,
    S: RelationRepository<Target = UserId>,
{
    async fn profiles(
        &self,
        viewer: Option<&UserId>,
        users: Vec<User>,
    ) -> Result<Vec<UserProfile>, Error> {
        let Some(viewer) = viewer else {
            return Ok(users
                .into_iter()
                .map(|user| UserProfile::new(user, false))
                .collect());
        };
        if users.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<UserId> = users.iter().map(|user| user.id.clone()).collect();
        let subscribed = self
            .subscriptions
            .targets_among(viewer, &ids)
            .await
            .map_err(map_flag_error)?;
        Ok(users
            .into_iter()
            .map(|user| {
                let is_subscribed = subscribed.contains(&user.id);
                UserProfile::new(user, is_subscribed)
            })
            .collect())
    }
}

#[async_trait]
impl<U, S> UsersQuery for UsersService<U, S>
where
    U: UserRepository,
    S: RelationRepository<Target = UserId>,
{
    async fn users(
        &self,
        viewer: Option<UserId>,
        page: PageParams,
    ) -> Result<Page<UserProfile>, Error> {
        let Page { items, total } = self.users.list(&page).await.map_err(map_user_error)?;
        let items = self.profiles(viewer.as_ref(), items).await?;
        Ok(Page::new(items, total))
    }

    async fn user(&self, viewer: Option<UserId>, id: &UserId) -> Result<UserProfile, Error> {
        let user = self
            .users
            .find_by_id(id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| user_not_found(id))?;
        self.profiles(viewer.as_ref(), vec![user])
            .await?
            .pop()
            .ok_or_else(|| user_not_found(id))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::domain::ports::{MockSubscriptionRelationRepository, MockUserRepository};
    use crate::domain::{Email, ErrorCode, Username};
    use rstest::rstest;

    fn user(username: &str) -> User {
        User {
            id: UserId::random(),
            email: Email::new(format!("{username}@example.com")).expect("email"),
            username: Username::new(username).expect("username"),
            first_name: String::new(),
            last_name: String::new(),
            avatar: None,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn list_flags_subscribed_authors_for_viewer() {
        let (ada, bob) = (user("ada"), user("bob"));
        let ada_id = ada.id.clone();
        let mut users = MockUserRepository::new();
        users
            .expect_list()
            .times(1)
            .return_once(move |_| Ok(Page::new(vec![ada, bob], 2)));
        let mut subscriptions = MockSubscriptionRelationRepository::new();
        subscriptions
            .expect_targets_among()
            .times(1)
            .return_once(move |_, _| Ok(HashSet::from([ada_id])));

        let page = UsersService::new(Arc::new(users), Arc::new(subscriptions))
            .users(Some(UserId::random()), PageParams::default())
            .await
            .expect("users page");

        let flags: Vec<bool> = page.items.iter().map(|p| p.is_subscribed).collect();
        assert_eq!(flags, vec![true, false]);
        assert_eq!(page.total, 2);
    }

    #[rstest]
    #[tokio::test]
    async fn anonymous_viewer_never_sees_subscriptions() {
        let ada = user("ada");
        let id = ada.id.clone();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(ada)));
        let mut subscriptions = MockSubscriptionRelationRepository::new();
        subscriptions.expect_targets_among().never();

        let profile = UsersService::new(Arc::new(users), Arc::new(subscriptions))
            .user(None, &id)
            .await
            .expect("profile");
        assert!(!profile.is_subscribed);
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().times(1).return_once(|_| Ok(None));

        let error = UsersService::new(
            Arc::new(users),
            Arc::new(MockSubscriptionRelationRepository::new()),
        )
        .user(None, &UserId::random())
        .await
        .expect_err("missing user");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }
}
