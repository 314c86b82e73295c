//! Subscription service: follow/unfollow authors and list followed authors.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::PageParams;

use crate::domain::ports::{
    RecipeRepository, RelationRepository, SubscriptionsCommand, SubscriptionsQuery,
    UserRepository,
};
use crate::domain::recipes_service::map_recipe_error;
use crate::domain::relation::{self, TargetRepresentation};
use crate::domain::users_service::map_user_error;
use crate::domain::{
    Error, Page, RelationAction, RelationOutcome, SELF_SUBSCRIPTION_MESSAGE,
    SUBSCRIPTION_MESSAGES, SubscriptionProfile, User, UserId, UserProfile,
};

/// Builds subscription profiles previewing up to `recipes_limit` recipes.
///
/// Profiles are always flagged as subscribed: they are only built for
/// authors the viewer follows or is about to follow.
pub struct SubscriptionProfiles<U, R> {
    users: Arc<U>,
    recipes: Arc<R>,
    recipes_limit: Option<usize>,
}

impl<U, R> SubscriptionProfiles<U, R>
where
    U: UserRepository,
    R: RecipeRepository,
{
    pub fn new(users: Arc<U>, recipes: Arc<R>, recipes_limit: Option<usize>) -> Self {
        Self {
            users,
            recipes,
            recipes_limit,
        }
    }

    async fn profile(&self, author: User) -> Result<SubscriptionProfile, Error> {
        let preview = self
            .recipes
            .author_recipes(&author.id, self.recipes_limit)
            .await
            .map_err(map_recipe_error)?;
        Ok(SubscriptionProfile {
            profile: UserProfile::new(author, true),
            recipes: preview.recipes,
            recipes_count: preview.total,
        })
    }
}

#[async_trait]
impl<U, R> TargetRepresentation<UserId> for SubscriptionProfiles<U, R>
where
    U: UserRepository,
    R: RecipeRepository,
{
    type Representation = SubscriptionProfile;

    async fn exists(&self, target: &UserId) -> Result<bool, Error> {
        let user = self.users.find_by_id(target).await.map_err(map_user_error)?;
        Ok(user.is_some())
    }

    async fn represent(&self, target: &UserId) -> Result<Option<SubscriptionProfile>, Error> {
        match self.users.find_by_id(target).await.map_err(map_user_error)? {
            Some(author) => self.profile(author).await.map(Some),
            None => Ok(None),
        }
    }
}

/// Subscription service over the user, recipe and subscription stores.
#[derive(Clone)]
pub struct SubscriptionsService<U, R, S> {
    users: Arc<U>,
    recipes: Arc<R>,
    subscriptions: Arc<S>,
}

impl<U, R, S> SubscriptionsService<U, R, S> {
    pub fn new(users: Arc<U>, recipes: Arc<R>, subscriptions: Arc<S>) -> Self {
        Self {
            users,
            recipes,
            subscriptions,
        }
    }
}

impl<U, R, S> SubscriptionsService<U, R, S>
where
    U: UserRepository,
    R: RecipeRepository,
{
    fn profiles(&self, recipes_limit: Option<usize>) -> SubscriptionProfiles<U, R> {
        SubscriptionProfiles::new(
            Arc::clone(&self.users),
            Arc::clone(&self.recipes),
            recipes_limit,
        )
    }
}

#[async_trait]
impl<U, R, S> SubscriptionsCommand for SubscriptionsService<U, R, S>
where
    U: UserRepository,
    R: RecipeRepository,
    S: RelationRepository<Target = UserId>,
{
    async fn subscription(
        &self,
        user: &UserId,
        author: &UserId,
        action: RelationAction,
        recipes_limit: Option<usize>,
    ) -> Result<RelationOutcome<SubscriptionProfile>, Error> {
        if user == author {
            return Err(Error::conflict(SELF_SUBSCRIPTION_MESSAGE));
        }
        relation::apply(
            self.subscriptions.as_ref(),
            &self.profiles(recipes_limit),
            &SUBSCRIPTION_MESSAGES,
            user,
            author,
            action,
        )
        .await
    }
}

#[async_trait]
impl<U, R, S> SubscriptionsQuery for SubscriptionsService<U, R, S>
where
    U: UserRepository,
    R: RecipeRepository,
    S: RelationRepository<Target = UserId>,
{
    async fn subscriptions(
        &self,
        user: &UserId,
        page: PageParams,
        recipes_limit: Option<usize>,
    ) -> Result<Page<SubscriptionProfile>, Error> {
        let Page { items, total } = self
            .users
            .subscribed_authors(user, &page)
            .await
            .map_err(map_user_error)?;
        let builder = self.profiles(recipes_limit);
        let mut profiles = Vec::with_capacity(items.len());
        for author in items {
            profiles.push(builder.profile(author).await?);
        }
        Ok(Page::new(profiles, total))
    }
}

#[cfg(test)]
#[path = "subscriptions_service_tests.rs"]
mod tests;
