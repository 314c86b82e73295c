//! Add/remove toggle shared by favourites, shopping carts and subscriptions.
//!
//! Every `(user, target)` pair is either absent or present. Adding a present
//! pair is a conflict and removing an absent one is not found; neither is a
//! no-op. The target must exist before anything is written.

use async_trait::async_trait;

use crate::domain::Error;
use crate::domain::UserId;
use crate::domain::ports::{RelationRepository, RelationRepositoryError};

/// Direction of a toggle request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationAction {
    Add,
    Remove,
}

/// Result of a successful toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationOutcome<R> {
    /// The pair was created; carries the target's short representation.
    Added(R),
    Removed,
}

/// Client-facing messages for one relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationMessages {
    pub already_present: &'static str,
    pub absent: &'static str,
    pub missing_target: &'static str,
}

/// Messages used by the favourites relation.
pub const FAVORITE_MESSAGES: RelationMessages = RelationMessages {
    already_present: "recipe is already in favorites",
    absent: "recipe is not in favorites",
    missing_target: "recipe not found",
};

/// Messages used by the shopping cart relation.
pub const SHOPPING_CART_MESSAGES: RelationMessages = RelationMessages {
    already_present: "recipe is already in the shopping cart",
    absent: "recipe is not in the shopping cart",
    missing_target: "recipe not found",
};

/// Builds the short representation returned after an add.
#[async_trait]
pub trait TargetRepresentation<T: Sync>: Send + Sync {
    type Representation: Send;

    /// Whether the target exists at all.
    async fn exists(&self, target: &T) -> Result<bool, Error>;

    /// Short representation, or `None` when the target does not exist.
    async fn represent(&self, target: &T) -> Result<Option<Self::Representation>, Error>;
}

fn map_relation_error(error: RelationRepositoryError, messages: &RelationMessages) -> Error {
    match error {
        RelationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("relation repository unavailable: {message}"))
        }
        RelationRepositoryError::Query { message } => {
            Error::internal(format!("relation repository error: {message}"))
        }
        RelationRepositoryError::AlreadyExists => Error::conflict(messages.already_present),
        RelationRepositoryError::MissingTarget => Error::not_found(messages.missing_target),
    }
}

/// Add or remove the `(user, target)` pair.
///
/// The existence check runs before the mutation; the mutation itself is a
/// single insert or delete so concurrent adds are settled by the store.
pub async fn apply<R, P>(
    relations: &R,
    representations: &P,
    messages: &RelationMessages,
    user: &UserId,
    target: &R::Target,
    action: RelationAction,
) -> Result<RelationOutcome<P::Representation>, Error>
where
    R: RelationRepository + ?Sized,
    P: TargetRepresentation<R::Target> + ?Sized,
{
    match action {
        RelationAction::Add => {
            let representation = representations
                .represent(target)
                .await?
                .ok_or_else(|| Error::not_found(messages.missing_target))?;
            relations
                .insert(user, target)
                .await
                .map_err(|err| map_relation_error(err, messages))?;
            Ok(RelationOutcome::Added(representation))
        }
        RelationAction::Remove => {
            if !representations.exists(target).await? {
                return Err(Error::not_found(messages.missing_target));
            }
            let removed = relations
                .remove(user, target)
                .await
                .map_err(|err| map_relation_error(err, messages))?;
            if removed {
                Ok(RelationOutcome::Removed)
            } else {
                Err(Error::not_found(messages.absent))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::RecipeId;
    use crate::domain::ports::MockRelationRepository;
    use rstest::rstest;

    /// Representation source that knows about exactly one recipe.
    struct KnownRecipe(Option<RecipeId>);

    #[async_trait]
    impl TargetRepresentation<RecipeId> for KnownRecipe {
        type Representation = String;

        async fn exists(&self, target: &RecipeId) -> Result<bool, Error> {
            Ok(self.0.as_ref() == Some(target))
        }

        async fn represent(&self, target: &RecipeId) -> Result<Option<String>, Error> {
            Ok((self.0.as_ref() == Some(target)).then(|| format!("recipe {target}")))
        }
    }

    fn known(recipe: RecipeId) -> KnownRecipe {
        KnownRecipe(Some(recipe))
    }

    #[rstest]
    #[tokio::test]
    async fn add_inserts_and_returns_representation() {
        let (user, recipe) = (UserId::random(), RecipeId::random());
        let mut repo = MockRelationRepository::new();
        repo.expect_insert().times(1).return_once(|_, _| Ok(()));

        let outcome = apply(
            &repo,
            &known(recipe),
            &FAVORITE_MESSAGES,
            &user,
            &recipe,
            RelationAction::Add,
        )
        .await
        .expect("add succeeds");

        assert_eq!(outcome, RelationOutcome::Added(format!("recipe {recipe}")));
    }

    #[rstest]
    #[tokio::test]
    async fn repeated_add_is_a_conflict() {
        let (user, recipe) = (UserId::random(), RecipeId::random());
        let mut repo = MockRelationRepository::new();
        repo.expect_insert()
            .times(1)
            .return_once(|_, _| Err(RelationRepositoryError::already_exists()));

        let error = apply(
            &repo,
            &known(recipe),
            &FAVORITE_MESSAGES,
            &user,
            &recipe,
            RelationAction::Add,
        )
        .await
        .expect_err("duplicate add fails");

        assert_eq!(error.code(), ErrorCode::Conflict);
        assert_eq!(error.message(), FAVORITE_MESSAGES.already_present);
    }

    #[rstest]
    #[case(RelationAction::Add)]
    #[case(RelationAction::Remove)]
    #[tokio::test]
    async fn missing_target_fails_before_any_mutation(#[case] action: RelationAction) {
        let (user, recipe) = (UserId::random(), RecipeId::random());
        let mut repo = MockRelationRepository::new();
        repo.expect_insert().never();
        repo.expect_remove().never();

        let error = apply(
            &repo,
            &KnownRecipe(None),
            &SHOPPING_CART_MESSAGES,
            &user,
            &recipe,
            action,
        )
        .await
        .expect_err("missing recipe");

        assert_eq!(error.code(), ErrorCode::NotFound);
        assert_eq!(error.message(), SHOPPING_CART_MESSAGES.missing_target);
    }

    #[rstest]
    #[case(true, None)]
    #[case(false, Some(ErrorCode::NotFound))]
    #[tokio::test]
    async fn remove_reports_absent_pairs(
        #[case] removed: bool,
        #[case] expected_error: Option<ErrorCode>,
    ) {
        let (user, recipe) = (UserId::random(), RecipeId::random());
        let mut repo = MockRelationRepository::new();
        repo.expect_remove()
            .times(1)
            .return_once(move |_, _| Ok(removed));

        let result = apply(
            &repo,
            &known(recipe),
            &SHOPPING_CART_MESSAGES,
            &user,
            &recipe,
            RelationAction::Remove,
        )
        .await;

        match expected_error {
            None => assert_eq!(result.expect("removed"), RelationOutcome::Removed),
            Some(code) => {
                let error = result.expect_err("absent pair");
                assert_eq!(error.code(), code);
                assert_eq!(error.message(), SHOPPING_CART_MESSAGES.absent);
            }
        }
    }

    #[rstest]
    #[case(RelationRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(RelationRepositoryError::query("syntax"), ErrorCode::InternalError)]
    #[case(RelationRepositoryError::missing_target(), ErrorCode::NotFound)]
    #[tokio::test]
    async fn store_failures_map_to_domain_codes(
        #[case] failure: RelationRepositoryError,
        #[case] expected: ErrorCode,
    ) {
        let (user, recipe) = (UserId::random(), RecipeId::random());
        let mut repo = MockRelationRepository::new();
        repo.expect_insert()
            .times(1)
            .return_once(move |_, _| Err(failure));

        let error = apply(
            &repo,
            &known(recipe),
            &FAVORITE_MESSAGES,
            &user,
            &recipe,
            RelationAction::Add,
        )
        .await
        .expect_err("store failure");

        assert_eq!(error.code(), expected);
    }
}
