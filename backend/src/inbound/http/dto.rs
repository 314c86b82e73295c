//! Wire representations shared by several handlers.
//!
//! Field names are snake_case to match the public Foodgram API. Domain types
//! stay free of serde renames; the conversions here are the only place the
//! JSON shape is decided.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Ingredient, IngredientAmount, IngredientId, RecipeDraft, RecipeDraftInput, RecipeIngredient,
    RecipeSummary, RecipeValidationError, RecipeView, SubscriptionProfile, Tag, TagId,
    UserProfile,
};

/// Public user profile with the viewer's subscription flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserProfileResponse {
    #[schema(example = "cook@example.com")]
    pub email: String,
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    #[schema(example = "cook")]
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// Whether the viewer subscribes to this user.
    pub is_subscribed: bool,
    pub avatar: Option<String>,
}

impl From<UserProfile> for UserProfileResponse {
    fn from(profile: UserProfile) -> Self {
        let UserProfile {
            user,
            is_subscribed,
        } = profile;
        Self {
            email: user.email.as_ref().to_owned(),
            id: user.id.to_string(),
            username: user.username.as_ref().to_owned(),
            first_name: user.first_name,
            last_name: user.last_name,
            is_subscribed,
            avatar: user.avatar,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TagResponse {
    pub id: i64,
    #[schema(example = "Breakfast")]
    pub name: String,
    #[schema(example = "breakfast")]
    pub slug: String,
}

impl From<Tag> for TagResponse {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id.get(),
            name: tag.name,
            slug: tag.slug.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IngredientResponse {
    pub id: i64,
    #[schema(example = "sugar")]
    pub name: String,
    #[schema(example = "g")]
    pub measurement_unit: String,
}

impl From<Ingredient> for IngredientResponse {
    fn from(ingredient: Ingredient) -> Self {
        Self {
            id: ingredient.id.get(),
            name: ingredient.name,
            measurement_unit: ingredient.measurement_unit,
        }
    }
}

/// Ingredient line of a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RecipeIngredientResponse {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
    pub amount: u32,
}

impl From<RecipeIngredient> for RecipeIngredientResponse {
    fn from(line: RecipeIngredient) -> Self {
        Self {
            id: line.ingredient.id.get(),
            name: line.ingredient.name,
            measurement_unit: line.ingredient.measurement_unit,
            amount: line.amount,
        }
    }
}

/// Full recipe read model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RecipeResponse {
    pub id: String,
    pub tags: Vec<TagResponse>,
    pub author: UserProfileResponse,
    pub ingredients: Vec<RecipeIngredientResponse>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: String,
    pub text: String,
    /// Minutes.
    pub cooking_time: u32,
    pub created_at: DateTime<Utc>,
}

impl From<RecipeView> for RecipeResponse {
    fn from(view: RecipeView) -> Self {
        let RecipeView {
            recipe,
            author_is_subscribed,
            is_favorited,
            is_in_shopping_cart,
        } = view;
        Self {
            id: recipe.id.to_string(),
            tags: recipe.tags.into_iter().map(TagResponse::from).collect(),
            author: UserProfile::new(recipe.author, author_is_subscribed).into(),
            ingredients: recipe
                .ingredients
                .into_iter()
                .map(RecipeIngredientResponse::from)
                .collect(),
            is_favorited,
            is_in_shopping_cart,
            name: recipe.name,
            image: recipe.image,
            text: recipe.text,
            cooking_time: recipe.cooking_time,
            created_at: recipe.created_at,
        }
    }
}

/// Short recipe representation used by relation toggles and subscription
/// previews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RecipeSummaryResponse {
    pub id: String,
    pub name: String,
    pub image: String,
    pub cooking_time: u32,
}

impl From<RecipeSummary> for RecipeSummaryResponse {
    fn from(summary: RecipeSummary) -> Self {
        Self {
            id: summary.id.to_string(),
            name: summary.name,
            image: summary.image,
            cooking_time: summary.cooking_time,
        }
    }
}

/// An author the viewer follows, with a preview of their recipes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionResponse {
    #[serde(flatten)]
    pub profile: UserProfileResponse,
    pub recipes: Vec<RecipeSummaryResponse>,
    /// Total recipes by the author, ignoring `recipes_limit`.
    pub recipes_count: u64,
}

impl From<SubscriptionProfile> for SubscriptionResponse {
    fn from(subscription: SubscriptionProfile) -> Self {
        Self {
            profile: subscription.profile.into(),
            recipes: subscription
                .recipes
                .into_iter()
                .map(RecipeSummaryResponse::from)
                .collect(),
            recipes_count: subscription.recipes_count,
        }
    }
}

/// Ingredient line of a recipe write request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IngredientAmountRequest {
    pub id: i64,
    pub amount: i64,
}

/// Body of `POST /recipes` and `PATCH /recipes/{id}`.
///
/// Numbers are accepted as signed integers so that out-of-range values reach
/// domain validation and are reported per field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RecipeRequest {
    pub ingredients: Vec<IngredientAmountRequest>,
    pub tags: Vec<i64>,
    /// Reference to an uploaded image.
    pub image: String,
    pub name: String,
    pub text: String,
    pub cooking_time: i64,
}

/// Map a signed wire number onto the domain's unsigned range. Values that do
/// not fit become zero, which domain validation rejects.
fn non_negative(value: i64) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

impl TryFrom<RecipeRequest> for RecipeDraft {
    type Error = RecipeValidationError;

    fn try_from(request: RecipeRequest) -> Result<Self, Self::Error> {
        RecipeDraft::new(RecipeDraftInput {
            name: request.name,
            image: request.image,
            text: request.text,
            cooking_time: non_negative(request.cooking_time),
            ingredients: request
                .ingredients
                .into_iter()
                .map(|line| IngredientAmount {
                    ingredient_id: IngredientId::new(line.id),
                    amount: non_negative(line.amount),
                })
                .collect(),
            tags: request.tags.into_iter().map(TagId::new).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Email, Slug, User, UserId, Username};
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn request() -> RecipeRequest {
        RecipeRequest {
            ingredients: vec![IngredientAmountRequest { id: 1, amount: 10 }],
            tags: vec![2],
            image: "recipes/tea.png".to_owned(),
            name: "Tea".to_owned(),
            text: "Steep.".to_owned(),
            cooking_time: 5,
        }
    }

    #[rstest]
    fn valid_request_becomes_draft(request: RecipeRequest) {
        let draft = RecipeDraft::try_from(request).expect("valid draft");
        assert_eq!(draft.cooking_time(), 5);
        assert_eq!(draft.tags(), &[TagId::new(2)]);
    }

    #[rstest]
    #[case(-1)]
    #[case(0)]
    #[case(i64::from(u32::MAX) + 1)]
    fn out_of_range_cooking_time_is_rejected(mut request: RecipeRequest, #[case] minutes: i64) {
        request.cooking_time = minutes;
        let error = RecipeDraft::try_from(request).expect_err("invalid cooking time");
        assert_eq!(error.field(), "cooking_time");
    }

    #[rstest]
    fn negative_amount_is_rejected(mut request: RecipeRequest) {
        request.ingredients[0].amount = -5;
        let error = RecipeDraft::try_from(request).expect_err("invalid amount");
        assert_eq!(error.field(), "ingredients");
    }

    #[rstest]
    fn subscription_flattens_profile_fields() {
        let user = User {
            id: UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("id"),
            email: Email::new("cook@example.com").expect("email"),
            username: Username::new("cook").expect("username"),
            first_name: "Ann".to_owned(),
            last_name: "Cook".to_owned(),
            avatar: None,
        };
        let response = SubscriptionResponse::from(SubscriptionProfile {
            profile: UserProfile::new(user, true),
            recipes: Vec::new(),
            recipes_count: 3,
        });

        let value = serde_json::to_value(&response).expect("serialises");
        assert_eq!(
            value,
            json!({
                "email": "cook@example.com",
                "id": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
                "username": "cook",
                "first_name": "Ann",
                "last_name": "Cook",
                "is_subscribed": true,
                "avatar": null,
                "recipes": [],
                "recipes_count": 3,
            })
        );
    }

    #[rstest]
    fn tag_response_exposes_slug() {
        let tag = Tag {
            id: TagId::new(4),
            name: "Lunch".to_owned(),
            slug: Slug::new("lunch").expect("slug"),
        };
        assert_eq!(
            TagResponse::from(tag),
            TagResponse {
                id: 4,
                name: "Lunch".to_owned(),
                slug: "lunch".to_owned(),
            }
        );
    }
}
