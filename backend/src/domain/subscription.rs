//! Subscription read model.

use crate::domain::{RecipeSummary, RelationMessages, UserProfile};

/// Error message for a user subscribing to themselves.
pub const SELF_SUBSCRIPTION_MESSAGE: &str = "cannot subscribe to self";

/// Messages used by the subscription relation.
pub const SUBSCRIPTION_MESSAGES: RelationMessages = RelationMessages {
    already_present: "already subscribed to this user",
    absent: "subscription not found",
    missing_target: "user not found",
};

/// Subscribed author with a preview of their recipes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionProfile {
    pub profile: UserProfile,
    /// Newest first, truncated to the requested limit.
    pub recipes: Vec<RecipeSummary>,
    /// Total number of recipes by the author, ignoring the limit.
    pub recipes_count: u64,
}
