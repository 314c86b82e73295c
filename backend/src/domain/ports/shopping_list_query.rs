//! Driving port for the aggregated shopping list.

use async_trait::async_trait;

use crate::domain::{Error, ShoppingList, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShoppingListQuery: Send + Sync {
    /// Aggregate the user's cart. Fails with not found when the cart is
    /// empty.
    async fn shopping_list(&self, user: &UserId) -> Result<ShoppingList, Error>;
}

/// Query port for a store with no carts.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureShoppingListQuery;

#[async_trait]
impl ShoppingListQuery for FixtureShoppingListQuery {
    async fn shopping_list(&self, _user: &UserId) -> Result<ShoppingList, Error> {
        Err(Error::not_found(crate::domain::CART_EMPTY_MESSAGE))
    }
}
