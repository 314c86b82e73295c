//! Shopping list service.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{
    ShoppingListQuery, ShoppingListRepository, ShoppingListRepositoryError,
};
use crate::domain::{CART_EMPTY_MESSAGE, Error, ShoppingList, UserId};

/// Aggregates the cart lines read from the repository.
#[derive(Clone)]
pub struct ShoppingListService<L> {
    lines: Arc<L>,
}

impl<L> ShoppingListService<L> {
    pub fn new(lines: Arc<L>) -> Self {
        Self { lines }
    }
}

fn map_lines_error(error: ShoppingListRepositoryError) -> Error {
    match error {
        ShoppingListRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("shopping list repository unavailable: {message}"))
        }
        ShoppingListRepositoryError::Query { message } => {
            Error::internal(format!("shopping list repository error: {message}"))
        }
    }
}

#[async_trait]
impl<L> ShoppingListQuery for ShoppingListService<L>
where
    L: ShoppingListRepository,
{
    async fn shopping_list(&self, user: &UserId) -> Result<ShoppingList, Error> {
        let lines = self
            .lines
            .cart_lines(user)
            .await
            .map_err(map_lines_error)?;
        ShoppingList::aggregate(lines).ok_or_else(|| Error::not_found(CART_EMPTY_MESSAGE))
    }
}
