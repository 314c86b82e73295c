//! Port exposing the ingredient lines behind a user's shopping cart.

use async_trait::async_trait;

use crate::domain::{CartLine, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised while reading cart lines.
    pub enum ShoppingListRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "shopping list connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "shopping list query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShoppingListRepository: Send + Sync {
    /// One line per ingredient of every recipe in the user's cart.
    async fn cart_lines(&self, user: &UserId) -> Result<Vec<CartLine>, ShoppingListRepositoryError>;
}
