//! Shopping list aggregation.
//!
//! Cart lines are grouped by the displayed `(name, measurement_unit)` pair,
//! not by ingredient id, so two catalogue rows that render identically share
//! one line. Groups are ordered by name, then unit.

use std::collections::BTreeMap;
use std::fmt::Write as _;

/// File name offered to clients downloading the list.
pub const SHOPPING_LIST_FILENAME: &str = "shopping_cart.txt";

/// Error message returned when the cart has nothing to aggregate.
pub const CART_EMPTY_MESSAGE: &str = "cart is empty";

/// One ingredient occurrence from a recipe in a user's cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub name: String,
    pub measurement_unit: String,
    pub amount: u32,
}

/// Summed amount for one `(name, unit)` group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListEntry {
    pub name: String,
    pub measurement_unit: String,
    pub total: u64,
}

/// Aggregated, sorted shopping list. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingList {
    entries: Vec<ShoppingListEntry>,
}

impl ShoppingList {
    /// Group and sum cart lines. Returns `None` when there is nothing to buy.
    ///
    /// # Examples
    /// ```
    /// use foodgram_backend::domain::{CartLine, ShoppingList};
    ///
    /// let sugar = |amount| CartLine {
    ///     name: "Sugar".into(),
    ///     measurement_unit: "g".into(),
    ///     amount,
    /// };
    /// let list = ShoppingList::aggregate([sugar(100), sugar(50)]).expect("non-empty");
    /// assert_eq!(list.render(), "- Sugar (g) — 150\n");
    /// ```
    pub fn aggregate(lines: impl IntoIterator<Item = CartLine>) -> Option<Self> {
        let mut groups: BTreeMap<(String, String), u64> = BTreeMap::new();
        for line in lines {
            *groups
                .entry((line.name, line.measurement_unit))
                .or_default() += u64::from(line.amount);
        }
        if groups.is_empty() {
            return None;
        }

        let entries = groups
            .into_iter()
            .map(|((name, measurement_unit), total)| ShoppingListEntry {
                name,
                measurement_unit,
                total,
            })
            .collect();
        Some(Self { entries })
    }

    pub fn entries(&self) -> &[ShoppingListEntry] {
        &self.entries
    }

    /// Render as `- <name> (<unit>) — <total>` lines, each newline-terminated.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            // Writing to a String cannot fail.
            let _ = writeln!(
                out,
                "- {} ({}) — {}",
                entry.name, entry.measurement_unit, entry.total
            );
        }
        out
    }
}
