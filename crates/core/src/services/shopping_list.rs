//! Shopping list aggregation.
//!
//! All ingredient lines across the user's cart come back from one bulk
//! query; grouping and summing happen here, in memory.

use std::collections::BTreeMap;

use foodgram_common::AppResult;
use foodgram_db::repositories::{CartIngredientRow, ShoppingCartRepository};
use serde::Serialize;

/// One aggregated line of the shopping list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShoppingListItem {
    pub name: String,
    pub total: i64,
    pub unit: String,
}

/// Shopping list service for business logic.
#[derive(Clone)]
pub struct ShoppingListService {
    cart_repo: ShoppingCartRepository,
}

impl ShoppingListService {
    /// Create a new shopping list service.
    #[must_use]
    pub const fn new(cart_repo: ShoppingCartRepository) -> Self {
        Self { cart_repo }
    }

    /// Build the aggregated shopping list for a user's cart.
    pub async fn build(&self, user_id: &str) -> AppResult<Vec<ShoppingListItem>> {
        let rows = self.cart_repo.find_cart_ingredient_rows(user_id).await?;
        Ok(aggregate(rows))
    }

    /// Render the user's shopping list as plain text for download.
    pub async fn render(&self, user_id: &str) -> AppResult<String> {
        let items = self.build(user_id).await?;
        Ok(render_text(&items))
    }
}

/// Group ingredient lines by (name, unit) and sum their amounts.
///
/// The same ingredient name under two different units stays as two lines.
/// `BTreeMap` keeps the output sorted by name (then unit), case-sensitive.
fn aggregate(rows: Vec<CartIngredientRow>) -> Vec<ShoppingListItem> {
    let mut totals: BTreeMap<(String, String), i64> = BTreeMap::new();

    for row in rows {
        *totals.entry((row.name, row.unit)).or_insert(0) += i64::from(row.amount);
    }

    totals
        .into_iter()
        .map(|((name, unit), total)| ShoppingListItem { name, total, unit })
        .collect()
}

/// Render aggregated items as the downloadable text document.
fn render_text(items: &[ShoppingListItem]) -> String {
    let mut out = String::from("Shopping list\n\n");

    for item in items {
        out.push_str(&format!("{}: {} {}\n", item.name, item.total, item.unit));
    }

    out
}
