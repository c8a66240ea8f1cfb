//! Business logic services.

#![allow(missing_docs)]

pub mod favorite;
pub mod follow;
pub mod ingredient;
pub mod recipe;
pub mod shopping_cart;
pub mod shopping_list;
pub mod tag;
pub mod user;

pub use favorite::FavoriteService;
pub use follow::{FollowService, Subscription, SubscriptionRecipe};
pub use ingredient::{CreateIngredientInput, CreateMeasurementUnitInput, IngredientService};
pub use recipe::{
    AuthorView, CreateRecipeInput, IngredientAmountInput, RecipeDetail, RecipeIngredientView,
    RecipeListFilter, RecipeService, TagView,
};
pub use shopping_cart::ShoppingCartService;
pub use shopping_list::{ShoppingListItem, ShoppingListService};
pub use tag::{CreateTagInput, TagService};
pub use user::{CreateUserInput, LoginInput, SetPasswordInput, UserService};
