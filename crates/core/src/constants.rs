//! Domain limits shared across services.

/// Minimum cooking time in minutes.
pub const MIN_COOKING_TIME: i32 = 1;

/// Maximum cooking time in minutes.
pub const MAX_COOKING_TIME: i32 = 32_000;

/// Minimum ingredient amount per recipe line.
pub const MIN_INGREDIENT_AMOUNT: i32 = 1;

/// Maximum ingredient amount per recipe line.
pub const MAX_INGREDIENT_AMOUNT: i32 = 32_000;

/// Default page size for listings.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Hard ceiling for page size requested by clients.
pub const MAX_PAGE_SIZE: u64 = 100;
