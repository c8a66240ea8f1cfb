//! API endpoints.

mod auth;
mod ingredients;
mod recipes;
mod tags;
mod users;

use axum::Router;
use foodgram_core::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

use crate::middleware::AppState;

/// Default page size when the client does not ask for one.
pub(crate) const fn default_limit() -> u64 {
    DEFAULT_PAGE_SIZE
}

/// Cap a client-supplied page size at the hard ceiling.
pub(crate) const fn clamp_limit(limit: u64) -> u64 {
    if limit > MAX_PAGE_SIZE {
        MAX_PAGE_SIZE
    } else {
        limit
    }
}

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/tags", tags::router())
        .nest("/ingredients", ingredients::router())
        .nest("/recipes", recipes::router())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_limit_caps_at_ceiling() {
        assert_eq!(clamp_limit(5), 5);
        assert_eq!(clamp_limit(MAX_PAGE_SIZE), MAX_PAGE_SIZE);
        assert_eq!(clamp_limit(5000), MAX_PAGE_SIZE);
    }
}
