// SPDX-License-Identifier: AGPL-3.0-or-later

//! Shared application state.
//!
//! Constructed once in `main` and injected into handlers via axum's `State`.
//! There is no ambient singleton: everything a request needs travels through
//! this handle.

use sqlx::PgPool;

use crate::{auth::TokenKeys, config::Config};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub tokens: TokenKeys,
}

impl AppState {
    pub fn new(db: PgPool, config: &Config) -> Self {
        Self {
            db,
            tokens: TokenKeys::new(&config.jwt_secret),
        }
    }

    /// State over a lazy (unconnected) pool, for tests that never touch
    /// the database.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        let db = PgPool::connect_lazy("postgres://localhost/nft_market_test")
            .expect("lazy pool construction cannot fail on a well-formed URL");
        Self {
            db,
            tokens: TokenKeys::new("test-secret"),
        }
    }
}
