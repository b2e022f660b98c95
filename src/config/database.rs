//! PostgreSQL connection pool initialization.
//!
//! The connection string is read from the `DATABASE_URL` environment
//! variable. The pool is created once at startup and cloned into the
//! application state; it is cheap to clone and safe to share across tasks.

use sqlx::PgPool;
use std::env;

/// Initializes the PostgreSQL connection pool.
///
/// # Panics
///
/// Panics if `DATABASE_URL` is not set or the database cannot be reached.
/// This runs once during startup, before the server accepts traffic.
pub async fn init_db_pool() -> PgPool {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to database")
}
