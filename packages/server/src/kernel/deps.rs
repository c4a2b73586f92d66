//! Server dependencies for domain actions (using traits for testability)
//!
//! This module provides the central dependency container handed to every
//! action. External services use trait abstractions to enable testing.

use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

use crate::domains::auth::JwtService;
use crate::kernel::BasePushNotificationService;

/// Server dependencies accessible to actions
#[derive(Clone)]
pub struct ServerDeps {
    pub db_pool: PgPool,
    pub push_service: Arc<dyn BasePushNotificationService>,
    /// JWT service for token verification (and creation in tests)
    pub jwt_service: Arc<JwtService>,
    /// Upper bound on how long a transaction waits for a pet row lock.
    pub lock_timeout: Duration,
}

impl ServerDeps {
    /// Create new ServerDeps with the given dependencies
    pub fn new(
        db_pool: PgPool,
        push_service: Arc<dyn BasePushNotificationService>,
        jwt_service: Arc<JwtService>,
        lock_timeout: Duration,
    ) -> Self {
        Self {
            db_pool,
            push_service,
            jwt_service,
            lock_timeout,
        }
    }
}
