//! Test harness with testcontainers for integration testing.
//!
//! Uses a shared container across all tests for dramatically improved
//! performance. The container and migrations are initialized once on the
//! first test, then reused; each test gets a fresh pool and fresh fixtures.

use anyhow::{Context, Result};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use test_context::AsyncTestContext;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

use server_core::domains::auth::JwtService;
use server_core::kernel::{
    BasePushNotificationService, MockPushNotificationService, ServerDeps,
};
use server_core::server::router_with_deps;

use super::ApiClient;

/// Shared test infrastructure that persists across all tests.
struct SharedTestInfra {
    db_url: String,
    // Keep the container alive for the entire test run
    _postgres: ContainerAsync<Postgres>,
}

/// Global shared infrastructure - initialized once, reused by all tests.
static SHARED_INFRA: OnceCell<SharedTestInfra> = OnceCell::const_new();

impl SharedTestInfra {
    /// Initialize shared infrastructure (container + migrations).
    async fn init() -> Result<Self> {
        // Respect RUST_LOG; try_init() avoids panicking if already set up.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let postgres = Postgres::default()
            .with_tag("16")
            .with_cmd(["-c", "max_connections=200"])
            .start()
            .await
            .context("Failed to start Postgres container")?;

        let pg_host = postgres.get_host().await?;
        let pg_port = postgres.get_host_port_ipv4(5432).await?;
        let db_url = format!(
            "postgresql://postgres:postgres@{}:{}/postgres",
            pg_host, pg_port
        );

        // Run migrations once on the shared database
        let pool = PgPool::connect(&db_url)
            .await
            .context("Failed to connect to Postgres for migrations")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;

        Ok(Self {
            db_url,
            _postgres: postgres,
        })
    }

    async fn get() -> &'static Self {
        SHARED_INFRA
            .get_or_init(|| async {
                Self::init()
                    .await
                    .expect("Failed to initialize shared test infrastructure")
            })
            .await
    }
}

/// Test harness that manages test infrastructure.
///
/// Each test gets a fresh context with the mock notification sink wired in,
/// but reuses the same database container.
///
/// # Example using test-context
///
/// ```ignore
/// use test_context::test_context;
///
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &TestHarness) {
///     let shelter = create_user(Role::Shelter, &ctx.db_pool).await.unwrap();
///     // ... test code
/// }
/// ```
pub struct TestHarness {
    /// Database pool - use this for test fixtures.
    pub db_pool: PgPool,
    /// Dependencies as the actions see them.
    pub deps: Arc<ServerDeps>,
    /// The recording notification sink behind `deps.push_service`.
    pub push: Arc<MockPushNotificationService>,
    /// Token service shared with the API client.
    pub jwt: Arc<JwtService>,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::new().await.expect("Failed to create test harness")
    }

    async fn teardown(self) {
        // Database pool is automatically dropped
    }
}

impl TestHarness {
    pub async fn new() -> Result<Self> {
        let infra = SharedTestInfra::get().await;

        // Fresh pool for this test
        let db_pool = PgPool::connect(&infra.db_url)
            .await
            .context("Failed to connect to test database")?;

        let jwt = Arc::new(JwtService::new("test_secret", "test_issuer".to_string()));
        let push = Arc::new(MockPushNotificationService::new());

        let deps = Arc::new(ServerDeps::new(
            db_pool.clone(),
            push.clone() as Arc<dyn BasePushNotificationService>,
            jwt.clone(),
            Duration::from_secs(5),
        ));

        Ok(Self {
            db_pool,
            deps,
            push,
            jwt,
        })
    }

    /// Deps with a custom lock wait bound, for contention tests.
    pub fn deps_with_lock_timeout(&self, timeout: Duration) -> Arc<ServerDeps> {
        Arc::new(ServerDeps::new(
            self.db_pool.clone(),
            self.push.clone() as Arc<dyn BasePushNotificationService>,
            self.jwt.clone(),
            timeout,
        ))
    }

    /// In-process API client over the real router.
    pub fn api(&self) -> ApiClient {
        ApiClient::new(
            router_with_deps(self.db_pool.clone(), self.deps.clone()),
            self.jwt.clone(),
        )
    }
}
