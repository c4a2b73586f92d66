// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic. The adoption
// actions decide WHO gets notified; implementations decide HOW the message
// is delivered.
//
// Naming convention: Base* for trait names

use anyhow::Result;
use async_trait::async_trait;

// =============================================================================
// Push Notification Trait (Infrastructure)
// =============================================================================

/// The notification sink.
///
/// Written to only after a transaction commits, fire-and-forget: callers log
/// delivery failures and never roll back committed state because of them.
#[async_trait]
pub trait BasePushNotificationService: Send + Sync {
    /// Send a push notification to a push token
    async fn send_notification(
        &self,
        push_token: &str,
        title: &str,
        body: &str,
        data: serde_json::Value,
    ) -> Result<()>;
}
