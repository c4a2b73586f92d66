// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps for tests.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use super::BasePushNotificationService;

// =============================================================================
// Mock Push Notification Service
// =============================================================================

/// A notification captured by the mock sink
#[derive(Debug, Clone)]
pub struct SentNotification {
    pub push_token: String,
    pub title: String,
    pub body: String,
    pub data: serde_json::Value,
}

/// Records every notification instead of delivering it.
#[derive(Default)]
pub struct MockPushNotificationService {
    sent: Arc<Mutex<Vec<SentNotification>>>,
}

impl MockPushNotificationService {
    pub fn new() -> Self {
        Self::default()
    }

    /// All notifications sent so far
    pub fn sent(&self) -> Vec<SentNotification> {
        self.sent.lock().unwrap().clone()
    }

    /// Notifications addressed to a specific push token
    pub fn sent_to(&self, push_token: &str) -> Vec<SentNotification> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.push_token == push_token)
            .cloned()
            .collect()
    }

    /// Check if a push token received anything
    pub fn was_notified(&self, push_token: &str) -> bool {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .any(|n| n.push_token == push_token)
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }
}

#[async_trait]
impl BasePushNotificationService for MockPushNotificationService {
    async fn send_notification(
        &self,
        push_token: &str,
        title: &str,
        body: &str,
        data: serde_json::Value,
    ) -> Result<()> {
        self.sent.lock().unwrap().push(SentNotification {
            push_token: push_token.to_string(),
            title: title.to_string(),
            body: body.to_string(),
            data,
        });
        Ok(())
    }
}
