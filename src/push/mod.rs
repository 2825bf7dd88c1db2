mod fcm_push_gateway;

use async_trait::async_trait;
use std::collections::HashMap;

pub use fcm_push_gateway::FcmPushGateway;

#[derive(Debug, Clone)]
pub struct PushMessage {
    pub title: String,
    pub body: String,
    pub data: HashMap<String, String>,
}

/// Per-token result of a multicast send, in token order.
#[derive(Debug, Clone)]
pub struct MulticastSummary {
    pub outcomes: Vec<SendOutcome>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    Delivered,
    Failed(FailureKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    Unregistered,
    InvalidToken,
    Other(String),
}

impl FailureKind {
    /// Whether the token should be dropped from the user's registration list.
    pub fn invalidates_token(&self) -> bool {
        matches!(self, FailureKind::Unregistered | FailureKind::InvalidToken)
    }
}

#[async_trait]
pub trait PushGateway: Send + Sync {
    async fn send_multicast(
        &self,
        tokens: &[String],
        message: &PushMessage,
    ) -> Result<MulticastSummary, anyhow::Error>;
}
