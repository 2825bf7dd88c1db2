use crate::domain::NotificationCategory;
use crate::push::PushMessage;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Everything a single dispatch needs: the inbox record fields plus the
/// free-form data payload forwarded to the devices.
#[derive(Debug, Clone)]
pub struct OutboundNotification {
    pub title: String,
    pub body: String,
    pub category: NotificationCategory,
    pub entity_id: Option<String>,
    pub deep_link: Option<String>,
    pub scheduled_for: Option<DateTime<Utc>>,
}

impl OutboundNotification {
    pub fn to_push_message(&self) -> PushMessage {
        let mut data = HashMap::new();
        data.insert("category".to_string(), self.category.as_str().to_string());
        if let Some(entity_id) = &self.entity_id {
            data.insert("entityId".to_string(), entity_id.clone());
        }
        if let Some(deep_link) = &self.deep_link {
            data.insert("deepLink".to_string(), deep_link.clone());
        }
        PushMessage {
            title: self.title.clone(),
            body: self.body.clone(),
            data,
        }
    }
}
