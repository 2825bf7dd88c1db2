mod category;
mod outbound_notification;
mod reminder_kind;

pub use category::*;
pub use outbound_notification::*;
pub use reminder_kind::*;

/// Deep link consumed by the mobile app's router.
pub fn deep_link(resource_type: &str, entity_id: &str) -> String {
    format!("app://{}/{}", resource_type, entity_id)
}
