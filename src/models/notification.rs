use crate::schema::notifications;
use chrono::offset::Utc;
use chrono::DateTime;

/// An inbox record, rendered by the client app's notification screen.
/// Insert-only from this service; the `read` flag is flipped by the app.
#[derive(Queryable)]
pub struct Notification {
    pub id: uuid::Uuid,
    pub recipient_id: String,
    pub title: String,
    pub message: String,
    pub category: String,
    pub entity_id: Option<String>,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

// `read` and `created_at` are left to their database defaults so that
// creation time is assigned by the store, not the client.
#[derive(Insertable)]
#[table_name = "notifications"]
pub struct NewNotification<'a> {
    pub id: &'a uuid::Uuid,
    pub recipient_id: &'a str,
    pub title: &'a str,
    pub message: &'a str,
    pub category: &'a str,
    pub entity_id: Option<&'a str>,
    pub scheduled_for: Option<DateTime<Utc>>,
}
