use chrono::offset::Utc;
use chrono::DateTime;

#[derive(Queryable)]
pub struct Appointment {
    pub id: String,
    pub assignee_id: Option<String>,
    pub requester_id: Option<String>,
    pub service_name: Option<String>,
    pub service_title: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
}

impl Appointment {
    /// First non-empty of the two service-name fields still in use.
    pub fn service_label(&self) -> &str {
        [self.service_name.as_deref(), self.service_title.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
            .unwrap_or("")
    }
}
