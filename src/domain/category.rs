/// Classifies a notification's cause; the client UI maps it to icon/text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationCategory {
    NewRequest,
    ClientAccepted,
    ClientDeclined,
    ServiceUpcoming,
    ServiceToday,
}

impl NotificationCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationCategory::NewRequest => "new-request",
            NotificationCategory::ClientAccepted => "client-accepted",
            NotificationCategory::ClientDeclined => "client-declined",
            NotificationCategory::ServiceUpcoming => "service-upcoming",
            NotificationCategory::ServiceToday => "service-today",
        }
    }
}

impl std::fmt::Display for NotificationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
