/// The two reminders scheduled for every appointment. The wire names
/// ("vespera"/"dia") are what the first app release shipped with and are
/// kept for compatibility with tasks already sitting in the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ReminderKind {
    #[serde(rename = "vespera")]
    DayBefore,
    #[serde(rename = "dia")]
    SameDay,
}

impl ReminderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderKind::DayBefore => "vespera",
            ReminderKind::SameDay => "dia",
        }
    }
}

impl std::fmt::Display for ReminderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
