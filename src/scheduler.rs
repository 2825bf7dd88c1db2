use crate::configuration::Settings;
use crate::domain::ReminderKind;
use crate::tasks::{HttpTask, TaskQueue};
use anyhow::{anyhow, Context};
use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};

/// What the scheduling and callback paths need at runtime: the audience's
/// wall-clock offset and where the queue should deliver callbacks.
#[derive(Clone)]
pub struct ReminderContext {
    pub utc_offset: FixedOffset,
    pub callback_url: String,
}

impl ReminderContext {
    pub fn from_settings(configuration: &Settings) -> Result<Self, anyhow::Error> {
        let utc_offset = FixedOffset::east_opt(configuration.reminders.utc_offset_hours * 3600)
            .ok_or_else(|| {
                anyhow!(
                    "{} is not a valid UTC offset in hours.",
                    configuration.reminders.utc_offset_hours
                )
            })?;
        Ok(Self {
            utc_offset,
            callback_url: format!("{}/reminders/callback", configuration.application.base_url),
        })
    }
}

/// Fire-times are anchored to the appointment's local calendar date:
/// the day before at 09:00, or the day itself at 08:00.
pub fn reminder_fire_time(
    starts_at: DateTime<Utc>,
    kind: ReminderKind,
    utc_offset: FixedOffset,
) -> Option<DateTime<FixedOffset>> {
    let local = starts_at.with_timezone(&utc_offset);
    let (date, hour) = match kind {
        ReminderKind::DayBefore => (local.date_naive() - Duration::days(1), 9),
        ReminderKind::SameDay => (local.date_naive(), 8),
    };
    utc_offset
        .from_local_datetime(&date.and_hms_opt(hour, 0, 0)?)
        .single()
}

#[tracing::instrument(
    name = "Enqueueing a reminder task",
    skip(task_queue, context, starts_at),
    fields(appointment_id = %appointment_id, kind = %kind)
)]
pub async fn schedule_reminder(
    task_queue: &dyn TaskQueue,
    context: &ReminderContext,
    appointment_id: &str,
    starts_at: DateTime<Utc>,
    kind: ReminderKind,
) -> Result<(), anyhow::Error> {
    let fire_at = reminder_fire_time(starts_at, kind, context.utc_offset)
        .ok_or_else(|| anyhow!("Could not compute a fire-time for {}.", appointment_id))?;
    let body = serde_json::to_vec(&serde_json::json!({
        "agId": appointment_id,
        "tipo": kind,
    }))
    .context("Failed to encode the reminder payload.")?;

    task_queue
        .enqueue_http_task(HttpTask {
            url: context.callback_url.clone(),
            body,
            schedule_time: fire_at.timestamp(),
        })
        .await
        .context("Failed to enqueue the reminder task.")
}
