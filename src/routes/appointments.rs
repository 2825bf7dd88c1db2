use crate::domain::ReminderKind;
use crate::scheduler::{schedule_reminder, ReminderContext};
use crate::startup::NotifyDbConn;
use crate::tasks::TaskQueue;
use anyhow::Context;
use chrono::{DateTime, Utc};
use diesel::{ExpressionMethods, RunQueryDsl};
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use std::sync::Arc;

#[derive(Default, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDocument {
    pub assignee_id: Option<String>,
    pub requester_id: Option<String>,
    pub service_name: Option<String>,
    pub service_title: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
}

#[derive(serde::Deserialize)]
pub struct AppointmentCreated {
    pub id: String,
    #[serde(default)]
    pub data: AppointmentDocument,
}

/// Persists the appointment (the reminder callback reads it back by id) and
/// enqueues the two reminder tasks. The enqueues run joined, not chained:
/// one queue rejection must not cost the other reminder.
#[tracing::instrument(
    name = "Handling a created appointment",
    skip(event, conn, task_queue, reminders),
    fields(appointment_id = %event.id)
)]
#[post("/events/appointments/created", data = "<event>")]
pub async fn appointment_created(
    event: Json<AppointmentCreated>,
    conn: NotifyDbConn,
    task_queue: &State<Arc<dyn TaskQueue>>,
    reminders: &State<ReminderContext>,
) -> Result<(), Status> {
    let event = event.into_inner();
    upsert_appointment(&conn, event.id.clone(), event.data.clone())
        .await
        .map_err(|error| {
            tracing::error!(error.cause_chain = ?error, "Failed to save the appointment");
            Status::InternalServerError
        })?;

    let starts_at = match event.data.starts_at {
        Some(starts_at) => starts_at,
        None => return Ok(()),
    };

    let queue = task_queue.inner().as_ref();
    let (day_before, same_day) = tokio::join!(
        schedule_reminder(
            queue,
            reminders,
            &event.id,
            starts_at,
            ReminderKind::DayBefore
        ),
        schedule_reminder(
            queue,
            reminders,
            &event.id,
            starts_at,
            ReminderKind::SameDay
        ),
    );
    for (kind, result) in [
        (ReminderKind::DayBefore, day_before),
        (ReminderKind::SameDay, same_day),
    ] {
        if let Err(error) = result {
            tracing::error!(
                error.cause_chain = ?error,
                kind = %kind,
                "Failed to schedule a reminder"
            );
        }
    }
    Ok(())
}

#[tracing::instrument(name = "Saving the appointment", skip(conn, document))]
async fn upsert_appointment(
    conn: &NotifyDbConn,
    appointment_id: String,
    document: AppointmentDocument,
) -> Result<(), anyhow::Error> {
    use crate::schema::appointments;
    conn.run(move |c| {
        diesel::insert_into(appointments::table)
            .values((
                appointments::id.eq(appointment_id),
                appointments::assignee_id.eq(document.assignee_id.clone()),
                appointments::requester_id.eq(document.requester_id.clone()),
                appointments::service_name.eq(document.service_name.clone()),
                appointments::service_title.eq(document.service_title.clone()),
                appointments::starts_at.eq(document.starts_at),
            ))
            .on_conflict(appointments::id)
            .do_update()
            .set((
                appointments::assignee_id.eq(document.assignee_id),
                appointments::requester_id.eq(document.requester_id),
                appointments::service_name.eq(document.service_name),
                appointments::service_title.eq(document.service_title),
                appointments::starts_at.eq(document.starts_at),
            ))
            .execute(c)
    })
    .await
    .context("Failed to upsert the appointment record.")?;
    Ok(())
}
