use crate::dispatch::dispatch;
use crate::domain::{deep_link, NotificationCategory, OutboundNotification, ReminderKind};
use crate::models::Appointment;
use crate::push::PushGateway;
use crate::routes::error_chain_fmt;
use crate::scheduler::ReminderContext;
use crate::startup::NotifyDbConn;
use anyhow::Context;
use diesel::{OptionalExtension, QueryDsl, RunQueryDsl};
use rocket::http::Status;
use rocket::response::{Responder, Response};
use rocket::serde::json::Json;
use rocket::{Request, State};
use std::sync::Arc;

/// Body the queue runner POSTs back at fire-time. Field names are part of
/// the queue's wire contract, set when the task was enqueued.
#[derive(serde::Deserialize)]
pub struct ReminderCallback {
    #[serde(rename = "agId")]
    pub appointment_id: Option<String>,
    #[serde(rename = "tipo")]
    pub kind: Option<ReminderKind>,
}

#[derive(thiserror::Error)]
pub enum CallbackError {
    #[error("agId/tipo missing")]
    MissingFields,
    #[error("appointment not found")]
    UnknownAppointment,
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for CallbackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl<'r> Responder<'r, 'static> for CallbackError {
    fn respond_to(self, request: &'r Request<'_>) -> rocket::response::Result<'static> {
        tracing::warn!("CallbackError: {:?}", self);
        let (status, body) = match self {
            CallbackError::MissingFields => (Status::BadRequest, "agId/tipo missing"),
            CallbackError::UnknownAppointment => (Status::NotFound, "appointment not found"),
            CallbackError::UnexpectedError(_) => (Status::InternalServerError, "internal error"),
        };
        Response::build_from(body.respond_to(request)?)
            .status(status)
            .ok()
    }
}

/// The queue retries on 5xx, so everything here must tolerate a duplicate
/// delivery; re-running only adds another (acceptable) inbox record.
#[tracing::instrument(
    name = "Handling a reminder callback",
    skip(body, conn, push_gateway, reminders)
)]
#[post("/reminders/callback", data = "<body>")]
pub async fn reminder_callback(
    body: Json<ReminderCallback>,
    conn: NotifyDbConn,
    push_gateway: &State<Arc<dyn PushGateway>>,
    reminders: &State<ReminderContext>,
) -> Result<&'static str, CallbackError> {
    let body = body.into_inner();
    let (appointment_id, kind) = match (body.appointment_id, body.kind) {
        (Some(appointment_id), Some(kind)) => (appointment_id, kind),
        _ => return Err(CallbackError::MissingFields),
    };

    let appointment = fetch_appointment(&conn, appointment_id.clone())
        .await?
        .ok_or(CallbackError::UnknownAppointment)?;
    let starts_at = appointment
        .starts_at
        .context("The appointment has no start timestamp.")?;

    let when = starts_at
        .with_timezone(&reminders.utc_offset)
        .format("%d/%m/%Y %H:%M");
    let (title, category) = match kind {
        ReminderKind::DayBefore => (
            "Reminder: service tomorrow",
            NotificationCategory::ServiceUpcoming,
        ),
        ReminderKind::SameDay => (
            "Reminder: service today",
            NotificationCategory::ServiceToday,
        ),
    };
    let message = format!(
        "Service: {} - starts at {}",
        appointment.service_label(),
        when
    );

    let recipients = [
        appointment.assignee_id.as_deref(),
        appointment.requester_id.as_deref(),
    ];
    for recipient in recipients.into_iter().flatten().filter(|r| !r.is_empty()) {
        let notification = OutboundNotification {
            title: title.to_string(),
            body: message.clone(),
            category,
            entity_id: Some(appointment_id.clone()),
            deep_link: Some(deep_link("appointments", &appointment_id)),
            // Carried so the app can show the appointment's own start time.
            scheduled_for: Some(starts_at),
        };
        dispatch(&conn, push_gateway.inner().as_ref(), recipient, notification)
            .await
            .context("Failed to dispatch the reminder notification.")?;
    }
    Ok("ok")
}

#[tracing::instrument(name = "Fetching the appointment", skip(conn))]
async fn fetch_appointment(
    conn: &NotifyDbConn,
    appointment_id: String,
) -> Result<Option<Appointment>, anyhow::Error> {
    conn.run(move |c| {
        use crate::schema::appointments::dsl::*;
        appointments
            .find(appointment_id)
            .first::<Appointment>(c)
            .optional()
    })
    .await
    .context("Failed to fetch the appointment record.")
}
