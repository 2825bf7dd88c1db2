use crate::dispatch::dispatch;
use crate::domain::{deep_link, NotificationCategory, OutboundNotification};
use crate::push::PushGateway;
use crate::startup::NotifyDbConn;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use std::sync::Arc;

/// A service-request document as the store's change feed delivers it.
/// Older app builds wrote `professionalId` and `serviceTitle`; both are
/// still honored through the accessor fallback chains below.
#[derive(Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDocument {
    pub assignee_id: Option<String>,
    pub professional_id: Option<String>,
    pub status: Option<String>,
    pub service_name: Option<String>,
    pub service_title: Option<String>,
    pub service: Option<ServiceRef>,
}

#[derive(Default, serde::Deserialize)]
pub struct ServiceRef {
    pub title: Option<String>,
}

impl RequestDocument {
    pub fn assignee(&self) -> Option<&str> {
        [self.assignee_id.as_deref(), self.professional_id.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
    }

    pub fn service_label(&self) -> Option<&str> {
        [
            self.service_name.as_deref(),
            self.service_title.as_deref(),
            self.service.as_ref().and_then(|s| s.title.as_deref()),
        ]
        .into_iter()
        .flatten()
        .find(|s| !s.is_empty())
    }

    fn status(&self) -> &str {
        self.status.as_deref().unwrap_or("")
    }
}

#[derive(serde::Deserialize)]
pub struct RequestCreated {
    pub id: String,
    #[serde(default)]
    pub data: RequestDocument,
}

#[derive(serde::Deserialize)]
pub struct RequestUpdated {
    pub id: String,
    #[serde(default)]
    pub before: RequestDocument,
    #[serde(default)]
    pub after: RequestDocument,
}

#[tracing::instrument(
    name = "Handling a created service request",
    skip(event, conn, push_gateway),
    fields(request_id = %event.id)
)]
#[post("/events/requests/created", data = "<event>")]
pub async fn request_created(
    event: Json<RequestCreated>,
    conn: NotifyDbConn,
    push_gateway: &State<Arc<dyn PushGateway>>,
) -> Result<(), Status> {
    let event = event.into_inner();
    let assignee = match event.data.assignee() {
        Some(assignee) => assignee.to_string(),
        None => return Ok(()),
    };
    let service = event.data.service_label().unwrap_or("a service");

    let notification = OutboundNotification {
        title: "New request received".to_string(),
        body: format!("You received a request for: {}", service),
        category: NotificationCategory::NewRequest,
        entity_id: Some(event.id.clone()),
        deep_link: Some(deep_link("requests", &event.id)),
        scheduled_for: None,
    };
    dispatch(&conn, push_gateway.inner().as_ref(), &assignee, notification)
        .await
        .map_err(|error| {
            tracing::error!(error.cause_chain = ?error, "Failed to dispatch the notification");
            Status::InternalServerError
        })
}

#[tracing::instrument(
    name = "Handling a service request status change",
    skip(event, conn, push_gateway),
    fields(request_id = %event.id)
)]
#[post("/events/requests/updated", data = "<event>")]
pub async fn request_updated(
    event: Json<RequestUpdated>,
    conn: NotifyDbConn,
    push_gateway: &State<Arc<dyn PushGateway>>,
) -> Result<(), Status> {
    let event = event.into_inner();
    if event.before.status() == event.after.status() {
        return Ok(());
    }
    let assignee = match event.after.assignee() {
        Some(assignee) => assignee.to_string(),
        None => return Ok(()),
    };
    let service = event.after.service_label();

    let (title, body, category) = match event.after.status() {
        "accepted" => (
            "Client accepted the proposal",
            match service {
                Some(service) => format!("Proposal accepted for {}.", service),
                None => "Proposal accepted.".to_string(),
            },
            NotificationCategory::ClientAccepted,
        ),
        "declined" | "declined-by-requester" => (
            "Client declined the proposal",
            match service {
                Some(service) => format!("Proposal declined for {}.", service),
                None => "Proposal declined.".to_string(),
            },
            NotificationCategory::ClientDeclined,
        ),
        _ => return Ok(()),
    };

    let notification = OutboundNotification {
        title: title.to_string(),
        body,
        category,
        entity_id: Some(event.id.clone()),
        deep_link: Some(deep_link("requests", &event.id)),
        scheduled_for: None,
    };
    dispatch(&conn, push_gateway.inner().as_ref(), &assignee, notification)
        .await
        .map_err(|error| {
            tracing::error!(error.cause_chain = ?error, "Failed to dispatch the notification");
            Status::InternalServerError
        })
}
