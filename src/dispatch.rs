use crate::domain::OutboundNotification;
use crate::models::{NewNotification, User};
use crate::push::{PushGateway, SendOutcome};
use crate::startup::NotifyDbConn;
use anyhow::Context;
use diesel::sql_types::{Array, Text};
use diesel::{OptionalExtension, QueryDsl, RunQueryDsl};
use uuid::Uuid;

/// Writes the inbox record, then attempts push delivery to every token the
/// recipient has registered. The record is written first and survives every
/// later failure: a missing user, an empty token list or a gateway outage
/// still leave the notification visible in the app.
#[tracing::instrument(
    name = "Dispatching a notification",
    skip(conn, push_gateway, notification),
    fields(
        recipient_id = %recipient_id,
        category = %notification.category
    )
)]
pub async fn dispatch(
    conn: &NotifyDbConn,
    push_gateway: &dyn PushGateway,
    recipient_id: &str,
    notification: OutboundNotification,
) -> Result<(), anyhow::Error> {
    insert_inbox_record(conn, recipient_id.to_string(), &notification).await?;

    let user = match fetch_user(conn, recipient_id.to_string()).await? {
        Some(user) => user,
        None => return Ok(()),
    };
    let tokens: Vec<String> = user
        .push_tokens
        .into_iter()
        .filter(|token| !token.is_empty())
        .collect();
    if tokens.is_empty() {
        return Ok(());
    }

    match push_gateway
        .send_multicast(&tokens, &notification.to_push_message())
        .await
    {
        Ok(summary) => {
            let invalid = invalid_tokens(&tokens, &summary.outcomes);
            if !invalid.is_empty() {
                remove_push_tokens(conn, recipient_id.to_string(), invalid).await?;
            }
        }
        Err(error) => {
            // A gateway outage must not undo the inbox record or fail the
            // triggering event.
            tracing::error!(error.cause_chain = ?error, "Push delivery failed");
        }
    }
    Ok(())
}

#[tracing::instrument(name = "Saving the inbox record", skip(conn, notification))]
async fn insert_inbox_record(
    conn: &NotifyDbConn,
    recipient_id: String,
    notification: &OutboundNotification,
) -> Result<(), anyhow::Error> {
    use crate::schema::notifications;
    let notification = notification.clone();
    conn.run(move |c| {
        diesel::insert_into(notifications::table)
            .values(NewNotification {
                id: &Uuid::new_v4(),
                recipient_id: &recipient_id,
                title: &notification.title,
                message: &notification.body,
                category: notification.category.as_str(),
                entity_id: notification.entity_id.as_deref(),
                scheduled_for: notification.scheduled_for,
            })
            .execute(c)
    })
    .await
    .context("Failed to insert the inbox record.")?;
    Ok(())
}

#[tracing::instrument(name = "Fetching the recipient's user record", skip(conn))]
async fn fetch_user(conn: &NotifyDbConn, user_id: String) -> Result<Option<User>, anyhow::Error> {
    conn.run(move |c| {
        use crate::schema::users::dsl::*;
        users.find(user_id).first::<User>(c).optional()
    })
    .await
    .context("Failed to fetch the recipient's user record.")
}

fn invalid_tokens(tokens: &[String], outcomes: &[SendOutcome]) -> Vec<String> {
    tokens
        .iter()
        .zip(outcomes)
        .filter_map(|(token, outcome)| match outcome {
            SendOutcome::Failed(kind) if kind.invalidates_token() => Some(token.clone()),
            _ => None,
        })
        .collect()
}

/// Atomic set-difference on the token array. A single correlated UPDATE so
/// that tokens registered concurrently by the app are never clobbered.
#[tracing::instrument(name = "Removing invalid push tokens", skip(conn), fields(count = invalid.len()))]
async fn remove_push_tokens(
    conn: &NotifyDbConn,
    user_id: String,
    invalid: Vec<String>,
) -> Result<(), anyhow::Error> {
    conn.run(move |c| {
        diesel::sql_query(
            "UPDATE users \
             SET push_tokens = array(\
                 SELECT t FROM unnest(push_tokens) AS t WHERE t <> ALL($1)\
             ) \
             WHERE id = $2",
        )
        .bind::<Array<Text>, _>(invalid)
        .bind::<Text, _>(user_id)
        .execute(c)
    })
    .await
    .context("Failed to remove invalid push tokens.")?;
    Ok(())
}
