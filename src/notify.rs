//! The notification dispatch logic.
//!
//! [`dispatch`] maps one Icinga notification onto Zammad ticket operations:
//! it searches for a ticket matching the (host, service) correlation key and
//! then, depending on the notification kind and whether a ticket exists,
//! creates a ticket, appends an article, or transitions the ticket state.
//!
//! Every branch performs either zero network writes (pure no-ops), exactly
//! one create-or-append call, or one append followed by one state update.
//! A failing call aborts the sequence; nothing is rolled back, Zammad itself
//! is the record of what happened.

use crate::error::NotifyError;
use crate::models::{Article, NewTicket, NotificationEvent, NotificationKind, Ticket, TicketState};
use crate::zammad_client::ZammadClient;

/// Handles one notification end to end.
///
/// Searches for the current ticket and routes to the matching handler. The
/// search returns tickets newest first, so when several tickets match the
/// correlation key the most recently created one is used; concurrently open
/// duplicates are accepted and not deduplicated here.
///
/// # Errors
///
/// Propagates every client error unchanged, plus
/// `NotifyError::NoTicketToAcknowledge` when an acknowledgement arrives
/// without a matching ticket.
pub async fn dispatch(client: &ZammadClient, event: &NotificationEvent) -> Result<(), NotifyError> {
    let tickets = client
        .search_tickets(&event.host, event.service.as_deref())
        .await?;

    let current = tickets.into_iter().next();

    match &current {
        Some(ticket) => {
            tracing::debug!(ticket_id = ticket.id, "found existing ticket");
        }
        None => {
            tracing::debug!("no open or new ticket for this host/service combination");
        }
    }

    match event.kind {
        NotificationKind::Problem => handle_problem(client, event, current).await,
        NotificationKind::Acknowledgement => handle_acknowledgement(client, event, current).await,
        NotificationKind::Recovery => handle_recovery(client, event, current).await,
        NotificationKind::Custom
        | NotificationKind::DowntimeStart
        | NotificationKind::DowntimeEnd
        | NotificationKind::DowntimeRemoved
        | NotificationKind::FlappingStart
        | NotificationKind::FlappingEnd => handle_informational(client, event, current).await,
    }
}

/// A problem opens a new ticket, or appends to the existing one.
async fn handle_problem(
    client: &ZammadClient,
    event: &NotificationEvent,
    current: Option<Ticket>,
) -> Result<(), NotifyError> {
    let article = event_article(event);

    if let Some(ticket) = current {
        return client
            .add_article_to_ticket(&article.for_ticket(ticket.id))
            .await;
    }

    tracing::info!(host = %event.host, "creating new problem ticket");

    let ticket = NewTicket {
        title: ticket_title(event),
        group: event.group.clone(),
        customer: event.customer.clone(),
        icinga_host: event.host.clone(),
        icinga_service: event.service.clone().unwrap_or_default(),
        article,
    };

    client.create_ticket(&ticket).await
}

/// An acknowledgement appends an article and moves the ticket to `open`.
/// Without a ticket there is nothing to acknowledge, which is an error the
/// operator should see.
async fn handle_acknowledgement(
    client: &ZammadClient,
    event: &NotificationEvent,
    current: Option<Ticket>,
) -> Result<(), NotifyError> {
    let Some(ticket) = current else {
        return Err(NotifyError::NoTicketToAcknowledge);
    };

    client
        .add_article_to_ticket(&event_article(event).for_ticket(ticket.id))
        .await?;

    client.update_ticket_state(&ticket, TicketState::Open).await
}

/// A recovery closes the ticket after noting the recovery. Without a ticket
/// there is nothing to do.
async fn handle_recovery(
    client: &ZammadClient,
    event: &NotificationEvent,
    current: Option<Ticket>,
) -> Result<(), NotifyError> {
    let Some(ticket) = current else {
        return Ok(());
    };

    client
        .add_article_to_ticket(&event_article(event).for_ticket(ticket.id))
        .await?;

    client
        .update_ticket_state(&ticket, TicketState::Closed)
        .await
}

/// Custom, downtime and flapping notifications only annotate an existing
/// ticket. Without a ticket they are a no-op.
async fn handle_informational(
    client: &ZammadClient,
    event: &NotificationEvent,
    current: Option<Ticket>,
) -> Result<(), NotifyError> {
    let Some(ticket) = current else {
        return Ok(());
    };

    client
        .add_article_to_ticket(&event_article(event).for_ticket(ticket.id))
        .await
}

/// Builds the article for an event, subject and header tagged with the kind.
fn event_article(event: &NotificationEvent) -> Article {
    Article::web(event.kind.as_str(), article_body(event.kind.as_str(), event))
}

/// Renders the HTML body of a notification article.
///
/// Header, check state and check output are always present; author, date and
/// comment only when the event carries them.
pub fn article_body(header: &str, event: &NotificationEvent) -> String {
    let mut body = String::new();

    body.push_str(&format!("<h3>{}</h3>", header));
    body.push_str(&format!("<p>Check State: {}</p>", event.check_state));
    body.push_str(&format!("<p>Check Output: {}</p>", event.check_output));

    if let Some(author) = event.author.as_deref().filter(|s| !s.is_empty()) {
        body.push_str(&format!("<p>Notification Author: {}</p>", author));
    }

    if let Some(date) = event.date.as_deref().filter(|s| !s.is_empty()) {
        body.push_str(&format!("<p>Notification Date: {}</p>", date));
    }

    if let Some(comment) = event.comment.as_deref().filter(|s| !s.is_empty()) {
        body.push_str(&format!("<p>Notification Comment: {}</p>", comment));
    }

    body
}

/// Builds the title of a newly created problem ticket. The service segment
/// is only present for service notifications.
pub fn ticket_title(event: &NotificationEvent) -> String {
    let mut title = format!(
        "[Problem] State: {} for Host: {}",
        event.check_state, event.host
    );

    if let Some(service) = event.service.as_deref().filter(|s| !s.is_empty()) {
        title.push_str(&format!(" Service: {}", service));
    }

    title
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn test_event(kind: NotificationKind) -> NotificationEvent {
        NotificationEvent {
            kind,
            host: "MyHost".to_string(),
            service: None,
            check_state: "Down".to_string(),
            check_output: "CRITICAL - host unreachable".to_string(),
            author: None,
            comment: None,
            date: None,
            group: "Users".to_string(),
            customer: "jon.snow@zammad".to_string(),
        }
    }

    #[test]
    fn test_article_body_minimal() {
        let event = test_event(NotificationKind::Problem);
        let body = article_body("Problem", &event);

        assert_eq!(
            body,
            "<h3>Problem</h3>\
             <p>Check State: Down</p>\
             <p>Check Output: CRITICAL - host unreachable</p>"
        );
    }

    #[test]
    fn test_article_body_with_manual_event_fields() {
        let mut event = test_event(NotificationKind::Acknowledgement);
        event.author = Some("jdoe".to_string());
        event.date = Some("2025-05-05 09:38".to_string());
        event.comment = Some("working on it".to_string());

        let body = article_body("Acknowledgement", &event);
        assert!(body.contains("<p>Notification Author: jdoe</p>"));
        assert!(body.contains("<p>Notification Date: 2025-05-05 09:38</p>"));
        assert!(body.contains("<p>Notification Comment: working on it</p>"));
    }

    #[test]
    fn test_article_body_skips_empty_optionals() {
        let mut event = test_event(NotificationKind::Custom);
        event.author = Some(String::new());

        let body = article_body("Custom", &event);
        assert!(!body.contains("Notification Author"));
    }

    #[test]
    fn test_ticket_title_host_only() {
        let event = test_event(NotificationKind::Problem);
        assert_eq!(
            ticket_title(&event),
            "[Problem] State: Down for Host: MyHost"
        );
    }

    #[test]
    fn test_ticket_title_with_service() {
        let mut event = test_event(NotificationKind::Problem);
        event.service = Some("http".to_string());
        event.check_state = "Critical".to_string();

        assert_eq!(
            ticket_title(&event),
            "[Problem] State: Critical for Host: MyHost Service: http"
        );
    }

    #[test]
    fn test_event_article_is_tagged_with_kind() {
        let event = test_event(NotificationKind::DowntimeStart);
        let article = event_article(&event);

        assert_eq!(article.subject, "DowntimeStart");
        assert!(article.body.starts_with("<h3>DowntimeStart</h3>"));
        assert_eq!(article.ticket_id, None);
    }
}
