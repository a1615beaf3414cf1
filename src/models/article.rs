//! Article models for the Zammad API.

use serde::Serialize;

/// A note attached to a ticket.
///
/// Articles are immutable once created; the plugin only ever appends them,
/// either standalone via `POST /api/v1/ticket_articles` or embedded in a new
/// ticket.
#[derive(Debug, Clone, Serialize)]
pub struct Article {
    /// The ticket the article belongs to. Absent when the article is
    /// embedded in a ticket creation payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<u64>,

    /// Short subject line, usually the notification type.
    pub subject: String,

    /// Rendered body, see `content_type`.
    pub body: String,

    /// MIME type of the body.
    pub content_type: String,

    /// Zammad article channel ("web", "phone", ...).
    #[serde(rename = "type")]
    pub article_type: String,

    /// Whether the article is hidden from the customer.
    pub internal: bool,

    /// Role of the article author as seen by Zammad.
    pub sender: String,
}

impl Article {
    /// Creates an internal HTML article on the "web" channel, the form every
    /// notification uses.
    pub fn web(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            ticket_id: None,
            subject: subject.into(),
            body: body.into(),
            content_type: "text/html".to_string(),
            article_type: "web".to_string(),
            internal: true,
            sender: "Agent".to_string(),
        }
    }

    /// Attaches the article to an existing ticket.
    pub fn for_ticket(mut self, ticket_id: u64) -> Self {
        self.ticket_id = Some(ticket_id);
        self
    }
}
