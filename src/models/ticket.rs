//! Ticket models for the Zammad API.
//!
//! A ticket is correlated to a monitored object through the custom fields
//! `icinga_host` and `icinga_service`; an empty service marks a host-level
//! ticket.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::Article;

/// The ticket states this plugin works with.
///
/// Searches are restricted to `new` and `open`; a closed ticket is never
/// reused and behaves like a missing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketState {
    /// Freshly created, not yet worked on.
    New,
    /// In progress.
    Open,
    /// Resolved. Terminal for this plugin.
    Closed,
}

impl std::fmt::Display for TicketState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TicketState::New => write!(f, "new"),
            TicketState::Open => write!(f, "open"),
            TicketState::Closed => write!(f, "closed"),
        }
    }
}

/// A ticket as returned by the Zammad search API.
#[derive(Debug, Clone, Deserialize)]
pub struct Ticket {
    /// Server-assigned ticket ID. Never zero for an existing ticket.
    pub id: u64,

    /// Ticket title.
    #[serde(default)]
    pub title: String,

    /// Correlation key: the Icinga host object name.
    #[serde(default)]
    pub icinga_host: String,

    /// Correlation key: the Icinga service name, empty for host tickets.
    #[serde(default)]
    pub icinga_service: String,

    /// State name, present in expanded search responses.
    #[serde(default)]
    pub state: Option<TicketState>,

    /// Numeric state ID, present in asset-map search responses.
    #[serde(default)]
    pub state_id: Option<u64>,

    /// Creation timestamp (ISO 8601), used to order asset-map results.
    #[serde(default)]
    pub created_at: Option<String>,

    /// IDs of the articles attached to the ticket. Informational only.
    #[serde(default)]
    pub article_ids: Vec<u64>,
}

/// Payload for creating a ticket, with its initial article embedded.
#[derive(Debug, Clone, Serialize)]
pub struct NewTicket {
    /// Ticket title.
    pub title: String,
    /// Name of the Zammad group the ticket is filed under.
    pub group: String,
    /// The customer (login or email) the ticket belongs to.
    pub customer: String,
    /// Correlation key: the Icinga host object name.
    pub icinga_host: String,
    /// Correlation key: the Icinga service name, empty for host tickets.
    pub icinga_service: String,
    /// The first article of the ticket.
    pub article: Article,
}

/// The two response shapes of `GET /api/v1/tickets/search`.
///
/// With `expand=true` Zammad returns a plain array of tickets in search
/// order. Without it the tickets come wrapped in an assets map keyed by ID,
/// which loses the ordering.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TicketSearchResponse {
    /// Expanded form: ordered array of tickets.
    Expanded(Vec<Ticket>),
    /// Asset form: tickets keyed by their ID under `assets.Ticket`.
    Assets {
        /// The assets container.
        assets: TicketSearchAssets,
    },
}

/// The `assets` object of a non-expanded search response.
#[derive(Debug, Deserialize)]
pub struct TicketSearchAssets {
    /// Tickets keyed by their stringified ID.
    #[serde(rename = "Ticket", default)]
    pub tickets: HashMap<String, Ticket>,
}

impl TicketSearchResponse {
    /// Flattens the response into a list of tickets, newest first.
    ///
    /// The expanded form is already sorted by the `sort_by=created_at`,
    /// `order_by=desc` query parameters. The asset form is a map, so the
    /// ordering is restored from `created_at` here.
    pub fn into_tickets(self) -> Vec<Ticket> {
        match self {
            TicketSearchResponse::Expanded(tickets) => tickets,
            TicketSearchResponse::Assets { assets } => {
                let mut tickets: Vec<Ticket> = assets.tickets.into_values().collect();
                tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                tickets
            }
        }
    }
}
