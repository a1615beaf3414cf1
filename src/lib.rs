//! # notify-zammad
//!
//! An Icinga 2 notification plugin for Zammad. One invocation turns one
//! host or service notification into the matching ticket action: open a
//! ticket for a new problem, append articles while the problem evolves, and
//! close the ticket on recovery.
//!
//! ## Behavior
//!
//! Tickets are correlated to monitored objects through two custom Zammad
//! ticket fields, `icinga_host` and `icinga_service`. Every run searches for
//! an existing `new` or `open` ticket first and then dispatches on the
//! notification type:
//!
//! | Type | no ticket | open/new ticket |
//! |---|---|---|
//! | Problem | create ticket | append article |
//! | Acknowledgement | error | append article, state → open |
//! | Recovery | nothing | append article, state → closed |
//! | Custom / Downtime* / Flapping* | nothing | append article |
//!
//! Zammad is the only source of truth: the plugin keeps no local state and
//! re-queries the ticket on every invocation. Writes are single HTTP
//! attempts without retries - Icinga re-sends notifications for unresolved
//! problems, which is retry enough.
//!
//! ## Architecture
//!
//! - [`cli`] - command line definition and flag conversion
//! - [`config`] - connection configuration and authentication methods
//! - [`error`] - the unified error type
//! - [`models`] - Zammad API payloads and the notification event
//! - [`zammad_client`] - HTTP client for the four ticket operations
//! - [`notify`] - the dispatch logic mapping notifications to operations
//!
//! ## Usage
//!
//! ```bash
//! notify-zammad \
//!     --host-name web01 --check-state Down \
//!     --check-output "CRITICAL - host unreachable" \
//!     --notification-type Problem \
//!     --zammad-group Monitoring --zammad-customer icinga@example.com \
//!     -H zammad.example.com --secure --token "$NOTIFY_ZAMMAD_TOKEN"
//! ```
//!
//! On success the plugin exits 0 without output; any failure prints a single
//! diagnostic line and exits non-zero.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod notify;
pub mod zammad_client;
