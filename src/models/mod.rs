//! Data models for the Zammad API and the Icinga notification input.
//!
//! This module contains the ticket and article types exchanged with the
//! Zammad REST API plus the parsed notification event that drives the
//! dispatch logic.

mod article;
mod notification;
mod ticket;

pub use article::*;
pub use notification::*;
pub use ticket::*;
