//! The parsed Icinga notification that drives a plugin run.

use std::str::FromStr;

use crate::error::NotifyError;

/// The Icinga 2 notification types the plugin understands.
///
/// Anything else is rejected when the command line is parsed, before any
/// network call is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// A host or service entered a problem state.
    Problem,
    /// A problem recovered.
    Recovery,
    /// An operator acknowledged a problem.
    Acknowledgement,
    /// A manually triggered custom notification.
    Custom,
    /// A downtime started.
    DowntimeStart,
    /// A downtime ended.
    DowntimeEnd,
    /// A downtime was removed before it ended.
    DowntimeRemoved,
    /// The object started flapping.
    FlappingStart,
    /// The object stopped flapping.
    FlappingEnd,
}

impl NotificationKind {
    /// The canonical Icinga name, used as article subject and body header.
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Problem => "Problem",
            NotificationKind::Recovery => "Recovery",
            NotificationKind::Acknowledgement => "Acknowledgement",
            NotificationKind::Custom => "Custom",
            NotificationKind::DowntimeStart => "DowntimeStart",
            NotificationKind::DowntimeEnd => "DowntimeEnd",
            NotificationKind::DowntimeRemoved => "DowntimeRemoved",
            NotificationKind::FlappingStart => "FlappingStart",
            NotificationKind::FlappingEnd => "FlappingEnd",
        }
    }

    /// All supported kinds, for help and error messages.
    pub const ALL: [NotificationKind; 9] = [
        NotificationKind::Problem,
        NotificationKind::Recovery,
        NotificationKind::Acknowledgement,
        NotificationKind::Custom,
        NotificationKind::DowntimeStart,
        NotificationKind::DowntimeEnd,
        NotificationKind::DowntimeRemoved,
        NotificationKind::FlappingStart,
        NotificationKind::FlappingEnd,
    ];
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = NotifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| NotifyError::UnsupportedNotificationType(s.to_string()))
    }
}

/// Everything Icinga passed for one notification, already validated.
#[derive(Debug, Clone)]
pub struct NotificationEvent {
    /// Why Icinga is notifying.
    pub kind: NotificationKind,

    /// Name of the Icinga host object. Always present.
    pub host: String,

    /// Name of the Icinga service object; `None` for host notifications.
    pub service: Option<String>,

    /// State of the object (Up/Down for hosts, OK/Warning/Critical/Unknown
    /// for services).
    pub check_state: String,

    /// Output of the last executed check.
    pub check_output: String,

    /// Author of a manually triggered event.
    pub author: Option<String>,

    /// Comment of a manually triggered event.
    pub comment: Option<String>,

    /// Date the event occurred.
    pub date: Option<String>,

    /// The Zammad group new tickets are filed under.
    pub group: String,

    /// The Zammad customer new tickets belong to.
    pub customer: String,
}
