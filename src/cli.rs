//! Command line interface of the plugin.
//!
//! One invocation carries exactly one notification. The flags mirror what
//! Icinga 2 passes to notification commands plus the connection settings for
//! the Zammad instance. Parsed flags are converted into the two values the
//! rest of the crate works with: a [`Config`] for the client and a
//! [`NotificationEvent`] for the dispatch.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::config::{AuthMethod, Config, DEFAULT_TIMEOUT_SECS};
use crate::error::NotifyError;
use crate::models::{NotificationEvent, NotificationKind};

/// An Icinga 2 notification plugin for Zammad.
#[derive(Parser, Debug)]
#[command(name = "notify-zammad", version, about)]
pub struct Cli {
    /// Host name of the Icinga 2 Host object
    #[arg(long)]
    pub host_name: String,

    /// Service name of the Icinga 2 Service object (optional for host notifications)
    #[arg(long)]
    pub service_name: Option<String>,

    /// State of the object (Up/Down for hosts, OK/Warning/Critical/Unknown for services)
    #[arg(long)]
    pub check_state: String,

    /// Output of the last executed check
    #[arg(long)]
    pub check_output: String,

    /// Type of the notification (Problem/Recovery/Acknowledgement/...)
    #[arg(long)]
    pub notification_type: String,

    /// Name of an author for manual events
    #[arg(long = "notification-author")]
    pub author: Option<String>,

    /// Comment for manual events
    #[arg(long = "notification-comment")]
    pub comment: Option<String>,

    /// Date when the event occurred
    #[arg(long = "notification-date")]
    pub date: Option<String>,

    /// The Zammad group new tickets are filed under
    #[arg(long)]
    pub zammad_group: String,

    /// The Zammad customer new tickets belong to
    #[arg(long)]
    pub zammad_customer: String,

    /// Address of the Zammad instance
    #[arg(
        short = 'H',
        long,
        default_value = "localhost",
        env = "NOTIFY_ZAMMAD_HOSTNAME"
    )]
    pub zammad_hostname: String,

    /// Port of the Zammad instance
    #[arg(short = 'p', long, default_value_t = 443)]
    pub zammad_port: u16,

    /// Use a HTTPS connection
    #[arg(short = 's', long)]
    pub secure: bool,

    /// Zammad API token for authentication
    #[arg(
        short = 'T',
        long,
        env = "NOTIFY_ZAMMAD_TOKEN",
        conflicts_with_all = ["user", "bearer_token"]
    )]
    pub token: Option<String>,

    /// OAuth2 bearer token for authentication
    #[arg(long, env = "NOTIFY_ZAMMAD_BEARER_TOKEN", conflicts_with = "user")]
    pub bearer_token: Option<String>,

    /// User name and password for basic authentication as <user>:<password>
    #[arg(short = 'u', long, env = "NOTIFY_ZAMMAD_BASICAUTH")]
    pub user: Option<String>,

    /// CA file to verify the server certificate against
    #[arg(long, env = "NOTIFY_ZAMMAD_CA_FILE")]
    pub ca_file: Option<PathBuf>,

    /// Client certificate file (PEM) for TLS authentication
    #[arg(long, env = "NOTIFY_ZAMMAD_CERT_FILE")]
    pub cert_file: Option<PathBuf>,

    /// Client key file (PEM) for TLS authentication
    #[arg(long, env = "NOTIFY_ZAMMAD_KEY_FILE")]
    pub key_file: Option<PathBuf>,

    /// Skip the verification of the server's TLS certificate
    #[arg(short = 'i', long)]
    pub insecure: bool,

    /// Timeout in seconds for the whole notification
    #[arg(short = 't', long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,
}

impl Cli {
    /// Builds the client configuration from the connection flags.
    ///
    /// # Errors
    ///
    /// Returns `NotifyError::Config` when no authentication method is given,
    /// the basic auth pair is malformed, the address does not parse, or TLS
    /// material is incomplete.
    pub fn config(&self) -> Result<Config, NotifyError> {
        let auth = if let Some(token) = &self.bearer_token {
            AuthMethod::Bearer(token.clone())
        } else if let Some(token) = &self.token {
            AuthMethod::Token(token.clone())
        } else if let Some(credentials) = &self.user {
            AuthMethod::from_basic_auth(credentials)?
        } else {
            return Err(NotifyError::config(
                "no authentication method provided, use --token, --bearer-token or --user",
            ));
        };

        let config = Config {
            base_url: Config::build_base_url(&self.zammad_hostname, self.zammad_port, self.secure)?,
            auth,
            ca_file: self.ca_file.clone(),
            cert_file: self.cert_file.clone(),
            key_file: self.key_file.clone(),
            insecure: self.insecure,
            timeout: Duration::from_secs(self.timeout),
        };

        config.validate()?;

        Ok(config)
    }

    /// Parses the notification flags into an event.
    ///
    /// # Errors
    ///
    /// Returns `NotifyError::UnsupportedNotificationType` for an unknown
    /// type. This happens before any network call.
    pub fn event(&self) -> Result<NotificationEvent, NotifyError> {
        let kind: NotificationKind = self.notification_type.parse()?;

        Ok(NotificationEvent {
            kind,
            host: self.host_name.clone(),
            service: self.service_name.clone().filter(|s| !s.is_empty()),
            check_state: self.check_state.clone(),
            check_output: self.check_output.clone(),
            author: self.author.clone(),
            comment: self.comment.clone(),
            date: self.date.clone(),
            group: self.zammad_group.clone(),
            customer: self.zammad_customer.clone(),
        })
    }
}
