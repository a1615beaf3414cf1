//! Connection configuration for the Zammad API client.
//!
//! The configuration is an explicitly constructed value, assembled once from
//! the command line and handed to [`crate::zammad_client::ZammadClient::new`].
//! There is no global configuration state.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::NotifyError;

/// Default timeout for the whole notification dispatch, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// How the plugin authenticates against Zammad.
///
/// Exactly one method is active per invocation; the CLI enforces that the
/// corresponding flags are mutually exclusive.
#[derive(Debug, Clone)]
pub enum AuthMethod {
    /// `Authorization: Bearer <token>` (OAuth2 access token).
    Bearer(String),
    /// `Authorization: Token token=<token>` (Zammad API token).
    Token(String),
    /// HTTP basic auth with username and password.
    Basic {
        /// The Zammad login name.
        username: String,
        /// The password for the login.
        password: String,
    },
}

impl AuthMethod {
    /// Parses a `user:password` pair as passed on the command line.
    ///
    /// # Errors
    ///
    /// Returns `NotifyError::Config` if the separator is missing or either
    /// side is empty.
    pub fn from_basic_auth(credentials: &str) -> Result<Self, NotifyError> {
        match credentials.split_once(':') {
            Some((user, pass)) if !user.is_empty() && !pass.is_empty() => {
                Ok(AuthMethod::Basic {
                    username: user.to_string(),
                    password: pass.to_string(),
                })
            }
            _ => Err(NotifyError::config(
                "basic auth credentials must be given as <user>:<password>",
            )),
        }
    }
}

/// Configuration for connecting to a Zammad instance.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the Zammad instance (scheme, host and port only).
    pub base_url: Url,

    /// The authentication method attached to every request.
    pub auth: AuthMethod,

    /// Optional CA bundle used to verify the server certificate.
    pub ca_file: Option<PathBuf>,

    /// Optional client certificate (PEM) for mutual TLS.
    pub cert_file: Option<PathBuf>,

    /// Private key (PEM) belonging to `cert_file`.
    pub key_file: Option<PathBuf>,

    /// Skip verification of the server's TLS certificate.
    pub insecure: bool,

    /// Deadline for the whole dispatch, also applied per request.
    pub timeout: Duration,
}

impl Config {
    /// Builds the base URL from the connection flags.
    ///
    /// `secure` selects the scheme; the host is validated by the URL parser.
    pub(crate) fn build_base_url(
        hostname: &str,
        port: u16,
        secure: bool,
    ) -> Result<Url, NotifyError> {
        let scheme = if secure { "https" } else { "http" };

        Url::parse(&format!("{}://{}:{}", scheme, hostname, port)).map_err(|e| {
            NotifyError::config(format!("invalid Zammad address {}: {}", hostname, e))
        })
    }

    /// Returns the host name portion of the base URL for error messages.
    pub fn host(&self) -> &str {
        self.base_url.host_str().unwrap_or("zammad")
    }

    /// Checks invariants that span multiple fields.
    ///
    /// # Errors
    ///
    /// Returns `NotifyError::Config` if a client certificate is given without
    /// its key (or vice versa).
    pub fn validate(&self) -> Result<(), NotifyError> {
        match (&self.cert_file, &self.key_file) {
            (Some(_), None) => Err(NotifyError::config(
                "a client certificate requires --key-file",
            )),
            (None, Some(_)) => Err(NotifyError::config(
                "a client key requires --cert-file",
            )),
            _ => Ok(()),
        }
    }
}
