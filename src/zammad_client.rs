//! HTTP client for the Zammad ticket API.
//!
//! This module provides the `ZammadClient` struct wrapping the four API
//! operations the plugin needs: ticket search, ticket creation, article
//! append and state update. It is pure request/response plumbing; the
//! decision which operation to invoke lives in [`crate::notify`].
//!
//! # No retries
//!
//! Every write is a single HTTP attempt. Icinga re-sends notifications for
//! unresolved problems, so a retry here could append the same article twice
//! within one invocation. Failures surface immediately.

use std::fs;
use std::time::Duration;

use reqwest::{header, Certificate, Client, Identity, RequestBuilder, Response, StatusCode};

use crate::config::{AuthMethod, Config};
use crate::error::NotifyError;
use crate::models::{Article, NewTicket, Ticket, TicketSearchResponse, TicketState};

/// HTTP client for the Zammad REST API.
///
/// Handles authentication, TLS setup, request formatting and response
/// parsing for all operations.
///
/// # Example
///
/// ```ignore
/// let client = ZammadClient::new(&config)?;
/// let tickets = client.search_tickets("web01", Some("http")).await?;
/// ```
#[derive(Clone)]
pub struct ZammadClient {
    /// The underlying HTTP client (cloning is cheap).
    http: Client,

    /// Base URL of the Zammad instance, path is always "/".
    base_url: String,

    /// Host name for authentication error messages.
    host: String,

    /// Credentials attached to every request.
    auth: AuthMethod,

    /// Per-request timeout, reported in timeout errors.
    timeout: Duration,
}

impl ZammadClient {
    /// Creates a new client from configuration.
    ///
    /// Reads the configured TLS material from disk and builds the underlying
    /// HTTP client.
    ///
    /// # Errors
    ///
    /// Returns `NotifyError::Config` if a TLS file cannot be read and
    /// `NotifyError::HttpClient` if the HTTP client fails to initialize.
    pub fn new(config: &Config) -> Result<Self, NotifyError> {
        config.validate()?;

        let mut builder = Client::builder()
            .timeout(config.timeout)
            .use_rustls_tls()
            .danger_accept_invalid_certs(config.insecure);

        if let Some(path) = &config.ca_file {
            let pem = fs::read(path).map_err(|e| {
                NotifyError::config(format!("could not read CA file {}: {}", path.display(), e))
            })?;
            let ca = Certificate::from_pem(&pem).map_err(NotifyError::HttpClient)?;
            builder = builder.add_root_certificate(ca);
        }

        if let (Some(cert_path), Some(key_path)) = (&config.cert_file, &config.key_file) {
            // rustls expects certificate and key concatenated in one PEM buffer
            let mut pem = fs::read(cert_path).map_err(|e| {
                NotifyError::config(format!(
                    "could not read certificate file {}: {}",
                    cert_path.display(),
                    e
                ))
            })?;
            pem.extend(fs::read(key_path).map_err(|e| {
                NotifyError::config(format!(
                    "could not read key file {}: {}",
                    key_path.display(),
                    e
                ))
            })?);
            let identity = Identity::from_pem(&pem).map_err(NotifyError::HttpClient)?;
            builder = builder.identity(identity);
        }

        let http = builder.build().map_err(NotifyError::HttpClient)?;

        Ok(Self {
            http,
            base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
            host: config.host().to_string(),
            auth: config.auth.clone(),
            timeout: config.timeout,
        })
    }

    /// Builds the full URL for an API path.
    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attaches the configured credentials to a request.
    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.auth {
            AuthMethod::Bearer(token) => req.bearer_auth(token),
            AuthMethod::Token(token) => {
                req.header(header::AUTHORIZATION, format!("Token token={}", token))
            }
            AuthMethod::Basic { username, password } => req.basic_auth(username, Some(password)),
        }
    }

    /// Sends a request and checks the response status.
    ///
    /// Transport failures carry the failing URL, HTTP 401/403 becomes a
    /// distinct authentication error naming the target host, and any status
    /// other than `expected` is returned with the response body for
    /// diagnosis.
    async fn send(
        &self,
        req: RequestBuilder,
        url: &str,
        expected: StatusCode,
    ) -> Result<Response, NotifyError> {
        let response = self.authorize(req).send().await.map_err(|e| {
            if e.is_timeout() {
                NotifyError::Timeout {
                    duration: self.timeout,
                }
            } else {
                NotifyError::Transport {
                    url: url.to_string(),
                    source: e,
                }
            }
        })?;

        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(NotifyError::Authentication {
                host: self.host.clone(),
            });
        }

        if status != expected {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::HttpStatus {
                status,
                url: url.to_string(),
                body,
            });
        }

        Ok(response)
    }

    /// Searches tickets for the given host and service, newest first.
    ///
    /// The query restricts matches to tickets in state `new` or `open`; a
    /// closed ticket is indistinguishable from a missing one. If `service`
    /// is `None` or empty every ticket of the host matches, otherwise only
    /// tickets whose `icinga_service` equals the given name.
    ///
    /// Returns an empty list, not an error, when nothing matches.
    ///
    /// # Errors
    ///
    /// Returns `NotifyError::Validation` for an empty host and the transport,
    /// authentication and parse errors described on [`ZammadClient`].
    pub async fn search_tickets(
        &self,
        host: &str,
        service: Option<&str>,
    ) -> Result<Vec<Ticket>, NotifyError> {
        if host.is_empty() {
            return Err(NotifyError::validation("host must not be empty"));
        }

        let query = format!("icinga_host: {} AND (state.name: new OR state.name: open)", host);
        let url = self.endpoint("/api/v1/tickets/search");

        tracing::debug!(host = host, service = service, "searching tickets");

        let req = self.http.get(&url).query(&[
            ("query", query.as_str()),
            // Zammad sorts by updated_at by default; created_at is stable and
            // puts the newest ticket first.
            ("sort_by", "created_at"),
            ("order_by", "desc"),
            ("expand", "true"),
        ]);

        let response = self.send(req, &url, StatusCode::OK).await?;
        let body = response.text().await.map_err(|e| NotifyError::Transport {
            url: url.clone(),
            source: e,
        })?;

        let result: TicketSearchResponse =
            serde_json::from_str(&body).map_err(NotifyError::ParseResponse)?;

        let service = service.unwrap_or("");
        let tickets = result
            .into_tickets()
            .into_iter()
            .filter(|ticket| service.is_empty() || ticket.icinga_service == service)
            .collect();

        Ok(tickets)
    }

    /// Creates a new ticket with its initial article.
    ///
    /// The server-assigned ID is not returned; the next invocation finds the
    /// ticket through its correlation keys.
    ///
    /// # Errors
    ///
    /// Returns `NotifyError::Validation` if title, group, customer or host
    /// are missing, and `NotifyError::HttpStatus` with the response body for
    /// any status other than 201.
    pub async fn create_ticket(&self, ticket: &NewTicket) -> Result<(), NotifyError> {
        if ticket.title.is_empty()
            || ticket.group.is_empty()
            || ticket.customer.is_empty()
            || ticket.icinga_host.is_empty()
        {
            return Err(NotifyError::validation(
                "a new ticket requires title, group, customer and host",
            ));
        }

        let url = self.endpoint("/api/v1/tickets");

        tracing::debug!(title = %ticket.title, "creating ticket");

        let req = self.http.post(&url).json(ticket);
        self.send(req, &url, StatusCode::CREATED).await?;

        Ok(())
    }

    /// Appends an article to an existing ticket.
    ///
    /// # Errors
    ///
    /// Returns `NotifyError::Validation` if the article carries no ticket ID
    /// and `NotifyError::HttpStatus` for any status other than 201.
    pub async fn add_article_to_ticket(&self, article: &Article) -> Result<(), NotifyError> {
        match article.ticket_id {
            None | Some(0) => {
                return Err(NotifyError::validation(
                    "an article must reference an existing ticket",
                ));
            }
            Some(_) => {}
        }

        let url = self.endpoint("/api/v1/ticket_articles");

        tracing::debug!(ticket_id = ?article.ticket_id, subject = %article.subject, "adding article");

        let req = self.http.post(&url).json(article);
        self.send(req, &url, StatusCode::CREATED).await?;

        Ok(())
    }

    /// Transitions a ticket into the given state.
    ///
    /// # Errors
    ///
    /// Returns `NotifyError::Validation` for a zero ticket ID and
    /// `NotifyError::HttpStatus` for any status other than 200.
    pub async fn update_ticket_state(
        &self,
        ticket: &Ticket,
        state: TicketState,
    ) -> Result<(), NotifyError> {
        if ticket.id == 0 {
            return Err(NotifyError::validation(
                "cannot update the state of a ticket without ID",
            ));
        }

        let url = self.endpoint(&format!("/api/v1/tickets/{}", ticket.id));

        tracing::debug!(ticket_id = ticket.id, state = %state, "updating ticket state");

        let req = self
            .http
            .put(&url)
            .json(&serde_json::json!({ "state": state }));
        self.send(req, &url, StatusCode::OK).await?;

        Ok(())
    }
}
