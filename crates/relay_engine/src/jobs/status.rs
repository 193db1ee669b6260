//! A single Discord message that mirrors a status page, plus the final
//! "shutting down" edit of that same message.

use std::time::Duration;

use relay_core::{
    classify_status_page, status_description, unreachable_report, MessageSlot, ServiceState,
    StatusReport,
};
use relay_logging::{relay_error, relay_info, relay_warn};
use url::Url;

use crate::discord::{Embed, Notifier};
use crate::http::{build_client, parse_url, send, HttpSettings};
use crate::persist::JsonStore;
use crate::{HttpError, JobError};

pub const SHUTDOWN_TITLE: &str = "Server Shutting Down";
pub const SHUTDOWN_DESCRIPTION: &str = "The array is going offline. The system is shutting down for maintenance. We'll be back soon.";
pub const SHUTDOWN_FOOTER: &str = "This is the final update before shutdown.";

/// Source of the status page body.
#[async_trait::async_trait]
pub trait StatusPage: Send + Sync {
    async fn fetch_page(&self) -> Result<String, HttpError>;
}

pub struct HttpStatusPage {
    url: Url,
    client: reqwest::Client,
    max_bytes: u64,
}

impl HttpStatusPage {
    pub fn new(status_url: &str, settings: &HttpSettings) -> Result<Self, HttpError> {
        Ok(Self {
            url: parse_url(status_url)?,
            client: build_client(settings)?,
            max_bytes: settings.max_bytes,
        })
    }
}

#[async_trait::async_trait]
impl StatusPage for HttpStatusPage {
    async fn fetch_page(&self) -> Result<String, HttpError> {
        let body = send(self.client.get(self.url.clone()), self.max_bytes).await?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

#[derive(Debug, Clone)]
pub struct StatusSettings {
    pub status_url: String,
    pub title: String,
    pub interval: Duration,
}

/// What happened to the tracked message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageOutcome {
    Created(String),
    /// Created, but the webhook did not return an id to remember.
    CreatedUntracked,
    Edited(String),
    Failed(HttpError),
}

/// Edits the remembered message, or creates one and remembers its id.
pub async fn upsert_message(
    notifier: &dyn Notifier,
    store: &JsonStore<MessageSlot>,
    embed: &Embed,
) -> Result<MessageOutcome, JobError> {
    let slot = store.load_or_default();
    if let Some(message_id) = slot.message_id.filter(|id| !id.is_empty()) {
        return Ok(match notifier.edit_message(&message_id, embed).await {
            Ok(()) => {
                relay_info!("Updated existing message (ID={message_id}).");
                MessageOutcome::Edited(message_id)
            }
            Err(err) => {
                relay_error!("Failed to edit message (ID={message_id}): {err}");
                MessageOutcome::Failed(err)
            }
        });
    }

    match notifier.create_message(embed).await {
        Ok(Some(message_id)) => {
            store.save(&MessageSlot::with_id(message_id.as_str()))?;
            relay_info!("Created new message (ID={message_id}).");
            Ok(MessageOutcome::Created(message_id))
        }
        Ok(None) => {
            relay_warn!("Message created but no id was returned; it will not be reused.");
            Ok(MessageOutcome::CreatedUntracked)
        }
        Err(err) => {
            relay_error!("Failed to create message: {err}");
            Ok(MessageOutcome::Failed(err))
        }
    }
}

pub fn status_embed(report: &StatusReport, settings: &StatusSettings) -> Embed {
    Embed::new(settings.title.as_str())
        .url(settings.status_url.as_str())
        .description(status_description(report, &settings.status_url))
        .color(report.state.color())
        .footer(format!("Updated every {}s", settings.interval.as_secs()))
}

pub fn shutdown_embed() -> Embed {
    Embed::new(SHUTDOWN_TITLE)
        .description(SHUTDOWN_DESCRIPTION)
        .color(ServiceState::Down.color())
        .footer(SHUTDOWN_FOOTER)
}

/// One status check: classify the page and publish it.
pub async fn run_status_once(
    page: &dyn StatusPage,
    notifier: &dyn Notifier,
    store: &JsonStore<MessageSlot>,
    settings: &StatusSettings,
) -> Result<(ServiceState, MessageOutcome), JobError> {
    let report = match page.fetch_page().await {
        Ok(html) => classify_status_page(&html),
        Err(err) => unreachable_report(&err.to_string()),
    };
    let outcome = upsert_message(notifier, store, &status_embed(&report, settings)).await?;
    Ok((report.state, outcome))
}

/// Repeats [`run_status_once`] every `settings.interval` until an error
/// that prevents saving the message id.
pub async fn run_status_loop(
    page: &dyn StatusPage,
    notifier: &dyn Notifier,
    store: &JsonStore<MessageSlot>,
    settings: &StatusSettings,
) -> Result<(), JobError> {
    loop {
        let (state, _) = run_status_once(page, notifier, store, settings).await?;
        relay_info!("Status is {state:?}; next check in {}s", settings.interval.as_secs());
        tokio::time::sleep(settings.interval).await;
    }
}

pub async fn run_shutdown(
    notifier: &dyn Notifier,
    store: &JsonStore<MessageSlot>,
) -> Result<MessageOutcome, JobError> {
    let outcome = upsert_message(notifier, store, &shutdown_embed()).await?;
    relay_info!("Server is now marked as going offline.");
    Ok(outcome)
}
