use serde::{Deserialize, Serialize};
use url::Url;

use crate::http::{build_client, decode_json, endpoint, parse_url, send, HttpSettings};
use crate::HttpError;

/// A Discord rich embed. Unset fields are left out of the payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Embed {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedFooter {
    pub text: String,
}

impl Embed {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    pub fn footer(mut self, text: impl Into<String>) -> Self {
        self.footer = Some(EmbedFooter { text: text.into() });
        self
    }
}

/// Where announcements are posted.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Posts a new message and returns its id when the sink reports one.
    async fn create_message(&self, embed: &Embed) -> Result<Option<String>, HttpError>;

    async fn edit_message(&self, message_id: &str, embed: &Embed) -> Result<(), HttpError>;
}

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    content: &'a str,
    embeds: [&'a Embed; 1],
}

#[derive(Debug, Deserialize)]
struct CreatedMessage {
    #[serde(default)]
    id: Option<String>,
}

/// Discord webhook client.
pub struct DiscordWebhook {
    webhook: Url,
    client: reqwest::Client,
    max_bytes: u64,
}

impl DiscordWebhook {
    pub fn new(webhook_url: &str, settings: &HttpSettings) -> Result<Self, HttpError> {
        Ok(Self {
            webhook: parse_url(webhook_url)?,
            client: build_client(settings)?,
            max_bytes: settings.max_bytes,
        })
    }
}

#[async_trait::async_trait]
impl Notifier for DiscordWebhook {
    async fn create_message(&self, embed: &Embed) -> Result<Option<String>, HttpError> {
        // `wait=true` makes Discord answer with the created message.
        let mut url = self.webhook.clone();
        url.query_pairs_mut().append_pair("wait", "true");
        let payload = WebhookPayload {
            content: "",
            embeds: [embed],
        };
        let body = send(self.client.post(url).json(&payload), self.max_bytes).await?;
        if body.is_empty() {
            return Ok(None);
        }
        let created: CreatedMessage = decode_json(&body)?;
        Ok(created.id)
    }

    async fn edit_message(&self, message_id: &str, embed: &Embed) -> Result<(), HttpError> {
        let url = endpoint(&self.webhook, &["messages", message_id])?;
        let payload = WebhookPayload {
            content: "",
            embeds: [embed],
        };
        send(self.client.patch(url).json(&payload), self.max_bytes).await?;
        Ok(())
    }
}
