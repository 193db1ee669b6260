use relay_core::{ForumPost, TopicId, TopicRef};
use serde::Deserialize;
use serde_json::json;
use url::Url;

use crate::http::{build_client, decode_json, endpoint, parse_url, send, HttpSettings};
use crate::HttpError;

/// Read access to a forum's topics and posts.
#[async_trait::async_trait]
pub trait ForumSource: Send + Sync {
    /// First page of the latest topics in a category.
    async fn latest_topics(
        &self,
        category_slug: &str,
        category_id: &str,
    ) -> Result<Vec<TopicRef>, HttpError>;

    /// Posts of one topic, with their raw markdown.
    async fn topic_posts(&self, topic_id: TopicId) -> Result<Vec<ForumPost>, HttpError>;
}

/// A named theme setting that can be overwritten with a string value.
#[async_trait::async_trait]
pub trait ThemeSettingSink: Send + Sync {
    async fn update_setting(
        &self,
        component_id: &str,
        name: &str,
        value: &str,
    ) -> Result<(), HttpError>;
}

/// API credentials sent as `Api-Key` / `Api-Username` headers.
#[derive(Debug, Clone)]
pub struct DiscourseAuth {
    pub api_key: String,
    pub api_username: String,
}

pub struct DiscourseClient {
    base: Url,
    auth: DiscourseAuth,
    client: reqwest::Client,
    max_bytes: u64,
}

impl DiscourseClient {
    pub fn new(
        base_url: &str,
        auth: DiscourseAuth,
        settings: &HttpSettings,
    ) -> Result<Self, HttpError> {
        Ok(Self {
            base: parse_url(base_url)?,
            auth,
            client: build_client(settings)?,
            max_bytes: settings.max_bytes,
        })
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("Api-Key", &self.auth.api_key)
            .header("Api-Username", &self.auth.api_username)
    }
}

#[derive(Debug, Default, Deserialize)]
struct LatestResponse {
    #[serde(default)]
    topic_list: TopicList,
}

#[derive(Debug, Default, Deserialize)]
struct TopicList {
    #[serde(default)]
    topics: Vec<TopicJson>,
}

#[derive(Debug, Deserialize)]
struct TopicJson {
    id: TopicId,
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PostsResponse {
    #[serde(default)]
    post_stream: PostStream,
}

#[derive(Debug, Default, Deserialize)]
struct PostStream {
    #[serde(default)]
    posts: Vec<PostJson>,
}

#[derive(Debug, Deserialize)]
struct PostJson {
    #[serde(default)]
    id: u64,
    #[serde(default)]
    post_number: u64,
    #[serde(default)]
    raw: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
}

#[async_trait::async_trait]
impl ForumSource for DiscourseClient {
    async fn latest_topics(
        &self,
        category_slug: &str,
        category_id: &str,
    ) -> Result<Vec<TopicRef>, HttpError> {
        let url = endpoint(
            &self.base,
            &["c", category_slug, category_id, "l", "latest.json"],
        )?;
        let body = send(self.authorized(self.client.get(url)), self.max_bytes).await?;
        let latest: LatestResponse = decode_json(&body)?;
        Ok(latest
            .topic_list
            .topics
            .into_iter()
            .map(|topic| TopicRef {
                id: topic.id,
                slug: topic.slug.unwrap_or_default(),
                title: topic.title.unwrap_or_default(),
            })
            .collect())
    }

    async fn topic_posts(&self, topic_id: TopicId) -> Result<Vec<ForumPost>, HttpError> {
        let mut url = endpoint(&self.base, &["t", &topic_id.to_string(), "posts.json"])?;
        url.query_pairs_mut().append_pair("include_raw", "true");
        let body = send(self.authorized(self.client.get(url)), self.max_bytes).await?;
        let posts: PostsResponse = decode_json(&body)?;
        Ok(posts
            .post_stream
            .posts
            .into_iter()
            .map(|post| ForumPost {
                id: post.id,
                post_number: post.post_number,
                raw: post.raw.unwrap_or_default(),
                created_at: post.created_at,
            })
            .collect())
    }
}

#[async_trait::async_trait]
impl ThemeSettingSink for DiscourseClient {
    async fn update_setting(
        &self,
        component_id: &str,
        name: &str,
        value: &str,
    ) -> Result<(), HttpError> {
        let url = endpoint(&self.base, &["admin", "themes", component_id, "setting.json"])?;
        let payload = json!({ "name": name, "value": value });
        send(self.authorized(self.client.put(url)).json(&payload), self.max_bytes).await?;
        Ok(())
    }
}
