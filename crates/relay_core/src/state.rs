use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{ItemKey, TopicId};

/// State persisted between runs of the news and ticker jobs.
///
/// Every field defaults, so a partial or older file still loads.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrackerState {
    /// Highest processed post number per topic, keyed by topic id as text.
    #[serde(default)]
    pub last_seen: BTreeMap<String, u64>,
    /// Marquee entries, most recent first.
    #[serde(default)]
    pub marquee: Vec<String>,
    /// Discord message id per published reply, keyed by `"topic/post"`.
    #[serde(default)]
    pub published: BTreeMap<String, String>,
}

impl TrackerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Watermark for a topic; 0 when the topic has never been seen.
    pub fn watermark(&self, topic_id: TopicId) -> u64 {
        self.last_seen
            .get(&topic_id.to_string())
            .copied()
            .unwrap_or(0)
    }

    pub fn is_published(&self, key: &ItemKey) -> bool {
        self.published.contains_key(&key.to_string())
    }

    pub(crate) fn prune_published(&mut self) {
        let last_seen = &self.last_seen;
        self.published.retain(|key, _| match key.split_once('/') {
            Some((topic, post)) => match (last_seen.get(topic), post.parse::<u64>()) {
                (Some(&watermark), Ok(post_number)) => post_number > watermark,
                _ => true,
            },
            None => true,
        });
    }

    pub(crate) fn raise_watermark(&mut self, topic_id: TopicId, value: u64) {
        let entry = self.last_seen.entry(topic_id.to_string()).or_insert(0);
        if value > *entry {
            *entry = value;
        }
    }
}

/// The one-entry store that remembers which Discord message to edit.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MessageSlot {
    #[serde(default)]
    pub message_id: Option<String>,
}

impl MessageSlot {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            message_id: Some(id.into()),
        }
    }
}
