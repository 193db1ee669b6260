use std::fmt;

pub type TopicId = u64;

/// Identity of a reply: its topic plus its position within that topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemKey {
    pub topic_id: TopicId,
    pub post_number: u64,
}

impl ItemKey {
    pub fn new(topic_id: TopicId, post_number: u64) -> Self {
        Self {
            topic_id,
            post_number,
        }
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.topic_id, self.post_number)
    }
}

/// Topic metadata as listed by the forum.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TopicRef {
    pub id: TopicId,
    pub slug: String,
    pub title: String,
}

impl TopicRef {
    pub fn bare(id: TopicId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }
}

/// One post as fetched from a topic's post stream.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ForumPost {
    pub id: u64,
    pub post_number: u64,
    pub raw: String,
    pub created_at: Option<String>,
}

/// A reply that could be announced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub key: ItemKey,
    /// Creation timestamp; ISO-8601 strings order correctly as text.
    pub sort_key: Option<String>,
    pub title: String,
    pub link: String,
    pub body: String,
}

impl Candidate {
    /// Marquee entry for this candidate.
    pub fn rendered(&self) -> String {
        format!(r#"<a href="{}">{}</a>"#, self.link, self.title)
    }

    pub fn ranked(&self) -> RankedEntry {
        RankedEntry {
            sort_key: self.sort_key.clone(),
            payload: self.rendered(),
        }
    }
}

/// A rendered payload with an optional recency key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedEntry {
    pub sort_key: Option<String>,
    pub payload: String,
}

impl RankedEntry {
    pub fn new(sort_key: Option<&str>, payload: impl Into<String>) -> Self {
        Self {
            sort_key: sort_key.map(str::to_string),
            payload: payload.into(),
        }
    }

    pub fn unranked(payload: impl Into<String>) -> Self {
        Self {
            sort_key: None,
            payload: payload.into(),
        }
    }
}
