//! Seen-item tracking: which replies are new, what the marquee should show,
//! and how far each topic's watermark may move.

use std::collections::{BTreeMap, HashSet};

use crate::headline::{extract_headline, HeadlineStyle};
use crate::{Candidate, ForumPost, ItemKey, RankedEntry, TopicId, TopicRef, TrackerState};

/// Marquee length used by the ticker.
pub const DEFAULT_MARQUEE_LEN: usize = 7;

/// How a candidate is recognised as already handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dedup {
    /// By key in `TrackerState::published` (news job).
    Key,
    /// By rendered payload in `TrackerState::marquee` (ticker job).
    Payload,
}

/// How candidates are built from one topic's posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateRules {
    /// H1 headlines only, linked as `/t/{topic}/{post}`. Headline-less posts are dropped.
    Ticker,
    /// H1/H2 headlines falling back to the topic title, linked as `/t/{slug}/{topic}/{post}`.
    News,
}

/// Turns fetched posts into candidates.
///
/// The opening post of a topic never becomes a candidate, and neither does a
/// post without a usable title.
pub fn collect_candidates(
    base_url: &str,
    topic: &TopicRef,
    posts: &[ForumPost],
    rules: CandidateRules,
) -> Vec<Candidate> {
    let base = base_url.trim_end_matches('/');
    posts
        .iter()
        .filter(|post| post.post_number != 1)
        .filter_map(|post| {
            let title = match rules {
                CandidateRules::Ticker => extract_headline(&post.raw, HeadlineStyle::TopLevel)?,
                CandidateRules::News => {
                    extract_headline(&post.raw, HeadlineStyle::UpToSecondLevel)
                        .or_else(|| Some(topic.title.trim().to_string()))
                        .filter(|title| !title.is_empty())?
                }
            };
            let link = match rules {
                CandidateRules::Ticker => format!("{base}/t/{}/{}", topic.id, post.post_number),
                CandidateRules::News => format!(
                    "{base}/t/{}/{}/{}",
                    topic.slug, topic.id, post.post_number
                ),
            };
            Some(Candidate {
                key: ItemKey::new(topic.id, post.post_number),
                sort_key: post.created_at.clone(),
                title,
                link,
                body: post.raw.clone(),
            })
        })
        .collect()
}

/// Candidates above their topic's watermark that have not been recorded yet.
///
/// Pure: the same inputs always give the same output.
pub fn filter_new(candidates: &[Candidate], state: &TrackerState, dedup: Dedup) -> Vec<Candidate> {
    let marquee: HashSet<&str> = state.marquee.iter().map(String::as_str).collect();
    candidates
        .iter()
        .filter(|c| c.key.post_number > state.watermark(c.key.topic_id))
        .filter(|c| match dedup {
            Dedup::Key => !state.is_published(&c.key),
            Dedup::Payload => !marquee.contains(c.rendered().as_str()),
        })
        .cloned()
        .collect()
}

/// Builds the marquee: new entries ahead of the previous ones, newest first,
/// unique, at most `max_len` long.
///
/// Without new entries the marquee is rebuilt from the whole `pool` instead,
/// so a lost state file heals on the next run.
pub fn merge_bounded(
    new_items: &[RankedEntry],
    previous_items: &[String],
    pool: &[RankedEntry],
    max_len: usize,
) -> Vec<String> {
    if new_items.is_empty() {
        return rank_unique(pool.to_vec(), max_len);
    }
    let combined = new_items
        .iter()
        .cloned()
        .chain(previous_items.iter().map(|p| RankedEntry::unranked(p.as_str())))
        .collect();
    rank_unique(combined, max_len)
}

fn rank_unique(mut entries: Vec<RankedEntry>, max_len: usize) -> Vec<String> {
    // Stable sort: ties keep their input order. A missing key ranks as "".
    entries.sort_by(|a, b| {
        let a = a.sort_key.as_deref().unwrap_or("");
        let b = b.sort_key.as_deref().unwrap_or("");
        b.cmp(a)
    });

    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(max_len.min(entries.len()));
    for entry in entries {
        if out.len() >= max_len {
            break;
        }
        if seen.insert(entry.payload.clone()) {
            out.push(entry.payload);
        }
    }
    out
}

/// Raises each observed topic's watermark to the highest post number fetched.
///
/// `observed` holds every fetched post, including ones that were filtered out,
/// so posts that are malformed or have no headline are not retried forever.
/// A `held_back` key caps its topic just below itself so it is offered again.
/// Watermarks never decrease. Published keys at or below their topic's
/// watermark are dropped, since the watermark already rejects them.
pub fn advance_watermark(
    state: &mut TrackerState,
    observed: &[(TopicId, u64)],
    held_back: &[ItemKey],
) {
    let mut highest: BTreeMap<TopicId, u64> = BTreeMap::new();
    for &(topic_id, post_number) in observed {
        let entry = highest.entry(topic_id).or_insert(0);
        *entry = (*entry).max(post_number);
    }
    for key in held_back {
        if let Some(entry) = highest.get_mut(&key.topic_id) {
            *entry = (*entry).min(key.post_number.saturating_sub(1));
        }
    }
    for (topic_id, value) in highest {
        state.raise_watermark(topic_id, value);
    }
    state.prune_published();
}

/// Remembers the message created for `key` so it is never posted twice.
pub fn record_published(state: &mut TrackerState, key: &ItemKey, message_id: impl Into<String>) {
    state.published.insert(key.to_string(), message_id.into());
}

/// Outcome of ranking the marquee for one ticker run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerPlan {
    pub desired: Vec<String>,
    pub changed: bool,
}

/// Decides the next marquee from this run's candidates.
pub fn plan_ticker(
    state: &TrackerState,
    all_candidates: &[Candidate],
    new_candidates: &[Candidate],
    max_len: usize,
) -> TickerPlan {
    let new_items: Vec<RankedEntry> = new_candidates.iter().map(Candidate::ranked).collect();
    let pool: Vec<RankedEntry> = all_candidates.iter().map(Candidate::ranked).collect();
    let desired = merge_bounded(&new_items, &state.marquee, &pool, max_len);
    let changed = desired != state.marquee;
    TickerPlan { desired, changed }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_unique_keeps_first_of_equal_payloads() {
        let entries = vec![
            RankedEntry::new(Some("2024-01-02"), "a"),
            RankedEntry::unranked("a"),
            RankedEntry::new(Some("2024-01-01"), "b"),
        ];
        assert_eq!(rank_unique(entries, 7), vec!["a", "b"]);
    }

    #[test]
    fn rank_unique_treats_empty_key_like_missing() {
        let entries = vec![
            RankedEntry::unranked("x"),
            RankedEntry::new(Some(""), "y"),
            RankedEntry::new(Some("1"), "z"),
        ];
        assert_eq!(rank_unique(entries, 7), vec!["z", "x", "y"]);
    }

    #[test]
    fn held_back_key_without_observed_topic_is_ignored() {
        let mut state = TrackerState::new();
        advance_watermark(&mut state, &[], &[ItemKey::new(9, 4)]);
        assert!(state.last_seen.is_empty());
    }
}
