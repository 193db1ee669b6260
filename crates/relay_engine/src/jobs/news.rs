//! Announces new forum replies on Discord, one summarized embed per reply.

use relay_core::{
    advance_watermark, collect_candidates, filter_new, record_published, CallBudget,
    CandidateRules, Dedup, ItemKey, TrackerState,
};
use relay_logging::{relay_error, relay_info, relay_warn};
use tokio::time::Instant;

use crate::discord::{Embed, Notifier};
use crate::discourse::ForumSource;
use crate::persist::JsonStore;
use crate::summarize::Summarizer;
use crate::text::plain_text;
use crate::JobError;

#[derive(Debug, Clone)]
pub struct NewsSettings {
    pub base_url: String,
    pub category_slug: String,
    pub category_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewsReport {
    pub found: usize,
    pub published: Vec<ItemKey>,
    pub failed: Vec<ItemKey>,
}

pub async fn run_news(
    forum: &dyn ForumSource,
    summarizer: &dyn Summarizer,
    notifier: &dyn Notifier,
    budget: &mut CallBudget,
    store: &JsonStore<TrackerState>,
    settings: &NewsSettings,
) -> Result<NewsReport, JobError> {
    let mut state = store.load_or_default();

    let topics = forum
        .latest_topics(&settings.category_slug, &settings.category_id)
        .await
        .map_err(JobError::Fetch)?;

    let mut observed = Vec::new();
    let mut candidates = Vec::new();
    for topic in &topics {
        let posts = forum.topic_posts(topic.id).await.map_err(JobError::Fetch)?;
        observed.extend(posts.iter().map(|post| (topic.id, post.post_number)));
        candidates.extend(collect_candidates(
            &settings.base_url,
            topic,
            &posts,
            CandidateRules::News,
        ));
    }

    let mut fresh = filter_new(&candidates, &state, Dedup::Key);
    fresh.sort_by_key(|candidate| candidate.key);
    relay_info!("Found {} new posts to process.", fresh.len());

    let mut report = NewsReport {
        found: fresh.len(),
        ..NewsReport::default()
    };
    for candidate in fresh {
        let delay = budget.delay_before_call(Instant::now().into_std());
        if !delay.is_zero() {
            relay_info!("Rate limit hit; sleeping {:.1}s", delay.as_secs_f64());
            tokio::time::sleep(delay).await;
        }
        let summary = summarizer.summarize(&candidate.body).await;
        budget.record_call(Instant::now().into_std());
        let summary = match summary {
            Ok(summary) => summary,
            Err(err) => {
                relay_warn!("Summarizing {} failed: {err}", candidate.key);
                report.failed.push(candidate.key);
                continue;
            }
        };

        let title = plain_text(&candidate.title);
        let embed = Embed::new(title.as_str())
            .url(candidate.link.as_str())
            .description(summary);
        match notifier.create_message(&embed).await {
            Ok(message_id) => {
                relay_info!("Posted: {title}");
                if message_id.is_none() {
                    relay_warn!("No message id returned for {}", candidate.key);
                }
                record_published(&mut state, &candidate.key, message_id.unwrap_or_default());
                report.published.push(candidate.key);
            }
            Err(err) => {
                relay_error!("Posting {} failed: {err}", candidate.key);
                report.failed.push(candidate.key);
            }
        }
    }

    advance_watermark(&mut state, &observed, &report.failed);
    store.save(&state)?;
    relay_info!("State saved.");
    Ok(report)
}
