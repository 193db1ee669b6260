//! Keeps a theme's marquee setting in step with the newest forum headlines.

use relay_core::{
    advance_watermark, collect_candidates, filter_new, plan_ticker, CandidateRules, Dedup,
    TopicId, TopicRef, TrackerState,
};
use relay_logging::{relay_debug, relay_info};

use crate::discourse::{ForumSource, ThemeSettingSink};
use crate::persist::JsonStore;
use crate::JobError;

/// Separator the theme splits `marquee_list` on.
pub const MARQUEE_SEPARATOR: &str = "|";

#[derive(Debug, Clone)]
pub struct TickerSettings {
    pub base_url: String,
    pub topics: Vec<TopicId>,
    pub component_id: String,
    pub setting_name: String,
    pub max_items: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerReport {
    pub new_items: usize,
    pub marquee: Vec<String>,
    pub pushed: bool,
}

pub async fn run_ticker(
    forum: &dyn ForumSource,
    sink: &dyn ThemeSettingSink,
    store: &JsonStore<TrackerState>,
    settings: &TickerSettings,
) -> Result<TickerReport, JobError> {
    let mut state = store.load_or_default();

    let mut observed = Vec::new();
    let mut all_candidates = Vec::new();
    for &topic_id in &settings.topics {
        let posts = forum.topic_posts(topic_id).await.map_err(JobError::Fetch)?;
        relay_debug!("Topic {topic_id}: {} posts", posts.len());
        observed.extend(posts.iter().map(|post| (topic_id, post.post_number)));
        all_candidates.extend(collect_candidates(
            &settings.base_url,
            &TopicRef::bare(topic_id),
            &posts,
            CandidateRules::Ticker,
        ));
    }

    let new_candidates = filter_new(&all_candidates, &state, Dedup::Payload);
    let plan = plan_ticker(&state, &all_candidates, &new_candidates, settings.max_items);

    if plan.changed {
        sink.update_setting(
            &settings.component_id,
            &settings.setting_name,
            &plan.desired.join(MARQUEE_SEPARATOR),
        )
        .await
        .map_err(JobError::Publish)?;
        relay_info!("Ticker updated with {} item(s)", plan.desired.len());
        state.marquee = plan.desired.clone();
    } else {
        relay_info!("Marquee already up-to-date.");
    }

    advance_watermark(&mut state, &observed, &[]);
    store.save(&state)?;
    relay_info!("State saved.");

    Ok(TickerReport {
        new_items: new_candidates.len(),
        marquee: plan.desired,
        pushed: plan.changed,
    })
}
