//! Relay core: pure seen-item tracking and the decisions built on it.
mod budget;
mod headline;
mod item;
mod state;
mod status;
mod tracker;

pub use budget::{CallBudget, DEFAULT_CALLS_PER_MINUTE};
pub use headline::{extract_headline, HeadlineStyle};
pub use item::{Candidate, ForumPost, ItemKey, RankedEntry, TopicId, TopicRef};
pub use state::{MessageSlot, TrackerState};
pub use status::{
    classify_status_page, status_description, unreachable_report, ServiceState, StatusReport,
};
pub use tracker::{
    advance_watermark, collect_candidates, filter_new, merge_bounded, plan_ticker,
    record_published, CandidateRules, Dedup, TickerPlan, DEFAULT_MARQUEE_LEN,
};
