//! Relay engine: forum, summarizer and webhook clients, state files, and the
//! jobs that tie them together.
mod discord;
mod discourse;
mod http;
mod jobs;
mod persist;
mod summarize;
mod text;
mod types;

pub use discord::{DiscordWebhook, Embed, EmbedFooter, Notifier};
pub use discourse::{DiscourseAuth, DiscourseClient, ForumSource, ThemeSettingSink};
pub use http::HttpSettings;
pub use jobs::{
    run_news, run_shutdown, run_status_loop, run_status_once, run_ticker, shutdown_embed,
    status_embed, upsert_message, HttpStatusPage, MessageOutcome, NewsReport, NewsSettings,
    StatusPage, StatusSettings, TickerReport, TickerSettings, MARQUEE_SEPARATOR,
    SHUTDOWN_DESCRIPTION, SHUTDOWN_FOOTER, SHUTDOWN_TITLE,
};
pub use persist::{ensure_state_dir, AtomicFileWriter, JsonStore, PersistError, StoreError};
pub use summarize::{GeminiSummarizer, Summarizer};
pub use text::plain_text;
pub use types::{FailureKind, HttpError, JobError};
