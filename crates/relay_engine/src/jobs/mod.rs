mod news;
mod status;
mod ticker;

pub use news::{run_news, NewsReport, NewsSettings};
pub use status::{
    run_shutdown, run_status_loop, run_status_once, shutdown_embed, status_embed, upsert_message,
    HttpStatusPage, MessageOutcome, StatusPage, StatusSettings, SHUTDOWN_DESCRIPTION,
    SHUTDOWN_FOOTER, SHUTDOWN_TITLE,
};
pub use ticker::{run_ticker, TickerReport, TickerSettings, MARQUEE_SEPARATOR};
