use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use relay_core::{CallBudget, MessageSlot, TrackerState};
use relay_engine::{
    run_news, run_shutdown, run_status_loop, run_status_once, run_ticker, DiscordWebhook,
    DiscourseAuth, DiscourseClient, GeminiSummarizer, HttpStatusPage, JsonStore, MessageOutcome,
    NewsSettings, StatusSettings, TickerSettings,
};
use relay_logging::{relay_info, relay_warn};

use super::cli::{Command, StatusArgs};
use super::config::RelayConfig;

const NEWS_STATE_FILE: &str = "news_state.json";
const TICKER_STATE_FILE: &str = "ticker_state.json";
const STATUS_MESSAGE_FILE: &str = "status_message.json";

pub async fn dispatch(command: &Command, config: &RelayConfig, state_dir: &Path) -> Result<()> {
    match command {
        Command::News => news(config, state_dir).await,
        Command::Ticker => ticker(config, state_dir).await,
        Command::Status(args) => status(args, config, state_dir).await,
        Command::Shutdown => shutdown(config, state_dir).await,
    }
}

fn forum_client(config: &RelayConfig) -> Result<DiscourseClient> {
    let discourse = config.discourse()?;
    let auth = DiscourseAuth {
        api_key: discourse.api_key.clone(),
        api_username: discourse.api_username.clone(),
    };
    DiscourseClient::new(&discourse.base_url, auth, &config.http_settings())
        .context("invalid discourse.base_url")
}

async fn news(config: &RelayConfig, state_dir: &Path) -> Result<()> {
    let section = config.news()?;
    let forum = forum_client(config)?;
    let http = config.http_settings();
    let summarizer =
        GeminiSummarizer::new(&section.gemini_endpoint, &section.gemini_api_key, &http)
            .context("invalid news.gemini_endpoint")?;
    let webhook =
        DiscordWebhook::new(&section.webhook_url, &http).context("invalid news.webhook_url")?;
    let mut budget = CallBudget::per_minute(section.max_calls_per_minute);
    let store: JsonStore<TrackerState> = JsonStore::new(state_dir.join(NEWS_STATE_FILE));
    let settings = NewsSettings {
        base_url: config.discourse()?.base_url.clone(),
        category_slug: section.category_slug.clone(),
        category_id: section.category_id.clone(),
    };

    let report = run_news(&forum, &summarizer, &webhook, &mut budget, &store, &settings).await?;
    if !report.failed.is_empty() {
        relay_warn!(
            "{} of {} new posts will be retried next run",
            report.failed.len(),
            report.found
        );
    }
    Ok(())
}

async fn ticker(config: &RelayConfig, state_dir: &Path) -> Result<()> {
    let section = config.ticker()?;
    let forum = forum_client(config)?;
    let store: JsonStore<TrackerState> = JsonStore::new(state_dir.join(TICKER_STATE_FILE));
    let settings = TickerSettings {
        base_url: config.discourse()?.base_url.clone(),
        topics: section.topics.clone(),
        component_id: section.component_id.clone(),
        setting_name: section.setting_name.clone(),
        max_items: section.max_items,
    };

    let report = run_ticker(&forum, &forum, &store, &settings).await?;
    relay_info!(
        "{} new headline(s); marquee holds {}",
        report.new_items,
        report.marquee.len()
    );
    Ok(())
}

async fn status(args: &StatusArgs, config: &RelayConfig, state_dir: &Path) -> Result<()> {
    let section = config.status()?;
    let status_url = section
        .status_url
        .as_deref()
        .context("status.status_url is required for the status job")?;
    let http = config.http_settings();
    let page = HttpStatusPage::new(status_url, &http).context("invalid status.status_url")?;
    let webhook =
        DiscordWebhook::new(&section.webhook_url, &http).context("invalid status.webhook_url")?;
    let store: JsonStore<MessageSlot> = JsonStore::new(state_dir.join(STATUS_MESSAGE_FILE));
    let settings = StatusSettings {
        status_url: status_url.to_string(),
        title: section.title.clone(),
        interval: Duration::from_secs(section.interval_secs.max(1)),
    };

    if args.once {
        let (state, _) = run_status_once(&page, &webhook, &store, &settings).await?;
        relay_info!("Status is {state:?}");
        Ok(())
    } else {
        run_status_loop(&page, &webhook, &store, &settings).await?;
        Ok(())
    }
}

async fn shutdown(config: &RelayConfig, state_dir: &Path) -> Result<()> {
    let section = config.status()?;
    let webhook = DiscordWebhook::new(&section.webhook_url, &config.http_settings())
        .context("invalid status.webhook_url")?;
    let store: JsonStore<MessageSlot> = JsonStore::new(state_dir.join(STATUS_MESSAGE_FILE));

    match run_shutdown(&webhook, &store).await? {
        MessageOutcome::Failed(err) => bail!("shutdown notice was not delivered: {err}"),
        _ => Ok(()),
    }
}
