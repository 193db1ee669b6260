mod app;
mod cli;
mod config;
mod jobs;
mod logging;

pub use app::run_app;
