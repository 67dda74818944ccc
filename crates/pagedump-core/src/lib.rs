pub mod config;
pub mod logging;

pub mod control;
pub mod driver;
pub mod fetch;
pub mod output;
pub mod retry;
pub mod scrape;
