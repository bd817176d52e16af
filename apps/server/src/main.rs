use anyhow::Context;
use shub::domain::config::ApiConfig;
use shub::kernel::config::load_config;
use shub_logger::{LevelFilter, Logger};
use shub_server::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg: ApiConfig =
        load_config(Some("server")).context("Critical: Configuration is malformed")?;

    let level = cfg.log.level.parse().unwrap_or(LevelFilter::INFO);
    let logger = Logger::builder().name(env!("CARGO_PKG_NAME")).level(level);
    let _log = match &cfg.log.directory {
        Some(directory) => logger.path(directory).json(cfg.log.json).init()?,
        None => logger.init()?,
    };

    Server::builder().config(cfg).build()?.run().await
}
