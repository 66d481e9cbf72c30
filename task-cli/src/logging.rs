use anyhow::anyhow;
use log::LevelFilter;
use log4rs::Config;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;

const APPENDER: &str = "stderr";

/// Installs the global logger. Records go to stderr so that stdout only
/// carries command output.
pub fn init(level: &str) -> anyhow::Result<log4rs::Handle> {
    let config = build_config(level)?;
    log4rs::init_config(config).map_err(|e| anyhow!("Cannot install logger: {e}"))
}

fn build_config(level: &str) -> anyhow::Result<Config> {
    let level: LevelFilter = level
        .parse()
        .map_err(|_| anyhow!("Invalid log level '{level}'"))?;
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{d(%H:%M:%S%.3f)} {l:<5} {t} - {m}{n}")))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build(APPENDER, Box::new(stderr)))
        .logger(Logger::builder().build("task_cli", level))
        .build(Root::builder().appender(APPENDER).build(LevelFilter::Warn))?;
    Ok(config)
}
