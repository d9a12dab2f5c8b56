use log::{info, LevelFilter};

// File-based logging with rotation
use log4rs::append::rolling_file::policy::compound::roll::fixed_window::FixedWindowRoller;
use log4rs::append::rolling_file::policy::compound::trigger::size::SizeTrigger;
use log4rs::append::rolling_file::policy::compound::CompoundPolicy;
use log4rs::append::rolling_file::RollingFileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

/// Initialize rotating file-only logging under `log_dir`.
///
/// Logs go to file only so they never interleave with progress rendering on
/// the terminal. Rotates at 10MB, keeping 5 archived files. The level can be
/// overridden via the `PHOTO_DEDUP_LOG` environment variable.
pub fn init_logger(log_dir: &str) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(log_dir)?;

    let log_file_path = format!("{}/photo-dedup.log", log_dir);
    let archived_pattern = format!("{}/photo-dedup.{{}}.log", log_dir);

    let trigger = SizeTrigger::new(10 * 1024 * 1024);
    let roller = FixedWindowRoller::builder()
        .build(&archived_pattern, 5)
        .map_err(|e| format!("Failed to create log roller: {}", e))?;
    let policy = CompoundPolicy::new(Box::new(trigger), Box::new(roller));

    let rolling_file = RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] [{M}:{L}] - {m}{n}",
        )))
        .build(log_file_path.clone(), Box::new(policy))
        .map_err(|e| format!("Failed to create log appender: {}", e))?;

    let config = Config::builder()
        .appender(Appender::builder().build("file", Box::new(rolling_file)))
        .build(Root::builder().appender("file").build(LevelFilter::Info))
        .map_err(|e| format!("Failed to build log config: {}", e))?;

    log4rs::init_config(config).map_err(|e| format!("Failed to initialize log4rs: {}", e))?;

    if let Ok(level) = std::env::var("PHOTO_DEDUP_LOG")
        .unwrap_or_else(|_| "info".to_string())
        .parse::<LevelFilter>()
    {
        log::set_max_level(level);
    }

    info!("Photo deduplication started, logging to {}", log_file_path);
    Ok(())
}
