use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use photo_dedup_core::{Action, Config, PhotoDeduper, ScanSession};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "photo-dedup")]
#[command(about = "Find and remediate duplicate photos")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, ValueEnum)]
enum ActionArg {
    /// Apply each group's recommended action
    Auto,
    /// Keep the first discovered file in each group
    KeepFirst,
    /// Keep the largest file in each group
    KeepLargest,
    /// Move files into original/ and duplicated/ subfolders
    MoveOrganize,
    /// Move non-kept files to the output folder
    MoveToFolder,
}

impl From<ActionArg> for Action {
    fn from(arg: ActionArg) -> Self {
        match arg {
            ActionArg::Auto => Action::Auto,
            ActionArg::KeepFirst => Action::KeepFirst,
            ActionArg::KeepLargest => Action::KeepLargest,
            ActionArg::MoveOrganize => Action::MoveOrganize,
            ActionArg::MoveToFolder => Action::MoveToFolder,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Scan directories for duplicate photos
    Scan {
        /// Directories or files to scan
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Minimum similarity score for two files to count as duplicates
        #[arg(long)]
        threshold: Option<f64>,

        /// Disable the filename similarity rule
        #[arg(long)]
        no_filenames: bool,

        /// Disable the visual similarity rule
        #[arg(long)]
        no_visual: bool,

        /// Skip capture metadata extraction
        #[arg(long)]
        no_metadata: bool,

        /// Remediation to apply to the groups found
        #[arg(long, value_enum)]
        action: Option<ActionArg>,

        /// Destination folder for move actions
        #[arg(long)]
        output_folder: Option<PathBuf>,

        /// Write the scan report as JSON to this path
        #[arg(long)]
        export: Option<PathBuf>,

        /// Write logs to rolling files in this directory instead of stderr
        #[arg(long)]
        log_dir: Option<String>,

        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Generate default configuration file
    GenerateConfig {
        /// Path to save configuration file
        #[arg(default_value = "photo-dedup.json")]
        path: PathBuf,
    },
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            paths,
            threshold,
            no_filenames,
            no_visual,
            no_metadata,
            action,
            output_folder,
            export,
            log_dir,
            config,
        } => {
            match log_dir {
                Some(dir) => photo_dedup_core::logging::init_logger(&dir)
                    .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?,
                None => env_logger::init(),
            }

            let mut config = if let Some(config_path) = config {
                Config::from_file(&config_path)?
            } else {
                Config::default()
            };

            // Override config with command line arguments
            if let Some(threshold) = threshold {
                config.similarity_threshold = threshold;
            }
            config.check_filenames = !no_filenames;
            config.check_visual = !no_visual;
            config.check_metadata = !no_metadata;

            let deduper = PhotoDeduper::new(config)?;

            let bar = ProgressBar::new(0);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("{msg}\n[{bar:40}] {pos}/{len}")?
                    .progress_chars("=> "),
            );
            let progress_bar = bar.clone();
            let session = ScanSession::new().with_progress(move |current, total, message| {
                progress_bar.set_length(total as u64);
                progress_bar.set_position(current as u64);
                progress_bar.set_message(message.to_string());
            });

            info!("Starting duplicate scan of {} path(s)", paths.len());
            let results = deduper.scan(&paths, &session)?;
            bar.finish_and_clear();

            print_summary(&results);

            if let Some(export_path) = export {
                deduper.report(&results).write_json(&export_path)?;
                println!("Report written to {}", export_path.display());
            }

            if let Some(action) = action {
                let stats = deduper.remediate(
                    &results.groups,
                    action.into(),
                    output_folder.as_deref(),
                    &session,
                )?;
                println!(
                    "Remediation: {} removed, {} moved, {} bytes reclaimed, {} errors",
                    stats.files_removed, stats.files_moved, stats.space_saved_bytes, stats.errors
                );
            }

            Ok(())
        }

        Commands::GenerateConfig { path } => {
            let config = Config::default();
            config.save_to_file(&path)?;
            println!("Configuration file generated at: {}", path.display());
            Ok(())
        }
    }
}

fn print_summary(results: &photo_dedup_core::ScanResults) {
    let stats = &results.stats;
    println!(
        "Analyzed {} files with {} comparisons in {:.1}s",
        stats.files_analyzed, stats.comparisons, stats.elapsed_secs
    );
    println!(
        "Found {} duplicate group(s), {} duplicate file(s), {} bytes recoverable",
        results.groups.len(),
        stats.duplicate_files,
        stats.recoverable_bytes
    );
    if stats.outcome.is_partial() {
        println!("Note: scan stopped early ({:?}), results are partial", stats.outcome);
    }
    for (i, group) in results.groups.iter().enumerate() {
        println!(
            "Group {} [{}] score {:.2}:",
            i + 1,
            group.duplicate_type.as_str(),
            group.similarity_score
        );
        for member in &group.members {
            println!("  {}", member.display());
        }
    }
}
