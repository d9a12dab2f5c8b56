//! Group-level remediation: deleting or relocating duplicate files.
//!
//! Request validation happens before any file is touched; after that, every
//! failure is per-file, counted in the returned stats, and never aborts the
//! batch.

use log::{error, info};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::session::ScanSession;
use crate::types::{Action, DuplicateGroup, RecommendedAction, RemediationStats};

/// Execute `action` over the given groups.
///
/// `destination` is required for the move actions. An empty group list is a
/// configuration error, not a silent no-op.
pub(crate) fn remediate(
    groups: &[DuplicateGroup],
    action: Action,
    destination: Option<&Path>,
    session: &ScanSession,
) -> Result<RemediationStats> {
    if groups.is_empty() {
        return Err(Error::Configuration(
            "no duplicate groups provided".into(),
        ));
    }
    let destination = match (action.needs_destination(), destination) {
        (true, None) => {
            return Err(Error::Configuration(format!(
                "a destination folder is required for {:?}",
                action
            )))
        }
        (_, dest) => dest,
    };

    // Destination skeleton goes up before the first file moves
    if let Some(dest) = destination {
        fs::create_dir_all(dest)?;
        if action == Action::MoveOrganize {
            fs::create_dir_all(dest.join("original"))?;
            fs::create_dir_all(dest.join("duplicated"))?;
        }
    }

    let total_files: usize = groups.iter().map(|g| g.members.len()).sum();
    let mut stats = RemediationStats::default();
    let mut processed = 0usize;

    session.report(0, total_files, "Starting duplicate remediation");

    for group in groups {
        if session.is_cancelled() {
            break;
        }

        match action {
            Action::Auto => match group.recommended_action {
                RecommendedAction::KeepLargest => {
                    remove_files(
                        &all_but_largest(&group.members),
                        &mut stats,
                        session,
                        &mut processed,
                        total_files,
                    );
                }
                RecommendedAction::KeepFirst => {
                    remove_files(
                        &group.members[1..],
                        &mut stats,
                        session,
                        &mut processed,
                        total_files,
                    );
                }
                // Not our call to make
                RecommendedAction::ManualReview => {}
            },
            Action::KeepFirst => {
                remove_files(
                    &group.members[1..],
                    &mut stats,
                    session,
                    &mut processed,
                    total_files,
                );
            }
            Action::KeepLargest => {
                remove_files(
                    &all_but_largest(&group.members),
                    &mut stats,
                    session,
                    &mut processed,
                    total_files,
                );
            }
            Action::MoveOrganize => {
                let dest = destination.expect("validated above");
                let mut ranked = group.members.clone();
                rank_largest_first(&mut ranked);

                if let Some(original) = ranked.first() {
                    move_one(
                        original,
                        &dest.join("original"),
                        false,
                        &mut stats,
                        session,
                        &mut processed,
                        total_files,
                    );
                }
                for duplicate in &ranked[1..] {
                    move_one(
                        duplicate,
                        &dest.join("duplicated"),
                        true,
                        &mut stats,
                        session,
                        &mut processed,
                        total_files,
                    );
                }
            }
            Action::MoveToFolder => {
                let dest = destination.expect("validated above");
                for duplicate in &group.members[1..] {
                    move_one(
                        duplicate,
                        dest,
                        true,
                        &mut stats,
                        session,
                        &mut processed,
                        total_files,
                    );
                }
            }
        }
    }

    let message = if session.is_cancelled() {
        "Duplicate remediation cancelled"
    } else {
        "Duplicate remediation completed"
    };
    session.report(total_files, total_files, message);

    Ok(stats)
}

/// Members ranked largest first by their size on disk right now.
///
/// The sort is stable, so equally-sized members keep discovery order and the
/// first-discovered one wins ties.
fn rank_largest_first(members: &mut [PathBuf]) {
    members.sort_by_key(|path| {
        std::cmp::Reverse(fs::metadata(path).map(|m| m.len()).unwrap_or(0))
    });
}

fn all_but_largest(members: &[PathBuf]) -> Vec<PathBuf> {
    let mut ranked = members.to_vec();
    rank_largest_first(&mut ranked);
    ranked.split_off(1)
}

fn remove_files(
    files: &[PathBuf],
    stats: &mut RemediationStats,
    session: &ScanSession,
    processed: &mut usize,
    total_files: usize,
) {
    for path in files {
        *processed += 1;
        let size = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        match fs::remove_file(path) {
            Ok(()) => {
                stats.files_removed += 1;
                stats.space_saved_bytes += size;
                info!("Removed duplicate: {}", path.display());
                session.report_throttled(
                    *processed,
                    total_files,
                    &format!("Removed {}", file_name_of(path)),
                );
            }
            Err(e) => {
                error!("Failed to remove {}: {}", path.display(), e);
                stats.errors += 1;
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn move_one(
    path: &Path,
    folder: &Path,
    counts_as_saved: bool,
    stats: &mut RemediationStats,
    session: &ScanSession,
    processed: &mut usize,
    total_files: usize,
) {
    *processed += 1;
    let size = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
    let target = unique_destination(folder, path);

    match move_file(path, &target) {
        Ok(()) => {
            stats.files_moved += 1;
            if counts_as_saved {
                stats.space_saved_bytes += size;
            }
            info!("Moved {} to {}", path.display(), target.display());
            session.report_throttled(
                *processed,
                total_files,
                &format!("Moved {}", file_name_of(path)),
            );
        }
        Err(e) => {
            error!("Failed to move {}: {}", path.display(), e);
            stats.errors += 1;
        }
    }
}

/// Pick a collision-free name inside `folder` for the given source file,
/// appending `_1`, `_2`, ... before the extension until a free name is found
fn unique_destination(folder: &Path, source: &Path) -> PathBuf {
    let file_name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unnamed".to_string());

    let mut candidate = folder.join(&file_name);
    if !candidate.exists() {
        return candidate;
    }

    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unnamed".to_string());
    let extension = source
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut counter = 1;
    while candidate.exists() {
        candidate = folder.join(format!("{}_{}{}", stem, counter, extension));
        counter += 1;
    }
    candidate
}

/// Rename, falling back to copy-and-delete across filesystems
fn move_file(source: &Path, target: &Path) -> std::io::Result<()> {
    match fs::rename(source, target) {
        Ok(()) => Ok(()),
        Err(_) => {
            fs::copy(source, target)?;
            fs::remove_file(source)
        }
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

// -- Tests --
