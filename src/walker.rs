//! Directory traversal producing template file candidates.
//!
//! Roots may be files or directories. Directory scans only consider `.json`
//! files; explicit file roots are always loaded. Traversal is deterministic
//! (candidates sorted by depth, then path) so repeated runs over an
//! unchanged tree see the same sequence.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Result, TemplateError};
use crate::template::TemplateFile;

/// Everything a walk produced: loadable candidates plus per-file skips.
///
/// Malformed files never abort the walk; they are collected here so the
/// caller can surface them and keep going.
#[derive(Debug, Default)]
pub struct WalkOutcome {
    pub files: Vec<TemplateFile>,
    pub skipped: Vec<TemplateError>,
}

/// Collect template candidates under the given roots.
///
/// With `recursive` set, directory roots are descended without depth limit,
/// following symlinks; a symlink loop aborts the walk with
/// [`TemplateError::CycleDetected`]. Without it, only direct children of a
/// directory root are considered.
pub fn collect_templates(roots: &[PathBuf], recursive: bool) -> Result<WalkOutcome> {
    let mut outcome = WalkOutcome::default();

    for root in roots {
        if root.is_file() {
            load_candidate(root, &mut outcome)?;
            continue;
        }
        walk_directory(root, recursive, &mut outcome)?;
    }

    // Depth first, then path: parents before their subdirectories,
    // lexicographic among siblings.
    outcome
        .files
        .sort_by_key(|file| (file.path.components().count(), file.path.clone()));

    Ok(outcome)
}

fn walk_directory(root: &Path, recursive: bool, outcome: &mut WalkOutcome) -> Result<()> {
    let mut walk = WalkDir::new(root)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name();
    if !recursive {
        walk = walk.max_depth(1);
    }

    for entry in walk {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                if let Some(ancestor) = err.loop_ancestor() {
                    return Err(TemplateError::CycleDetected {
                        path: ancestor.to_path_buf(),
                    });
                }
                return Err(TemplateError::Io(err.into()));
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension().is_none_or(|ext| ext != "json") {
            continue;
        }
        load_candidate(entry.path(), outcome)?;
    }

    Ok(())
}

fn load_candidate(path: &Path, outcome: &mut WalkOutcome) -> Result<()> {
    match TemplateFile::load(path) {
        Ok(file) => outcome.files.push(file),
        Err(err) if err.is_per_file() => {
            tracing::warn!(path = %path.display(), error = %err, "Skipping template file");
            outcome.skipped.push(err);
        }
        Err(err) => return Err(err),
    }
    Ok(())
}
