/// Apply a rename plan to disk
///
/// Steps run in a fixed order (project file, then each source renamed and
/// rewritten) and every completed step is recorded in a journal. When a step
/// fails the journal says exactly what already happened, and can optionally
/// be undone.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::core::plan::{FileRewrite, RenamePlan};
use crate::utils::file_utils::{rename_no_clobber, write_file_atomic};

/// One completed change on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppliedStep {
    ProjectFilePatched { path: PathBuf },
    Renamed { from: PathBuf, to: PathBuf },
    Rewritten { path: PathBuf },
}

impl fmt::Display for AppliedStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppliedStep::ProjectFilePatched { path } => write!(f, "patched {}", path.display()),
            AppliedStep::Renamed { from, to } => {
                write!(f, "renamed {} -> {}", from.display(), to.display())
            }
            AppliedStep::Rewritten { path } => write!(f, "rewrote {}", path.display()),
        }
    }
}

/// Options controlling how a plan is applied
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplyOptions {
    /// Undo completed steps when a later step fails
    pub rollback_on_failure: bool,
}

/// Outcome of a fully applied plan
#[derive(Debug, Clone, Default)]
pub struct ApplyReport {
    pub steps: Vec<AppliedStep>,
}

impl ApplyReport {
    pub fn renamed(&self) -> usize {
        self.count(|step| matches!(step, AppliedStep::Renamed { .. }))
    }

    pub fn rewritten(&self) -> usize {
        self.count(|step| {
            matches!(
                step,
                AppliedStep::Rewritten { .. } | AppliedStep::ProjectFilePatched { .. }
            )
        })
    }

    fn count(&self, predicate: impl Fn(&AppliedStep) -> bool) -> usize {
        self.steps.iter().filter(|step| predicate(step)).count()
    }
}

/// Error when a step fails part way through a plan
#[derive(Debug, thiserror::Error)]
#[error("failed to {failed} after {} completed step(s){}", .completed.len(), rollback_note(.rolled_back))]
pub struct ApplyError {
    /// Steps that finished before the failure, in order
    pub completed: Vec<AppliedStep>,
    /// Description of the step that failed
    pub failed: String,
    /// Whether the completed steps were fully undone
    pub rolled_back: bool,
    #[source]
    pub source: io::Error,
}

fn rollback_note(rolled_back: &bool) -> &'static str {
    if *rolled_back {
        ", changes rolled back"
    } else {
        ""
    }
}

/// Apply `plan`, calling `on_step` after each completed step
///
/// # Arguments
///
/// * `plan` - A plan built by [`RenamePlan::build`]
/// * `options` - Rollback behaviour
/// * `on_step` - Progress callback
///
/// # Returns
///
/// The journal of completed steps, or an [`ApplyError`] describing the
/// failing step and everything that completed before it
pub fn apply_plan(
    plan: &RenamePlan,
    options: ApplyOptions,
    mut on_step: impl FnMut(&AppliedStep),
) -> Result<ApplyReport, ApplyError> {
    let mut journal: Vec<AppliedStep> = Vec::new();

    match run_steps(plan, &mut journal, &mut on_step) {
        Ok(()) => Ok(ApplyReport { steps: journal }),
        Err((failed, source)) => {
            warn!("Failed to {}: {}", failed, source);
            let rolled_back = options.rollback_on_failure && rollback(plan, &journal);
            Err(ApplyError {
                completed: journal,
                failed,
                rolled_back,
                source,
            })
        }
    }
}

fn run_steps(
    plan: &RenamePlan,
    journal: &mut Vec<AppliedStep>,
    on_step: &mut impl FnMut(&AppliedStep),
) -> Result<(), (String, io::Error)> {
    let mut record = |journal: &mut Vec<AppliedStep>, step: AppliedStep| {
        info!("{}", step);
        on_step(&step);
        journal.push(step);
    };

    if let Some(project) = &plan.project_file {
        if rewrite(project).map_err(|e| (format!("patch {}", project.path.display()), e))? {
            record(
                journal,
                AppliedStep::ProjectFilePatched {
                    path: project.path.clone(),
                },
            );
        }
    }

    for change in &plan.sources {
        if change.renames() {
            rename_no_clobber(&change.from, &change.to).map_err(|e| {
                (
                    format!("rename {} to {}", change.from.display(), change.to.display()),
                    e,
                )
            })?;
            record(
                journal,
                AppliedStep::Renamed {
                    from: change.from.clone(),
                    to: change.to.clone(),
                },
            );
        } else {
            debug!("{} keeps its name", change.from.display());
        }

        if rewrite(&change.rewrite)
            .map_err(|e| (format!("rewrite {}", change.rewrite.path.display()), e))?
        {
            record(
                journal,
                AppliedStep::Rewritten {
                    path: change.rewrite.path.clone(),
                },
            );
        }
    }

    Ok(())
}

/// Write the new content if it differs; returns whether a write happened
fn rewrite(file: &FileRewrite) -> io::Result<bool> {
    if !file.changes_content() {
        debug!("{} unchanged, not rewriting", file.path.display());
        return Ok(false);
    }
    write_file_atomic(&file.path, &file.rewritten)?;
    Ok(true)
}

/// Undo `journal` in reverse order; returns true when every step was undone
fn rollback(plan: &RenamePlan, journal: &[AppliedStep]) -> bool {
    let mut clean = true;

    for step in journal.iter().rev() {
        let result = match step {
            AppliedStep::ProjectFilePatched { path } | AppliedStep::Rewritten { path } => {
                match original_content(plan, path) {
                    Some(original) => write_file_atomic(path, original),
                    None => Err(io::Error::new(
                        io::ErrorKind::NotFound,
                        format!("no original content recorded for {}", path.display()),
                    )),
                }
            }
            AppliedStep::Renamed { from, to } => rename_no_clobber(to, from),
        };

        match result {
            Ok(()) => info!("Rolled back: {}", step),
            Err(e) => {
                warn!("Could not roll back '{}': {}", step, e);
                clean = false;
            }
        }
    }

    clean
}

fn original_content<'a>(plan: &'a RenamePlan, path: &Path) -> Option<&'a str> {
    plan.project_file
        .iter()
        .chain(plan.sources.iter().map(|change| &change.rewrite))
        .find(|rewrite| rewrite.path.as_path() == path)
        .map(|rewrite| rewrite.original.as_str())
}
