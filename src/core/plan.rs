/// Rename plan
///
/// Every rename and every content rewrite is computed here, in memory,
/// before anything on disk changes. A plan that would clobber a file is
/// rejected as a whole.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::config::Settings;
use crate::core::names::{AnalyzerName, AnalyzerTitle};
use crate::core::substitution::{rename_file_name, Substitutions};
use crate::utils::file_utils::{list_files_with_extensions, read_text};

/// Error raised while building a plan; nothing has been modified yet
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("source directory {} does not exist", .0.display())]
    MissingSourceDir(PathBuf),

    #[error("failed to list {}", path.display())]
    List {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot rename {from} to {to}: {reason}")]
    Collision {
        from: String,
        to: String,
        reason: &'static str,
    },
}

/// New content for a single file
#[derive(Debug, Clone)]
pub struct FileRewrite {
    pub path: PathBuf,
    pub original: String,
    pub rewritten: String,
}

impl FileRewrite {
    pub fn changes_content(&self) -> bool {
        self.original != self.rewritten
    }
}

/// Rename plus rewrite of one template source
#[derive(Debug, Clone)]
pub struct SourceChange {
    pub from: PathBuf,
    pub to: PathBuf,
    pub extension: String,
    pub rewrite: FileRewrite,
}

impl SourceChange {
    /// False when the new name equals the old one (new name == template name)
    pub fn renames(&self) -> bool {
        self.from != self.to
    }
}

/// Complete set of changes for one run
#[derive(Debug, Clone)]
pub struct RenamePlan {
    pub project_file: Option<FileRewrite>,
    pub sources: Vec<SourceChange>,
}

impl RenamePlan {
    /// Build the plan for a project rooted at `project_dir`
    ///
    /// # Arguments
    ///
    /// * `project_dir` - Directory holding the project file and the source directory
    /// * `settings` - Template names and file locations
    /// * `name` - New analyzer base name
    /// * `title` - New analyzer title
    pub fn build(
        project_dir: &Path,
        settings: &Settings,
        name: &AnalyzerName,
        title: &AnalyzerTitle,
    ) -> Result<Self, PlanError> {
        let project_file = plan_project_file(project_dir, settings, name)?;
        let sources = plan_sources(project_dir, settings, name, title)?;

        let plan = Self {
            project_file,
            sources,
        };
        info!(
            "Planned {} rename(s), project file {}",
            plan.sources.len(),
            if plan.project_file.is_some() { "present" } else { "absent" }
        );
        Ok(plan)
    }

    pub fn is_empty(&self) -> bool {
        self.project_file.is_none() && self.sources.is_empty()
    }

    /// Number of files whose content will actually change
    pub fn changed_files(&self) -> usize {
        let project = self
            .project_file
            .as_ref()
            .map_or(0, |rewrite| usize::from(rewrite.changes_content()));
        let sources = self
            .sources
            .iter()
            .filter(|change| change.rewrite.changes_content())
            .count();
        project + sources
    }
}

fn plan_project_file(
    project_dir: &Path,
    settings: &Settings,
    name: &AnalyzerName,
) -> Result<Option<FileRewrite>, PlanError> {
    let path = project_dir.join(&settings.project_file);
    if !path.is_file() {
        debug!("No project file at {}, skipping", path.display());
        return Ok(None);
    }

    let original = read_text(&path).map_err(|source| PlanError::Read {
        path: path.clone(),
        source,
    })?;
    let rewritten = Substitutions::for_project_file(&settings.template_name, name).apply(&original);

    Ok(Some(FileRewrite {
        path,
        original,
        rewritten,
    }))
}

fn plan_sources(
    project_dir: &Path,
    settings: &Settings,
    name: &AnalyzerName,
    title: &AnalyzerTitle,
) -> Result<Vec<SourceChange>, PlanError> {
    let source_dir = project_dir.join(&settings.source_dir);
    if !source_dir.is_dir() {
        return Err(PlanError::MissingSourceDir(source_dir));
    }

    let files = list_files_with_extensions(&source_dir, &settings.extensions).map_err(|source| {
        PlanError::List {
            path: source_dir.clone(),
            source,
        }
    })?;

    let substitutions = Substitutions::for_source_file(
        &settings.template_name,
        &settings.template_title,
        name,
        title,
    );

    let mut targets = HashSet::new();
    let mut changes = Vec::with_capacity(files.len());

    for (file_name, extension) in &files {
        let new_name = rename_file_name(file_name, &settings.template_name, name);
        let renamed = new_name != *file_name;

        if renamed && files.contains_key(&new_name) {
            return Err(PlanError::Collision {
                from: file_name.clone(),
                to: new_name,
                reason: "target is another template source",
            });
        }
        if !targets.insert(new_name.clone()) {
            return Err(PlanError::Collision {
                from: file_name.clone(),
                to: new_name,
                reason: "two sources map to the same name",
            });
        }

        let from = source_dir.join(file_name);
        let to = source_dir.join(&new_name);
        if renamed && to.exists() {
            return Err(PlanError::Collision {
                from: file_name.clone(),
                to: new_name,
                reason: "target already exists",
            });
        }

        let original = read_text(&from).map_err(|source| PlanError::Read {
            path: from.clone(),
            source,
        })?;
        let rewritten = substitutions.apply(&original);

        debug!("Planned {} -> {}", file_name, new_name);
        changes.push(SourceChange {
            from,
            to: to.clone(),
            extension: extension.clone(),
            rewrite: FileRewrite {
                path: to,
                original,
                rewritten,
            },
        });
    }

    Ok(changes)
}
